use thiserror::Error;

/// Errors surfaced by the client. `Protocol` carries the server's own
/// message text so the shell shows the user exactly what the server said.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to parse server response: {0}")]
    Parse(String),

    #[error("{0}")]
    Protocol(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{0}")]
    Usage(String),

    #[error("A command is already in progress.")]
    Busy,

    #[error("No dispatch entry for {0}; the protocol tables are incomplete")]
    DiagramGap(String),
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Connection(err.to_string())
    }
}
