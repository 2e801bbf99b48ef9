use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use log::warn;
use std::sync::Arc;

/// Handles the `quit` interface command.
///
/// Says goodbye to the server first when a control connection exists; a
/// failed QUIT is logged and does not keep the client alive. Always ends
/// the session.
pub async fn handle_quit_command(
    client: Arc<FtpClient>,
    _args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if client.has_control().await {
        if let Err(err) = client.clone().dispatch(FtpCommand::QUIT, None).await {
            warn!("QUIT failed: {}", err);
            client.reset().await;
        }
        client.close_control().await;
    }
    Ok(Outcome::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_quit_without_a_connection_just_exits() {
        let client = FtpClient::new(ClientConfig::default());
        let outcome = handle_quit_command(client.clone(), vec![]).await.unwrap();
        assert_eq!(outcome, Outcome::Exit);
        assert!(client.is_ready().await);
    }
}
