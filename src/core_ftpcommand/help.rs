use crate::core_ftpcommand::handlers::Outcome;
use crate::core_ftpcommand::interface::InterfaceCommand;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `help`: the local command list. Touches no connection and leaves the
/// machine reset.
pub async fn handle_help_command(
    client: Arc<FtpClient>,
    _args: Vec<String>,
) -> Result<Outcome, ClientError> {
    println!("{}", InterfaceCommand::help_text());
    client.reset().await;
    Ok(Outcome::Continue)
}
