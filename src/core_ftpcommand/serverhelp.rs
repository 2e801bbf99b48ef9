use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `serverhelp [command]`: the server's own HELP text, logged when the
/// 214 reply lands.
pub async fn handle_serverhelp_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    let arg = if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    };
    client.dispatch(FtpCommand::HELP, arg).await?;
    Ok(Outcome::Continue)
}
