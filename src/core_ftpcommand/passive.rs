use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// Handles `passive [-e]`.
///
/// Negotiates the data endpoint for the next transfer: PASV by default,
/// EPSV with the `-e` flag. The successful reply is parsed by the state
/// machine and the endpoint kept until a transfer consumes it.
pub async fn handle_passive_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    let command = match args.first().map(String::as_str) {
        None => FtpCommand::PASV,
        Some("-e") if args.len() == 1 => FtpCommand::EPSV,
        _ => return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string())),
    };
    client.dispatch(command, None).await?;
    Ok(Outcome::Continue)
}
