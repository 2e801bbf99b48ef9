use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `cdup`, one directory up.
pub async fn handle_cdup_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if !args.is_empty() {
        return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()));
    }
    client.dispatch(FtpCommand::CDUP, None).await?;
    Ok(Outcome::Continue)
}
