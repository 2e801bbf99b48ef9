use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `pwd`: the server's current directory, shown in the 257 reply.
pub async fn handle_pwd_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if !args.is_empty() {
        return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()));
    }
    client.dispatch(FtpCommand::PWD, None).await?;
    Ok(Outcome::Continue)
}
