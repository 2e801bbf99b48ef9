use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use crate::helpers::parse_required_flags;
use std::sync::Arc;

/// Handles `login -u <username> -p <password>`.
///
/// USER is dispatched first; its 331 sends the machine back to ready so
/// PASS can follow as a second full dispatch.
pub async fn handle_login_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    let flags = parse_required_flags(&args, &["-u", "-p"])
        .ok_or_else(|| ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()))?;
    let username = flags.get("-u").cloned().unwrap_or_default();
    let password = flags.get("-p").cloned().unwrap_or_default();

    client
        .clone()
        .dispatch(FtpCommand::USER, Some(username))
        .await?;
    client
        .clone()
        .dispatch(FtpCommand::PASS, Some(password))
        .await?;
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_login_requires_both_flags() {
        let client = FtpClient::new(ClientConfig::default());
        let args = vec!["-u".to_string(), "alice".to_string()];
        let err = handle_login_command(client, args).await.unwrap_err();
        match err {
            ClientError::Usage(message) => assert_eq!(message, BAD_COMMAND_SYNTAX),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
