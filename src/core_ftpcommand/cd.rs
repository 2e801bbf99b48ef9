use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `cd <path>`, a CWD on the wire.
pub async fn handle_cd_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if args.len() != 1 {
        return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()));
    }
    let path = args.into_iter().next().unwrap_or_default();
    client.dispatch(FtpCommand::CWD, Some(path)).await?;
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_cd_takes_exactly_one_path() {
        let client = FtpClient::new(ClientConfig::default());
        assert!(matches!(
            handle_cd_command(client.clone(), vec![]).await,
            Err(ClientError::Usage(_))
        ));
        let args = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            handle_cd_command(client, args).await,
            Err(ClientError::Usage(_))
        ));
    }
}
