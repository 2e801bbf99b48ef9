use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::path::PathBuf;
use std::sync::Arc;

/// `get <filename> [local]`: RETR into a local file. The download lands
/// under the second argument when given, otherwise under the last path
/// segment of the remote name. Needs a `passive` negotiation first.
pub async fn handle_get_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if args.is_empty() || args.len() > 2 {
        return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()));
    }
    let mut args = args.into_iter();
    let filename = args.next().unwrap_or_default();
    if let Some(local) = args.next() {
        client.set_download_override(PathBuf::from(local)).await;
    }
    client.dispatch(FtpCommand::RETR, Some(filename)).await?;
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_get_takes_one_or_two_arguments() {
        let client = FtpClient::new(ClientConfig::default());
        assert!(matches!(
            handle_get_command(client.clone(), vec![]).await,
            Err(ClientError::Usage(_))
        ));
        let args = vec![
            "a.txt".to_string(),
            "b.txt".to_string(),
            "c.txt".to_string(),
        ];
        assert!(matches!(
            handle_get_command(client, args).await,
            Err(ClientError::Usage(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_get_does_not_leak_the_local_name() {
        let client = FtpClient::new(ClientConfig::default());
        let args = vec!["remote.txt".to_string(), "local.txt".to_string()];
        // No connection: the dispatch fails after consuming the override.
        assert!(handle_get_command(client.clone(), args).await.is_err());
        assert_eq!(client.take_download_override().await, None);
    }
}
