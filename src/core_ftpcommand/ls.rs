use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// `ls [directory]`: LIST over the data channel, printed once the
/// transfer completes.
pub async fn handle_ls_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    if args.len() > 1 {
        return Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string()));
    }
    let path = args.into_iter().next();
    client.clone().dispatch(FtpCommand::LIST, path).await?;
    if let Some(listing) = client.take_list_output().await {
        print!("{}", listing);
    }
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_ls_takes_at_most_one_path() {
        let client = FtpClient::new(ClientConfig::default());
        let args = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            handle_ls_command(client, args).await,
            Err(ClientError::Usage(_))
        ));
    }
}
