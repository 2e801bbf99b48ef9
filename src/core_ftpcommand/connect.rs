use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::Outcome;
use crate::core_network::host::HostSpec;
use crate::core_protocol::machine::FtpClient;
use crate::error::ClientError;
use std::sync::Arc;

/// Handles the `connect <hostname>:<port>` interface command.
///
/// Records the target (port defaults to 21) and dispatches a NOOP; the
/// dispatch opens the control connection, which swallows the greeting,
/// and the NOOP reply confirms the server is talking to us.
pub async fn handle_connect_command(
    client: Arc<FtpClient>,
    args: Vec<String>,
) -> Result<Outcome, ClientError> {
    let spec = args
        .first()
        .ok_or_else(|| ClientError::Usage("connect: no host provided".to_string()))?;
    let target = HostSpec::parse(spec, client.config.default_port)?;
    client.set_current_host(target).await;
    client.clone().dispatch(FtpCommand::NOOP, None).await?;
    Ok(Outcome::Continue)
}
