use crate::constants::BAD_COMMAND_SYNTAX;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_protocol::machine::FtpClient;
use crate::core_protocol::worker::DataSink;
use crate::error::ClientError;
use std::path::PathBuf;
use std::sync::Arc;

// One handler per protocol verb. Each puts its command on the control
// connection; the transfer verbs stand up the data channel first so it
// is ready before the server reacts to the command.

pub async fn handle_user_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let user = required_arg(arg)?;
    client
        .send_control(FtpCommand::USER.wire_line(Some(&user)))
        .await
}

pub async fn handle_pass_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let password = required_arg(arg)?;
    client
        .send_control(FtpCommand::PASS.wire_line(Some(&password)))
        .await
}

pub async fn handle_cwd_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let path = required_arg(arg)?;
    client
        .send_control(FtpCommand::CWD.wire_line(Some(&path)))
        .await
}

pub async fn handle_cdup_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::CDUP.wire_line(None)).await
}

pub async fn handle_quit_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::QUIT.wire_line(None)).await
}

pub async fn handle_pasv_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::PASV.wire_line(None)).await
}

pub async fn handle_epsv_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::EPSV.wire_line(None)).await
}

pub async fn handle_port_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let endpoint = required_arg(arg)?;
    client
        .send_control(FtpCommand::PORT.wire_line(Some(&endpoint)))
        .await
}

pub async fn handle_eprt_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let endpoint = required_arg(arg)?;
    client
        .send_control(FtpCommand::EPRT.wire_line(Some(&endpoint)))
        .await
}

pub async fn handle_retr_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    let remote = required_arg(arg)?;
    let local = match client.take_download_override().await {
        Some(path) => path,
        None => PathBuf::from(local_name_for(&remote)?),
    };
    client.start_data_transfer(DataSink::File(local)).await?;
    client
        .send_control(FtpCommand::RETR.wire_line(Some(&remote)))
        .await
}

pub async fn handle_pwd_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::PWD.wire_line(None)).await
}

pub async fn handle_list_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    client.start_data_transfer(DataSink::Text).await?;
    client
        .send_control(FtpCommand::LIST.wire_line(arg.as_deref()))
        .await
}

pub async fn handle_help_command(
    client: Arc<FtpClient>,
    arg: Option<String>,
) -> Result<(), ClientError> {
    client
        .send_control(FtpCommand::HELP.wire_line(arg.as_deref()))
        .await
}

pub async fn handle_noop_command(
    client: Arc<FtpClient>,
    _arg: Option<String>,
) -> Result<(), ClientError> {
    client.send_control(FtpCommand::NOOP.wire_line(None)).await
}

fn required_arg(arg: Option<String>) -> Result<String, ClientError> {
    match arg {
        Some(arg) if !arg.is_empty() => Ok(arg),
        _ => Err(ClientError::Usage(BAD_COMMAND_SYNTAX.to_string())),
    }
}

/// The local file a download lands in: the last path segment of the
/// remote name.
fn local_name_for(remote: &str) -> Result<String, ClientError> {
    let name = remote.rsplit('/').next().unwrap_or(remote);
    if name.is_empty() {
        return Err(ClientError::Usage(format!(
            "Cannot derive a local file name from {:?}",
            remote
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[tokio::test]
    async fn test_user_requires_argument() {
        let client = FtpClient::new(ClientConfig::default());
        let err = handle_user_command(client, None).await.unwrap_err();
        match err {
            ClientError::Usage(message) => assert_eq!(message, BAD_COMMAND_SYNTAX),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_commands_need_a_control_connection() {
        let client = FtpClient::new(ClientConfig::default());
        let err = handle_noop_command(client, None).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }

    #[tokio::test]
    async fn test_transfers_need_a_negotiated_data_target() {
        let client = FtpClient::new(ClientConfig::default());
        let err = handle_list_command(client, None).await.unwrap_err();
        match err {
            ClientError::Connection(message) => assert!(message.contains("passive")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_local_name_for_takes_last_segment() {
        assert_eq!(local_name_for("pub/docs/readme.txt").unwrap(), "readme.txt");
        assert_eq!(local_name_for("readme.txt").unwrap(), "readme.txt");
        assert!(local_name_for("pub/docs/").is_err());
    }
}
