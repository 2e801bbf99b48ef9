use crate::config::ClientConfig;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_network::connection::{ControlConnection, DataConnection};
use crate::core_network::host::HostSpec;
use crate::error::ClientError;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A negotiated data-channel endpoint and the verb that negotiated it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTarget {
    pub host: HostSpec,
    pub mode: FtpCommand,
}

/// Owns the control connection and opens data connections on demand.
///
/// The control connection is reused while the target matches and the
/// socket is still usable; a different target or a dead socket gets a
/// fresh dial.
pub struct ConnectionManager {
    config: ClientConfig,
    control: Option<Arc<Mutex<ControlConnection>>>,
}

impl ConnectionManager {
    pub fn new(config: ClientConfig) -> Self {
        ConnectionManager {
            config,
            control: None,
        }
    }

    pub async fn control(
        &mut self,
        target: &HostSpec,
    ) -> Result<Arc<Mutex<ControlConnection>>, ClientError> {
        if let Some(existing) = &self.control {
            let connection = existing.lock().await;
            if connection.target() == target && connection.is_open() {
                drop(connection);
                return Ok(Arc::clone(existing));
            }
        }
        info!("Opening control connection to {}", target);
        let connection = Arc::new(Mutex::new(
            ControlConnection::open(target.clone(), &self.config).await?,
        ));
        self.control = Some(Arc::clone(&connection));
        Ok(connection)
    }

    pub fn has_control(&self) -> bool {
        self.control.is_some()
    }

    /// Open the data channel a PASV, EPSV, PORT, or EPRT exchange set up.
    pub async fn data(&mut self, target: &DataTarget) -> Result<DataConnection, ClientError> {
        if self.control.is_none() {
            return Err(ClientError::Connection(
                "Cannot create a data connection without a control connection.".to_string(),
            ));
        }
        match target.mode {
            FtpCommand::PASV | FtpCommand::EPSV => {
                DataConnection::open_passive(&target.host, &self.config).await
            }
            FtpCommand::PORT | FtpCommand::EPRT => {
                DataConnection::open_active(&target.host, &self.config).await
            }
            other => Err(ClientError::Connection(format!(
                "Data connections must be negotiated with one of PORT, EPRT, PASV, or EPSV, not {:?}",
                other
            ))),
        }
    }

    pub fn close_control(&mut self) {
        self.control = None;
    }
}
