use crate::core_network::connection::{ControlConnection, DataConnection};
use crate::core_protocol::machine::{ProtocolCore, ReplyAction};
use crate::core_protocol::state::{DiagramState, ProtocolState};
use crate::error::ClientError;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Where a data-channel payload goes: onto disk or back to the caller.
#[derive(Debug, Clone)]
pub enum DataSink {
    File(PathBuf),
    Text,
}

/// Drive one command/reply cycle on the control connection.
///
/// The worker owns the connection lock for the whole cycle, reads replies
/// until the diagrams call the command finished, and leaves errors in the
/// machine for the dispatcher to pick up.
pub fn spawn_control_worker(
    connection: Arc<Mutex<ControlConnection>>,
    core: ProtocolCore,
    line: String,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(err) = run_control_cycle(&connection, &core, &line, generation).await {
            let mut machine = core.machine.lock().await;
            if machine.generation == generation {
                machine.pending_error = Some(err);
                machine.state = ProtocolState::BEGIN;
                machine.diagram_state = DiagramState::default();
                machine.control_finished = true;
            }
        }
    })
}

async fn run_control_cycle(
    connection: &Arc<Mutex<ControlConnection>>,
    core: &ProtocolCore,
    line: &str,
    generation: u64,
) -> Result<(), ClientError> {
    let mut connection = connection.lock().await;
    connection.send_command(line).await?;
    loop {
        let raw = connection.read_response().await?;
        let mut machine = core.machine.lock().await;
        if machine.generation != generation {
            debug!("discarding reply for a superseded command: {}", raw);
            return Ok(());
        }
        match core.apply_reply(&mut machine, &raw) {
            Ok(ReplyAction::Complete) => return Ok(()),
            Ok(ReplyAction::KeepWaiting) => continue,
            Err(err) => {
                machine.pending_error = Some(err);
                machine.state = ProtocolState::BEGIN;
                machine.diagram_state = DiagramState::default();
                machine.control_finished = true;
                if !machine.data_finished {
                    machine.data_finished = true;
                    machine.generation = machine.generation.wrapping_add(1);
                }
                return Ok(());
            }
        }
    }
}

/// Drain the data connection into its sink and mark the data channel
/// finished.
pub fn spawn_data_worker(
    connection: DataConnection,
    sink: DataSink,
    core: ProtocolCore,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = run_data_cycle(connection, sink).await;
        let mut machine = core.machine.lock().await;
        if machine.generation != generation {
            return;
        }
        match result {
            Ok(Some(text)) => machine.list_output = Some(text),
            Ok(None) => {}
            Err(err) => machine.pending_error = Some(err),
        }
        machine.data_finished = true;
    })
}

async fn run_data_cycle(
    connection: DataConnection,
    sink: DataSink,
) -> Result<Option<String>, ClientError> {
    match sink {
        DataSink::File(path) => {
            let bytes = connection.read_to_file(&path).await?;
            debug!("data channel stored {} bytes in {}", bytes, path.display());
            Ok(None)
        }
        DataSink::Text => Ok(Some(connection.read_text().await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::core_network::host::HostSpec;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn test_config() -> ClientConfig {
        ClientConfig {
            default_port: 21,
            poll_interval_ms: 5,
            connect_timeout_secs: 5,
            read_timeout_secs: 5,
            transfer_buffer_size: Some(1024),
        }
    }

    async fn serve_bytes(payload: &'static [u8]) -> (HostSpec, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(payload).await.unwrap();
        });
        (HostSpec::new("127.0.0.1".to_string(), port), handle)
    }

    #[tokio::test]
    async fn test_data_worker_writes_file_sink() {
        let (target, server) = serve_bytes(b"file payload bytes").await;
        let config = test_config();
        let connection = DataConnection::open_passive(&target, &config).await.unwrap();

        let path = std::env::temp_dir().join(format!("rffp-worker-{}.bin", std::process::id()));
        let core = ProtocolCore::new();
        core.machine.lock().await.data_finished = false;

        let worker = spawn_data_worker(connection, DataSink::File(path.clone()), core.clone(), 0);
        worker.await.unwrap();

        let machine = core.machine.lock().await;
        assert!(machine.data_finished);
        assert!(machine.pending_error.is_none());
        drop(machine);

        assert_eq!(std::fs::read(&path).unwrap(), b"file payload bytes");
        std::fs::remove_file(&path).unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_data_worker_is_discarded() {
        let (target, server) = serve_bytes(b"late listing\r\n").await;
        let config = test_config();
        let connection = DataConnection::open_passive(&target, &config).await.unwrap();

        let core = ProtocolCore::new();
        {
            let mut machine = core.machine.lock().await;
            machine.data_finished = false;
            machine.generation = 3;
        }

        // Spawned under generation 0; the machine has moved on.
        let worker = spawn_data_worker(connection, DataSink::Text, core.clone(), 0);
        worker.await.unwrap();

        let machine = core.machine.lock().await;
        assert!(!machine.data_finished);
        assert!(machine.list_output.is_none());
        server.await.unwrap();
    }
}
