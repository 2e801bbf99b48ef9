use crate::config::ClientConfig;
use crate::constants::{CRLF, DEFAULT_TRANSFER_BUFFER_SIZE};
use crate::core_network::host::HostSpec;
use crate::core_protocol::response;
use crate::error::ClientError;
use log::{debug, info};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};

/// The control channel to one server.
///
/// Opening it swallows the 220 greeting so the first command finds a
/// quiet line. A send or read failure marks the connection closed and the
/// manager dials a fresh one on the next command.
pub struct ControlConnection {
    target: HostSpec,
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    read_timeout: Duration,
    open: bool,
}

impl ControlConnection {
    pub async fn open(target: HostSpec, config: &ClientConfig) -> Result<Self, ClientError> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(target.addr()))
            .await
            .map_err(|_| {
                ClientError::Connection(format!("Timed out connecting to {}", target))
            })??;
        let (read_half, write_half) = stream.into_split();
        let mut connection = ControlConnection {
            target,
            reader: BufReader::new(read_half),
            writer: write_half,
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            open: true,
        };
        let greeting = connection.read_response().await?;
        info!("{}", greeting);
        Ok(connection)
    }

    pub fn target(&self) -> &HostSpec {
        &self.target
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub async fn send_command(&mut self, line: &str) -> Result<(), ClientError> {
        debug!("sending: {}", line);
        if let Err(err) = self.write_line(line).await {
            self.open = false;
            return Err(ClientError::from(err));
        }
        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(CRLF.as_bytes()).await?;
        self.writer.flush().await
    }

    /// Read one complete reply, timing out at the socket-read boundary.
    pub async fn read_response(&mut self) -> Result<String, ClientError> {
        let raw = match tokio::time::timeout(
            self.read_timeout,
            response::read_raw_response(&mut self.reader),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                self.open = false;
                return Err(err);
            }
            Err(_) => {
                self.open = false;
                return Err(ClientError::Connection(format!(
                    "Timed out waiting for a reply from {}",
                    self.target
                )));
            }
        };
        debug!("received: {}", raw);
        Ok(raw)
    }
}

/// One data channel, consumed by a single transfer.
#[derive(Debug)]
pub struct DataConnection {
    stream: TcpStream,
    read_timeout: Duration,
    buffer_size: usize,
}

impl DataConnection {
    /// Dial the endpoint a 227 or 229 reply advertised.
    pub async fn open_passive(
        target: &HostSpec,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(target.addr()))
            .await
            .map_err(|_| {
                ClientError::Connection(format!("Timed out connecting to {}", target))
            })??;
        Ok(DataConnection::from_parts(stream, config))
    }

    /// Listen on the advertised local endpoint and wait for the server
    /// to dial back, as PORT and EPRT arrange.
    pub async fn open_active(
        target: &HostSpec,
        config: &ClientConfig,
    ) -> Result<Self, ClientError> {
        let listener = TcpListener::bind(target.addr()).await?;
        let accept_timeout = Duration::from_secs(config.connect_timeout_secs);
        let (stream, _) = tokio::time::timeout(accept_timeout, listener.accept())
            .await
            .map_err(|_| {
                ClientError::Connection(format!(
                    "Timed out waiting for the server to connect to {}",
                    target
                ))
            })??;
        Ok(DataConnection::from_parts(stream, config))
    }

    fn from_parts(stream: TcpStream, config: &ClientConfig) -> Self {
        DataConnection {
            stream,
            read_timeout: Duration::from_secs(config.read_timeout_secs),
            buffer_size: config
                .transfer_buffer_size
                .unwrap_or(DEFAULT_TRANSFER_BUFFER_SIZE),
        }
    }

    /// Stream the channel to a local file until the server closes it.
    /// Returns the byte count.
    pub async fn read_to_file(mut self, path: &Path) -> Result<u64, ClientError> {
        let mut file = File::create(path).await.map_err(|err| {
            ClientError::Connection(format!("Could not create {}: {}", path.display(), err))
        })?;
        let mut buffer = vec![0u8; self.buffer_size];
        let mut total = 0u64;
        loop {
            let read = tokio::time::timeout(self.read_timeout, self.stream.read(&mut buffer))
                .await
                .map_err(|_| {
                    ClientError::Connection(
                        "Timed out reading from the data connection".to_string(),
                    )
                })??;
            if read == 0 {
                break;
            }
            file.write_all(&buffer[..read]).await?;
            total += read as u64;
        }
        file.flush().await?;
        Ok(total)
    }

    /// Read the channel as ASCII text, normalizing every line ending
    /// to CRLF.
    pub async fn read_text(self) -> Result<String, ClientError> {
        let read_timeout = self.read_timeout;
        let mut reader = BufReader::new(self.stream);
        let mut output = String::new();
        loop {
            let mut line = String::new();
            let read = tokio::time::timeout(read_timeout, reader.read_line(&mut line))
                .await
                .map_err(|_| {
                    ClientError::Connection(
                        "Timed out reading from the data connection".to_string(),
                    )
                })??;
            if read == 0 {
                break;
            }
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            output.push_str(&line);
            output.push_str(CRLF);
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            default_port: 21,
            poll_interval_ms: 5,
            connect_timeout_secs: 5,
            read_timeout_secs: 5,
            transfer_buffer_size: Some(64),
        }
    }

    #[tokio::test]
    async fn test_control_connection_sends_and_reads() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            write_half.write_all(b"220 Ready.\r\n").await.unwrap();
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            assert_eq!(line, "NOOP\r\n");
            write_half.write_all(b"200 Command okay.\r\n").await.unwrap();
        });

        let target = HostSpec::new("127.0.0.1".to_string(), port);
        let config = test_config();
        let mut connection = ControlConnection::open(target.clone(), &config).await.unwrap();
        assert!(connection.is_open());
        assert_eq!(connection.target(), &target);

        connection.send_command("NOOP").await.unwrap();
        let reply = connection.read_response().await.unwrap();
        assert_eq!(reply, "200 Command okay.");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_data_connection_reads_text_with_crlf_normalized() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"one\ntwo\r\nthree").await.unwrap();
        });

        let target = HostSpec::new("127.0.0.1".to_string(), port);
        let config = test_config();
        let connection = DataConnection::open_passive(&target, &config).await.unwrap();
        let text = connection.read_text().await.unwrap();
        assert_eq!(text, "one\r\ntwo\r\nthree\r\n");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_data_connection_reads_file() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let payload: Vec<u8> = (0u16..300).map(|n| (n % 251) as u8).collect();
        let served = payload.clone();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(&served).await.unwrap();
        });

        let target = HostSpec::new("127.0.0.1".to_string(), port);
        let config = test_config();
        let connection = DataConnection::open_passive(&target, &config).await.unwrap();

        let path = std::env::temp_dir().join(format!("rffp-data-{}.bin", std::process::id()));
        let total = connection.read_to_file(&path).await.unwrap();
        assert_eq!(total, payload.len() as u64);
        assert_eq!(std::fs::read(&path).unwrap(), payload);
        std::fs::remove_file(&path).unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_open_active_accepts_server_dial() {
        let config = test_config();
        let probe = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = probe.local_addr().unwrap().port();
        drop(probe);

        let target = HostSpec::new("127.0.0.1".to_string(), port);
        let accept = tokio::spawn({
            let target = target.clone();
            let config = config.clone();
            async move { DataConnection::open_active(&target, &config).await }
        });

        // Dial like the server would after a PORT command, retrying until
        // the listener is up.
        let mut attempts = 0;
        let mut stream = loop {
            match tokio::net::TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(err) => {
                    attempts += 1;
                    if attempts > 50 {
                        panic!("could not dial data listener: {}", err);
                    }
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        };
        stream.write_all(b"payload").await.unwrap();
        drop(stream);

        let connection = accept.await.unwrap().unwrap();
        let text = connection.read_text().await.unwrap();
        assert_eq!(text, "payload\r\n");
    }
}
