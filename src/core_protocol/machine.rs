use crate::config::ClientConfig;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::{
    initialize_interface_handlers, initialize_protocol_handlers, InterfaceHandler, Outcome,
    ProtocolHandler,
};
use crate::core_ftpcommand::interface::InterfaceCommand;
use crate::core_network::host::HostSpec;
use crate::core_network::manager::{ConnectionManager, DataTarget};
use crate::core_protocol::diagram::TransitionDiagrams;
use crate::core_protocol::response::{FtpReply, ResponseParser};
use crate::core_protocol::state::{DiagramState, ProtocolState};
use crate::core_protocol::worker::{self, DataSink};
use crate::error::ClientError;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Everything the reply workers and the dispatch path share.
///
/// Held behind one mutex so a reply is always applied against a consistent
/// snapshot of the machine. `generation` is bumped by every reset; workers
/// carry the generation they were spawned under and drop their results when
/// it no longer matches.
#[derive(Debug)]
pub struct MachineState {
    pub state: ProtocolState,
    pub diagram_state: DiagramState,
    pub control_finished: bool,
    pub data_finished: bool,
    pub pending_error: Option<ClientError>,
    pub data_target: Option<DataTarget>,
    pub download_override: Option<PathBuf>,
    pub list_output: Option<String>,
    pub control_host: Option<String>,
    pub generation: u64,
}

impl MachineState {
    pub fn new() -> Self {
        MachineState {
            state: ProtocolState::BEGIN,
            diagram_state: DiagramState::default(),
            control_finished: true,
            data_finished: true,
            pending_error: None,
            data_target: None,
            download_override: None,
            list_output: None,
            control_host: None,
            generation: 0,
        }
    }

    /// Ready for a new command: back at BEGIN with no channel still working.
    pub fn is_ready(&self) -> bool {
        self.state == ProtocolState::BEGIN && self.control_finished && self.data_finished
    }

    /// Return to pristine. Connections and any negotiated data target
    /// survive; in-flight workers are orphaned by the generation bump.
    pub fn reset(&mut self) {
        self.state = ProtocolState::BEGIN;
        self.diagram_state = DiagramState::default();
        self.control_finished = true;
        self.data_finished = true;
        self.pending_error = None;
        self.download_override = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Default for MachineState {
    fn default() -> Self {
        MachineState::new()
    }
}

/// What a worker should do after one reply has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    Complete,
    KeepWaiting,
}

/// The parser, the transition diagrams, and the shared machine state,
/// cloned into every spawned worker.
#[derive(Clone)]
pub struct ProtocolCore {
    pub parser: Arc<ResponseParser>,
    pub diagrams: Arc<TransitionDiagrams>,
    pub machine: Arc<Mutex<MachineState>>,
}

impl ProtocolCore {
    pub fn new() -> Self {
        ProtocolCore {
            parser: Arc::new(ResponseParser::new()),
            diagrams: Arc::new(TransitionDiagrams::build()),
            machine: Arc::new(Mutex::new(MachineState::new())),
        }
    }

    /// Run one raw reply through the diagrams and update the machine.
    ///
    /// Called with the machine lock held. A FAILURE transition surfaces as
    /// `Err`; the caller owns storing it and unwinding the flags.
    pub fn apply_reply(
        &self,
        state: &mut MachineState,
        raw: &str,
    ) -> Result<ReplyAction, ClientError> {
        let reply = self.parser.parse(raw)?;
        state.diagram_state.response = Some(reply.kind);
        let next = self.diagrams.next_state(&state.diagram_state)?;
        let text = if reply.message.is_empty() {
            reply.kind.canned_message().to_string()
        } else {
            reply.message.clone()
        };

        match next {
            ProtocolState::WAIT => {
                state.state = ProtocolState::WAIT;
                Ok(ReplyAction::KeepWaiting)
            }
            ProtocolState::SUCCESS => {
                self.note_passive_target(state, &reply)?;
                info!("{} {}", reply.code, text);
                state.state = ProtocolState::BEGIN;
                state.diagram_state = DiagramState::default();
                state.control_finished = true;
                Ok(ReplyAction::Complete)
            }
            ProtocolState::ERROR => {
                warn!("{} {}", reply.code, text);
                state.state = ProtocolState::BEGIN;
                state.diagram_state = DiagramState::default();
                state.control_finished = true;
                if !state.data_finished {
                    // An open data channel can no longer complete; orphan
                    // its worker and move on.
                    state.data_finished = true;
                    state.generation = state.generation.wrapping_add(1);
                }
                Ok(ReplyAction::Complete)
            }
            ProtocolState::BEGIN => {
                debug!("{} {}", reply.code, text);
                state.state = ProtocolState::BEGIN;
                state.diagram_state = DiagramState::default();
                state.control_finished = true;
                Ok(ReplyAction::Complete)
            }
            ProtocolState::FAILURE => Err(ClientError::Protocol(text)),
        }
    }

    /// A successful PASV or EPSV reply carries the data endpoint; record it
    /// for the next transfer.
    fn note_passive_target(
        &self,
        state: &mut MachineState,
        reply: &FtpReply,
    ) -> Result<(), ClientError> {
        match state.diagram_state.command {
            Some(FtpCommand::PASV) => {
                let (host, port) = self.parser.parse_passive_target(&reply.message)?;
                state.data_target = Some(DataTarget {
                    host: HostSpec::new(host, port),
                    mode: FtpCommand::PASV,
                });
                Ok(())
            }
            Some(FtpCommand::EPSV) => {
                let port = self.parser.parse_extended_passive_port(&reply.message)?;
                let host = state.control_host.clone().ok_or_else(|| {
                    ClientError::Connection(
                        "No control host recorded for the extended passive reply.".to_string(),
                    )
                })?;
                state.data_target = Some(DataTarget {
                    host: HostSpec::new(host, port),
                    mode: FtpCommand::EPSV,
                });
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// The client itself: configuration, the protocol core, the connection
/// manager, and the two handler tables.
///
/// Shared as `Arc<FtpClient>` between the shell and the spawned workers;
/// all mutability lives behind the field mutexes.
pub struct FtpClient {
    pub config: ClientConfig,
    pub core: ProtocolCore,
    pub manager: Mutex<ConnectionManager>,
    pub current_host: Mutex<Option<HostSpec>>,
    pub interface_handlers: HashMap<InterfaceCommand, Arc<InterfaceHandler>>,
    pub protocol_handlers: HashMap<FtpCommand, Arc<ProtocolHandler>>,
}

impl FtpClient {
    pub fn new(config: ClientConfig) -> Arc<FtpClient> {
        let manager = Mutex::new(ConnectionManager::new(config.clone()));
        Arc::new(FtpClient {
            config,
            core: ProtocolCore::new(),
            manager,
            current_host: Mutex::new(None),
            interface_handlers: initialize_interface_handlers(),
            protocol_handlers: initialize_protocol_handlers(),
        })
    }

    /// Parse one line of user input and run the matching interface command.
    ///
    /// Unknown verbs print a notice and reset the machine instead of
    /// returning an error.
    pub async fn execute_line(self: Arc<Self>, line: &str) -> Result<Outcome, ClientError> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let verb = match tokens.next() {
            Some(verb) => verb,
            None => return Ok(Outcome::Continue),
        };
        let args: Vec<String> = tokens.collect();

        let handler = InterfaceCommand::from_alias(&verb)
            .and_then(|command| self.interface_handlers.get(&command))
            .map(Arc::clone);
        match handler {
            Some(handler) => handler(self, args).await,
            None => {
                println!("Unsupported command: {}", verb);
                self.reset().await;
                Ok(Outcome::Continue)
            }
        }
    }

    /// Send one protocol command through the state machine and block until
    /// the machine is ready again.
    pub async fn dispatch(
        self: Arc<Self>,
        command: FtpCommand,
        arg: Option<String>,
    ) -> Result<(), ClientError> {
        self.begin_command(command).await?;
        let handler = match self.protocol_handlers.get(&command) {
            Some(handler) => Arc::clone(handler),
            None => {
                self.reset().await;
                return Err(ClientError::DiagramGap(format!("{:?}", command)));
            }
        };
        if let Err(err) = handler(Arc::clone(&self), arg).await {
            self.reset().await;
            return Err(err);
        }
        self.wait_for_ready().await
    }

    /// Claim the machine for one command or refuse because another is
    /// still in flight.
    async fn begin_command(&self, command: FtpCommand) -> Result<(), ClientError> {
        let mut machine = self.core.machine.lock().await;
        if !machine.is_ready() {
            return Err(ClientError::Busy);
        }
        machine.state = ProtocolState::WAIT;
        machine.diagram_state = DiagramState::new(Some(command), None);
        machine.control_finished = false;
        machine.pending_error = None;
        Ok(())
    }

    /// Poll until both channels have finished, surfacing any error a
    /// worker left behind.
    async fn wait_for_ready(&self) -> Result<(), ClientError> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            {
                let mut machine = self.core.machine.lock().await;
                if let Some(err) = machine.pending_error.take() {
                    machine.reset();
                    return Err(err);
                }
                if machine.is_ready() {
                    return Ok(());
                }
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// Put a command line on the control connection, opening or reusing
    /// the connection to the current host, and spawn the reply worker.
    pub async fn send_control(&self, line: String) -> Result<(), ClientError> {
        let target = {
            let host = self.current_host.lock().await;
            host.clone().ok_or_else(|| {
                ClientError::Connection("No control connection. Use 'connect' first.".to_string())
            })?
        };
        let connection = {
            let mut manager = self.manager.lock().await;
            manager.control(&target).await?
        };
        let generation = {
            let mut machine = self.core.machine.lock().await;
            machine.control_host = Some(target.host.clone());
            machine.generation
        };
        worker::spawn_control_worker(connection, self.core.clone(), line, generation);
        Ok(())
    }

    /// Open the negotiated data connection and spawn its worker. The
    /// target is consumed; each transfer negotiates its own.
    pub async fn start_data_transfer(&self, sink: DataSink) -> Result<(), ClientError> {
        let target = {
            let mut machine = self.core.machine.lock().await;
            machine.data_target.take()
        };
        let target = target.ok_or_else(|| {
            ClientError::Connection(
                "No data connection negotiated. Use 'passive' first.".to_string(),
            )
        })?;
        let connection = {
            let mut manager = self.manager.lock().await;
            manager.data(&target).await?
        };
        let generation = {
            let mut machine = self.core.machine.lock().await;
            machine.data_finished = false;
            machine.generation
        };
        worker::spawn_data_worker(connection, sink, self.core.clone(), generation);
        Ok(())
    }

    pub async fn reset(&self) {
        self.core.machine.lock().await.reset();
    }

    pub async fn is_ready(&self) -> bool {
        self.core.machine.lock().await.is_ready()
    }

    pub async fn take_error(&self) -> Option<ClientError> {
        self.core.machine.lock().await.pending_error.take()
    }

    pub async fn take_list_output(&self) -> Option<String> {
        self.core.machine.lock().await.list_output.take()
    }

    pub async fn set_download_override(&self, path: PathBuf) {
        self.core.machine.lock().await.download_override = Some(path);
    }

    pub async fn take_download_override(&self) -> Option<PathBuf> {
        self.core.machine.lock().await.download_override.take()
    }

    pub async fn set_current_host(&self, target: HostSpec) {
        *self.current_host.lock().await = Some(target);
    }

    pub async fn has_control(&self) -> bool {
        self.manager.lock().await.has_control()
    }

    pub async fn close_control(&self) {
        self.manager.lock().await.close_control();
    }
}
