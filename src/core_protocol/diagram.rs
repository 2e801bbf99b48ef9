use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_protocol::response::FtpResponseKind;
use crate::core_protocol::state::{DiagramState, ProtocolState};
use crate::error::ClientError;
use std::collections::HashMap;

pub type TransitionDiagram = HashMap<DiagramState, ProtocolState>;

/// The three RFC 959 state diagrams, fully enumerated.
///
/// Every (command, response) pair lands somewhere; a lookup miss means the
/// tables were built wrong, not that the server misbehaved.
pub struct TransitionDiagrams {
    simple: TransitionDiagram,
    transfer: TransitionDiagram,
    auth: TransitionDiagram,
}

impl TransitionDiagrams {
    pub fn build() -> Self {
        let mut simple = TransitionDiagram::new();
        let mut transfer = TransitionDiagram::new();
        let mut auth = TransitionDiagram::new();

        for command in FtpCommand::all() {
            for response in FtpResponseKind::all() {
                let key = DiagramState::new(Some(*command), Some(*response));
                let class = response.code() / 100;

                simple.insert(
                    key,
                    match class {
                        1 => ProtocolState::ERROR,
                        2 => ProtocolState::SUCCESS,
                        3 => ProtocolState::ERROR,
                        _ => ProtocolState::FAILURE,
                    },
                );

                transfer.insert(
                    key,
                    match class {
                        1 => ProtocolState::WAIT,
                        2 => ProtocolState::SUCCESS,
                        3 => ProtocolState::ERROR,
                        _ => ProtocolState::FAILURE,
                    },
                );

                // 3xx sends USER and PASS back to BEGIN so the login
                // sequence can continue with the next command.
                auth.insert(
                    key,
                    match class {
                        1 => ProtocolState::ERROR,
                        2 => ProtocolState::SUCCESS,
                        3 => match command {
                            FtpCommand::USER | FtpCommand::PASS => ProtocolState::BEGIN,
                            _ => ProtocolState::ERROR,
                        },
                        _ => ProtocolState::FAILURE,
                    },
                );
            }
        }

        TransitionDiagrams {
            simple,
            transfer,
            auth,
        }
    }

    fn for_command(&self, command: FtpCommand) -> &TransitionDiagram {
        match command {
            FtpCommand::USER | FtpCommand::PASS => &self.auth,
            FtpCommand::RETR | FtpCommand::LIST => &self.transfer,
            FtpCommand::CWD
            | FtpCommand::CDUP
            | FtpCommand::QUIT
            | FtpCommand::PASV
            | FtpCommand::EPSV
            | FtpCommand::PORT
            | FtpCommand::EPRT
            | FtpCommand::PWD
            | FtpCommand::HELP
            | FtpCommand::NOOP => &self.simple,
        }
    }

    /// Look up the machine state a (command, response) pair leads to.
    pub fn next_state(&self, diagram_state: &DiagramState) -> Result<ProtocolState, ClientError> {
        let command = diagram_state.command.ok_or_else(|| {
            ClientError::DiagramGap("a response with no command outstanding".to_string())
        })?;
        self.for_command(command)
            .get(diagram_state)
            .copied()
            .ok_or_else(|| ClientError::DiagramGap(format!("{:?}", diagram_state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_for(command: FtpCommand, code: u16) -> ProtocolState {
        let diagrams = TransitionDiagrams::build();
        let kind = FtpResponseKind::from_code(code).unwrap();
        diagrams
            .next_state(&DiagramState::new(Some(command), Some(kind)))
            .unwrap()
    }

    #[test]
    fn test_simple_commands_treat_preliminary_as_error() {
        assert_eq!(state_for(FtpCommand::CWD, 150), ProtocolState::ERROR);
        assert_eq!(state_for(FtpCommand::CWD, 250), ProtocolState::SUCCESS);
        assert_eq!(state_for(FtpCommand::CWD, 331), ProtocolState::ERROR);
        assert_eq!(state_for(FtpCommand::CWD, 550), ProtocolState::FAILURE);
    }

    #[test]
    fn test_transfer_commands_wait_on_preliminary() {
        assert_eq!(state_for(FtpCommand::RETR, 150), ProtocolState::WAIT);
        assert_eq!(state_for(FtpCommand::LIST, 125), ProtocolState::WAIT);
        assert_eq!(state_for(FtpCommand::RETR, 226), ProtocolState::SUCCESS);
        assert_eq!(state_for(FtpCommand::LIST, 425), ProtocolState::FAILURE);
    }

    #[test]
    fn test_auth_intermediate_returns_to_begin() {
        assert_eq!(state_for(FtpCommand::USER, 331), ProtocolState::BEGIN);
        assert_eq!(state_for(FtpCommand::PASS, 332), ProtocolState::BEGIN);
        assert_eq!(state_for(FtpCommand::USER, 230), ProtocolState::SUCCESS);
        assert_eq!(state_for(FtpCommand::PASS, 530), ProtocolState::FAILURE);
    }

    #[test]
    fn test_every_pair_has_a_transition() {
        let diagrams = TransitionDiagrams::build();
        for command in FtpCommand::all() {
            for response in FtpResponseKind::all() {
                let key = DiagramState::new(Some(*command), Some(*response));
                assert!(diagrams.next_state(&key).is_ok());
            }
        }
    }

    #[test]
    fn test_missing_command_is_a_gap() {
        let diagrams = TransitionDiagrams::build();
        let key = DiagramState::new(None, Some(FtpResponseKind::CommandOk));
        assert!(matches!(
            diagrams.next_state(&key),
            Err(ClientError::DiagramGap(_))
        ));
    }
}
