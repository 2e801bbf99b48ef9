use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_protocol::response::FtpResponseKind;

/// Where the protocol machine sits relative to the current command.
///
/// BEGIN means ready for a new command. WAIT means a preliminary reply
/// arrived and the final one is still outstanding. SUCCESS and ERROR are
/// terminal outcomes that drop straight back to BEGIN; FAILURE is the
/// terminal outcome that surfaces as an error to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    BEGIN,
    WAIT,
    SUCCESS,
    ERROR,
    FAILURE,
}

/// The (command, response) pair the transition diagrams key on.
///
/// `command` is set when a command is dispatched and `response` every time
/// a reply is parsed off the control connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DiagramState {
    pub command: Option<FtpCommand>,
    pub response: Option<FtpResponseKind>,
}

impl DiagramState {
    pub fn new(command: Option<FtpCommand>, response: Option<FtpResponseKind>) -> Self {
        DiagramState { command, response }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_pair() {
        let state = DiagramState::default();
        assert_eq!(state.command, None);
        assert_eq!(state.response, None);
    }

    #[test]
    fn test_equal_pairs_hash_alike() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(
            DiagramState::new(Some(FtpCommand::USER), Some(FtpResponseKind::NeedPass)),
            ProtocolState::BEGIN,
        );
        let probe = DiagramState::new(Some(FtpCommand::USER), Some(FtpResponseKind::NeedPass));
        assert_eq!(map.get(&probe), Some(&ProtocolState::BEGIN));
    }
}
