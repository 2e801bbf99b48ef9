// src/constants.rs

pub const DEFAULT_CONTROL_PORT: u16 = 21;
pub const CRLF: &str = "\r\n";

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TRANSFER_BUFFER_SIZE: usize = 128 * 1024;

pub const BAD_COMMAND_SYNTAX: &str = "Incorrect command syntax.  See 'help' for details";
