use crate::error::ClientError;
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Every RFC 959 reply code the client understands, by name.
///
/// Unlisted codes are treated as a parse failure rather than silently
/// swallowed, so a misbehaving server surfaces early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FtpResponseKind {
    RestartMarkerReply,
    ServiceWait,
    TransferStartAlreadyOpen,
    FileStatusOkay,
    CommandOk,
    PointlessCmd,
    StatusReply,
    DirStatus,
    FileStatus,
    HelpMessage,
    SystemName,
    NewUserServiceReady,
    ClosingControlConnection,
    DataConnectionOpenNoTransfer,
    ClosingDataConnectionSuccess,
    EnteringPassive,
    EnteringExtendedPassive,
    LoginOk,
    FileActionOk,
    PathnameCreated,
    NeedPass,
    AcctNeeded,
    PendingFurtherInfo,
    NotAvailableClosing,
    CantOpenDataConnection,
    ClosingDataConnectionAbort,
    FileActionNotTaken,
    LocalProcessingError,
    InsufficientStorage,
    UnrecognizedCmd,
    BadCmdParameters,
    UnimplementedCmd,
    BadCmdSequence,
    UnimplementedParam,
    NotLoggedIn,
    AcctNeededToStore,
    FileUnavailable,
    PageTypeUnknown,
    ExceededStorageAllocation,
    FileNameNotAllowed,
}

impl FtpResponseKind {
    pub fn from_code(code: u16) -> Option<FtpResponseKind> {
        match code {
            110 => Some(FtpResponseKind::RestartMarkerReply),
            120 => Some(FtpResponseKind::ServiceWait),
            125 => Some(FtpResponseKind::TransferStartAlreadyOpen),
            150 => Some(FtpResponseKind::FileStatusOkay),
            200 => Some(FtpResponseKind::CommandOk),
            202 => Some(FtpResponseKind::PointlessCmd),
            211 => Some(FtpResponseKind::StatusReply),
            212 => Some(FtpResponseKind::DirStatus),
            213 => Some(FtpResponseKind::FileStatus),
            214 => Some(FtpResponseKind::HelpMessage),
            215 => Some(FtpResponseKind::SystemName),
            220 => Some(FtpResponseKind::NewUserServiceReady),
            221 => Some(FtpResponseKind::ClosingControlConnection),
            225 => Some(FtpResponseKind::DataConnectionOpenNoTransfer),
            226 => Some(FtpResponseKind::ClosingDataConnectionSuccess),
            227 => Some(FtpResponseKind::EnteringPassive),
            229 => Some(FtpResponseKind::EnteringExtendedPassive),
            230 => Some(FtpResponseKind::LoginOk),
            250 => Some(FtpResponseKind::FileActionOk),
            257 => Some(FtpResponseKind::PathnameCreated),
            331 => Some(FtpResponseKind::NeedPass),
            332 => Some(FtpResponseKind::AcctNeeded),
            350 => Some(FtpResponseKind::PendingFurtherInfo),
            421 => Some(FtpResponseKind::NotAvailableClosing),
            425 => Some(FtpResponseKind::CantOpenDataConnection),
            426 => Some(FtpResponseKind::ClosingDataConnectionAbort),
            450 => Some(FtpResponseKind::FileActionNotTaken),
            451 => Some(FtpResponseKind::LocalProcessingError),
            452 => Some(FtpResponseKind::InsufficientStorage),
            500 => Some(FtpResponseKind::UnrecognizedCmd),
            501 => Some(FtpResponseKind::BadCmdParameters),
            502 => Some(FtpResponseKind::UnimplementedCmd),
            503 => Some(FtpResponseKind::BadCmdSequence),
            504 => Some(FtpResponseKind::UnimplementedParam),
            530 => Some(FtpResponseKind::NotLoggedIn),
            532 => Some(FtpResponseKind::AcctNeededToStore),
            550 => Some(FtpResponseKind::FileUnavailable),
            551 => Some(FtpResponseKind::PageTypeUnknown),
            552 => Some(FtpResponseKind::ExceededStorageAllocation),
            553 => Some(FtpResponseKind::FileNameNotAllowed),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            FtpResponseKind::RestartMarkerReply => 110,
            FtpResponseKind::ServiceWait => 120,
            FtpResponseKind::TransferStartAlreadyOpen => 125,
            FtpResponseKind::FileStatusOkay => 150,
            FtpResponseKind::CommandOk => 200,
            FtpResponseKind::PointlessCmd => 202,
            FtpResponseKind::StatusReply => 211,
            FtpResponseKind::DirStatus => 212,
            FtpResponseKind::FileStatus => 213,
            FtpResponseKind::HelpMessage => 214,
            FtpResponseKind::SystemName => 215,
            FtpResponseKind::NewUserServiceReady => 220,
            FtpResponseKind::ClosingControlConnection => 221,
            FtpResponseKind::DataConnectionOpenNoTransfer => 225,
            FtpResponseKind::ClosingDataConnectionSuccess => 226,
            FtpResponseKind::EnteringPassive => 227,
            FtpResponseKind::EnteringExtendedPassive => 229,
            FtpResponseKind::LoginOk => 230,
            FtpResponseKind::FileActionOk => 250,
            FtpResponseKind::PathnameCreated => 257,
            FtpResponseKind::NeedPass => 331,
            FtpResponseKind::AcctNeeded => 332,
            FtpResponseKind::PendingFurtherInfo => 350,
            FtpResponseKind::NotAvailableClosing => 421,
            FtpResponseKind::CantOpenDataConnection => 425,
            FtpResponseKind::ClosingDataConnectionAbort => 426,
            FtpResponseKind::FileActionNotTaken => 450,
            FtpResponseKind::LocalProcessingError => 451,
            FtpResponseKind::InsufficientStorage => 452,
            FtpResponseKind::UnrecognizedCmd => 500,
            FtpResponseKind::BadCmdParameters => 501,
            FtpResponseKind::UnimplementedCmd => 502,
            FtpResponseKind::BadCmdSequence => 503,
            FtpResponseKind::UnimplementedParam => 504,
            FtpResponseKind::NotLoggedIn => 530,
            FtpResponseKind::AcctNeededToStore => 532,
            FtpResponseKind::FileUnavailable => 550,
            FtpResponseKind::PageTypeUnknown => 551,
            FtpResponseKind::ExceededStorageAllocation => 552,
            FtpResponseKind::FileNameNotAllowed => 553,
        }
    }

    /// Fallback text for servers that send a bare reply code.
    pub fn canned_message(&self) -> &'static str {
        match self {
            FtpResponseKind::RestartMarkerReply => "Restart marker reply.",
            FtpResponseKind::ServiceWait => "Service ready in nnn minutes.",
            FtpResponseKind::TransferStartAlreadyOpen => {
                "Data connection already open; transfer starting."
            }
            FtpResponseKind::FileStatusOkay => {
                "File status okay; about to open data connection."
            }
            FtpResponseKind::CommandOk => "Command okay.",
            FtpResponseKind::PointlessCmd => {
                "Command not implemented, superfluous at this site."
            }
            FtpResponseKind::StatusReply => "System status or help reply",
            FtpResponseKind::DirStatus => "Directory status.",
            FtpResponseKind::FileStatus => "File status.",
            FtpResponseKind::HelpMessage => "Help message.",
            FtpResponseKind::SystemName => "NAME system type.",
            FtpResponseKind::NewUserServiceReady => "Service ready for new user.",
            FtpResponseKind::ClosingControlConnection => {
                "Service closing control connection."
            }
            FtpResponseKind::DataConnectionOpenNoTransfer => {
                "Data connection open; no transfer in progress."
            }
            FtpResponseKind::ClosingDataConnectionSuccess => {
                "Closing data connection; transfer complete."
            }
            FtpResponseKind::EnteringPassive => {
                "Entering Passive Mode (h1,h2,h3,h4,p1,p2)."
            }
            FtpResponseKind::EnteringExtendedPassive => {
                "Entering Extended Passive Mode (|||port|)."
            }
            FtpResponseKind::LoginOk => "User logged in, proceed.",
            FtpResponseKind::FileActionOk => "Requested file action okay, completed.",
            FtpResponseKind::PathnameCreated => "Pathname created.",
            FtpResponseKind::NeedPass => "User name okay, need password.",
            FtpResponseKind::AcctNeeded => "Need account for login.",
            FtpResponseKind::PendingFurtherInfo => {
                "Requested file action pending further information."
            }
            FtpResponseKind::NotAvailableClosing => {
                "Service not available, closing control connection."
            }
            FtpResponseKind::CantOpenDataConnection => "Can't open data connection.",
            FtpResponseKind::ClosingDataConnectionAbort => {
                "Connection closed; transfer aborted."
            }
            FtpResponseKind::FileActionNotTaken => "Requested file action not taken.",
            FtpResponseKind::LocalProcessingError => {
                "Requested action aborted: local error in processing."
            }
            FtpResponseKind::InsufficientStorage => {
                "Requested action not taken. Insufficient storage space in system."
            }
            FtpResponseKind::UnrecognizedCmd => "Syntax error, command unrecognized.",
            FtpResponseKind::BadCmdParameters => "Syntax error parameters or arguments.",
            FtpResponseKind::UnimplementedCmd => "Command not implemented.",
            FtpResponseKind::BadCmdSequence => "Bad sequence of commands.",
            FtpResponseKind::UnimplementedParam => {
                "Command not implemented for that parameter."
            }
            FtpResponseKind::NotLoggedIn => "Not logged in.",
            FtpResponseKind::AcctNeededToStore => "Need account for storing files.",
            FtpResponseKind::FileUnavailable => {
                "Requested action not taken. File unavailable."
            }
            FtpResponseKind::PageTypeUnknown => "Requested action aborted: page type unknown.",
            FtpResponseKind::ExceededStorageAllocation => {
                "Requested file action aborted. Exceeded storage allocation."
            }
            FtpResponseKind::FileNameNotAllowed => {
                "Requested action not taken. File name not allowed."
            }
        }
    }

    pub fn all() -> &'static [FtpResponseKind] {
        &[
            FtpResponseKind::RestartMarkerReply,
            FtpResponseKind::ServiceWait,
            FtpResponseKind::TransferStartAlreadyOpen,
            FtpResponseKind::FileStatusOkay,
            FtpResponseKind::CommandOk,
            FtpResponseKind::PointlessCmd,
            FtpResponseKind::StatusReply,
            FtpResponseKind::DirStatus,
            FtpResponseKind::FileStatus,
            FtpResponseKind::HelpMessage,
            FtpResponseKind::SystemName,
            FtpResponseKind::NewUserServiceReady,
            FtpResponseKind::ClosingControlConnection,
            FtpResponseKind::DataConnectionOpenNoTransfer,
            FtpResponseKind::ClosingDataConnectionSuccess,
            FtpResponseKind::EnteringPassive,
            FtpResponseKind::EnteringExtendedPassive,
            FtpResponseKind::LoginOk,
            FtpResponseKind::FileActionOk,
            FtpResponseKind::PathnameCreated,
            FtpResponseKind::NeedPass,
            FtpResponseKind::AcctNeeded,
            FtpResponseKind::PendingFurtherInfo,
            FtpResponseKind::NotAvailableClosing,
            FtpResponseKind::CantOpenDataConnection,
            FtpResponseKind::ClosingDataConnectionAbort,
            FtpResponseKind::FileActionNotTaken,
            FtpResponseKind::LocalProcessingError,
            FtpResponseKind::InsufficientStorage,
            FtpResponseKind::UnrecognizedCmd,
            FtpResponseKind::BadCmdParameters,
            FtpResponseKind::UnimplementedCmd,
            FtpResponseKind::BadCmdSequence,
            FtpResponseKind::UnimplementedParam,
            FtpResponseKind::NotLoggedIn,
            FtpResponseKind::AcctNeededToStore,
            FtpResponseKind::FileUnavailable,
            FtpResponseKind::PageTypeUnknown,
            FtpResponseKind::ExceededStorageAllocation,
            FtpResponseKind::FileNameNotAllowed,
        ]
    }
}

/// A fully parsed server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    pub kind: FtpResponseKind,
    pub code: u16,
    pub message: String,
}

/// Parses raw control-channel replies and the PASV/EPSV address tuples
/// buried inside them.
pub struct ResponseParser {
    reply_line: Regex,
    pasv_tuple: Regex,
    epsv_tuple: Regex,
}

impl ResponseParser {
    pub fn new() -> Self {
        ResponseParser {
            reply_line: Regex::new(r"^(\d{3})(?:([ -])(.*))?$").unwrap(),
            pasv_tuple: Regex::new(r"\((\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})\)")
                .unwrap(),
            epsv_tuple: Regex::new(r"\(\|\|\|(\d{1,5})\|\)").unwrap(),
        }
    }

    /// Parse a complete (possibly multi-line) reply into its kind and
    /// joined message text.
    pub fn parse(&self, raw: &str) -> Result<FtpReply, ClientError> {
        let first = raw
            .lines()
            .next()
            .ok_or_else(|| ClientError::Parse("empty response".to_string()))?;
        let captures = self
            .reply_line
            .captures(first)
            .ok_or_else(|| ClientError::Parse(raw.to_string()))?;
        let code: u16 = captures[1]
            .parse()
            .map_err(|_| ClientError::Parse(raw.to_string()))?;
        let kind = FtpResponseKind::from_code(code).ok_or_else(|| {
            ClientError::Parse(format!("unrecognized reply code {} in {:?}", code, first))
        })?;

        let message = raw
            .lines()
            .map(strip_reply_prefix)
            .collect::<Vec<&str>>()
            .join("\n");

        Ok(FtpReply {
            kind,
            code,
            message,
        })
    }

    /// Pull the `(h1,h2,h3,h4,p1,p2)` tuple out of a 227 reply.
    pub fn parse_passive_target(&self, message: &str) -> Result<(String, u16), ClientError> {
        let captures = self
            .pasv_tuple
            .captures(message)
            .ok_or_else(|| ClientError::Parse(message.to_string()))?;
        let mut octets = [0u8; 6];
        for (slot, capture) in octets.iter_mut().zip(captures.iter().skip(1)) {
            let digits = capture.map(|m| m.as_str()).unwrap_or("");
            *slot = digits
                .parse()
                .map_err(|_| ClientError::Parse(message.to_string()))?;
        }
        let host = format!("{}.{}.{}.{}", octets[0], octets[1], octets[2], octets[3]);
        let port = u16::from(octets[4]) * 256 + u16::from(octets[5]);
        Ok((host, port))
    }

    /// Pull the `(|||port|)` tuple out of a 229 reply.
    pub fn parse_extended_passive_port(&self, message: &str) -> Result<u16, ClientError> {
        let captures = self
            .epsv_tuple
            .captures(message)
            .ok_or_else(|| ClientError::Parse(message.to_string()))?;
        captures[1]
            .parse()
            .map_err(|_| ClientError::Parse(message.to_string()))
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        ResponseParser::new()
    }
}

/// Read one complete reply off the control connection, joining the lines
/// of a multi-line reply with CRLF.
///
/// A reply is multi-line when its first line is `ddd-text`; it ends at the
/// first following line that starts with three digits not followed by a
/// hyphen.
pub async fn read_raw_response<R>(reader: &mut R) -> Result<String, ClientError>
where
    R: AsyncBufRead + Unpin,
{
    let first = read_trimmed_line(reader).await?;
    let mut lines = vec![first];
    if is_continuation_start(&lines[0]) {
        loop {
            let line = read_trimmed_line(reader).await?;
            let done = is_terminator(&line);
            lines.push(line);
            if done {
                break;
            }
        }
    }
    Ok(lines.join("\r\n"))
}

async fn read_trimmed_line<R>(reader: &mut R) -> Result<String, ClientError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        return Err(ClientError::Connection(
            "Control connection closed by server".to_string(),
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

fn is_continuation_start(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 4 && bytes[..3].iter().all(u8::is_ascii_digit) && bytes[3] == b'-'
}

fn is_terminator(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return false;
    }
    bytes.len() == 3 || bytes[3] != b'-'
}

fn strip_reply_prefix(line: &str) -> &str {
    let bytes = line.as_bytes();
    if bytes.len() >= 3 && bytes[..3].iter().all(u8::is_ascii_digit) {
        match bytes.get(3) {
            Some(b' ') | Some(b'-') => return &line[4..],
            None => return "",
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn test_parse_single_line() {
        let parser = ResponseParser::new();
        let reply = parser.parse("220 Service ready for new user.").unwrap();
        assert_eq!(reply.kind, FtpResponseKind::NewUserServiceReady);
        assert_eq!(reply.code, 220);
        assert_eq!(reply.message, "Service ready for new user.");
    }

    #[test]
    fn test_parse_joins_multi_line_text() {
        let parser = ResponseParser::new();
        let raw = "150-Opening ASCII mode data connection\r\nfor file list\r\n150 Transfer starting.";
        let reply = parser.parse(raw).unwrap();
        assert_eq!(reply.kind, FtpResponseKind::FileStatusOkay);
        assert_eq!(
            reply.message,
            "Opening ASCII mode data connection\nfor file list\nTransfer starting."
        );
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        let parser = ResponseParser::new();
        assert!(parser.parse("").is_err());
        assert!(parser.parse("1502 four digit code").is_err());
        assert!(parser.parse("hello there").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_code() {
        let parser = ResponseParser::new();
        assert!(parser.parse("612 Made up reply.").is_err());
    }

    #[test]
    fn test_parse_bare_code_has_empty_message() {
        let parser = ResponseParser::new();
        let reply = parser.parse("230").unwrap();
        assert_eq!(reply.kind, FtpResponseKind::LoginOk);
        assert_eq!(reply.message, "");
    }

    #[test]
    fn test_passive_target() {
        let parser = ResponseParser::new();
        let (host, port) = parser
            .parse_passive_target("Entering Passive Mode (127,0,0,1,200,100).")
            .unwrap();
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 51300);
    }

    #[test]
    fn test_passive_target_rejects_oversized_octet() {
        let parser = ResponseParser::new();
        assert!(parser
            .parse_passive_target("Entering Passive Mode (300,0,0,1,2,3).")
            .is_err());
        assert!(parser.parse_passive_target("no tuple here").is_err());
    }

    #[test]
    fn test_extended_passive_port() {
        let parser = ResponseParser::new();
        let port = parser
            .parse_extended_passive_port("Entering Extended Passive Mode (|||51300|)")
            .unwrap();
        assert_eq!(port, 51300);
        assert!(parser.parse_extended_passive_port("(|||99999|)").is_err());
    }

    #[test]
    fn test_every_kind_round_trips_through_code() {
        for kind in FtpResponseKind::all() {
            assert_eq!(FtpResponseKind::from_code(kind.code()), Some(*kind));
        }
    }

    #[tokio::test]
    async fn test_read_raw_response_single_line() {
        let mut reader = BufReader::new(&b"200 Command okay.\r\n"[..]);
        let raw = read_raw_response(&mut reader).await.unwrap();
        assert_eq!(raw, "200 Command okay.");
    }

    #[tokio::test]
    async fn test_read_raw_response_multi_line() {
        let input = b"211-Status follows\r\n Connected from somewhere\r\n211 End of status\r\n";
        let mut reader = BufReader::new(&input[..]);
        let raw = read_raw_response(&mut reader).await.unwrap();
        assert_eq!(
            raw,
            "211-Status follows\r\n Connected from somewhere\r\n211 End of status"
        );
    }

    #[tokio::test]
    async fn test_read_raw_response_skips_hyphen_continuations() {
        let input = b"214-Commands:\r\n214-USER PASS\r\n214 Help OK.\r\n";
        let mut reader = BufReader::new(&input[..]);
        let raw = read_raw_response(&mut reader).await.unwrap();
        assert_eq!(raw, "214-Commands:\r\n214-USER PASS\r\n214 Help OK.");
    }

    #[tokio::test]
    async fn test_read_raw_response_eof_is_connection_error() {
        let mut reader = BufReader::new(&b""[..]);
        let result = read_raw_response(&mut reader).await;
        assert!(matches!(result, Err(ClientError::Connection(_))));
    }
}
