/// The protocol-level FTP verbs the client can put on the wire.
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    CWD,
    CDUP,
    QUIT,
    PASV,
    EPSV,
    PORT,
    EPRT,
    RETR,
    PWD,
    LIST,
    HELP,
    NOOP,
}

impl FtpCommand {
    pub fn verb(&self) -> &'static str {
        match self {
            FtpCommand::USER => "USER",
            FtpCommand::PASS => "PASS",
            FtpCommand::CWD => "CWD",
            FtpCommand::CDUP => "CDUP",
            FtpCommand::QUIT => "QUIT",
            FtpCommand::PASV => "PASV",
            FtpCommand::EPSV => "EPSV",
            FtpCommand::PORT => "PORT",
            FtpCommand::EPRT => "EPRT",
            FtpCommand::RETR => "RETR",
            FtpCommand::PWD => "PWD",
            FtpCommand::LIST => "LIST",
            FtpCommand::HELP => "HELP",
            FtpCommand::NOOP => "NOOP",
        }
    }

    /// The full command line as sent to the server, without the trailing
    /// CRLF (the control connection appends it).
    pub fn wire_line(&self, arg: Option<&str>) -> String {
        match arg {
            Some(arg) if !arg.is_empty() => format!("{} {}", self.verb(), arg),
            _ => self.verb().to_string(),
        }
    }

    pub fn all() -> &'static [FtpCommand] {
        &[
            FtpCommand::USER,
            FtpCommand::PASS,
            FtpCommand::CWD,
            FtpCommand::CDUP,
            FtpCommand::QUIT,
            FtpCommand::PASV,
            FtpCommand::EPSV,
            FtpCommand::PORT,
            FtpCommand::EPRT,
            FtpCommand::RETR,
            FtpCommand::PWD,
            FtpCommand::LIST,
            FtpCommand::HELP,
            FtpCommand::NOOP,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_line_with_arg() {
        assert_eq!(
            FtpCommand::USER.wire_line(Some("anonymous")),
            "USER anonymous"
        );
        assert_eq!(FtpCommand::CWD.wire_line(Some("/pub")), "CWD /pub");
    }

    #[test]
    fn test_wire_line_without_arg() {
        assert_eq!(FtpCommand::PASV.wire_line(None), "PASV");
        assert_eq!(FtpCommand::LIST.wire_line(Some("")), "LIST");
    }

    #[test]
    fn test_all_covers_every_verb() {
        assert_eq!(FtpCommand::all().len(), 14);
    }
}
