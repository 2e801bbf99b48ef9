use std::fmt;

use crate::error::ClientError;

/// A `host[:port]` endpoint. The standard FTP control port is assumed
/// when the spec string omits one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub host: String,
    pub port: u16,
}

impl HostSpec {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Parses `host` or `host:port`.
    pub fn parse(spec: &str, default_port: u16) -> Result<Self, ClientError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(ClientError::Parse(format!(
                "Could not parse connection host: {:?}",
                spec
            )));
        }

        match spec.rsplit_once(':') {
            None => Ok(Self::new(spec.to_string(), default_port)),
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(ClientError::Parse(format!(
                        "Could not parse connection host: {:?}",
                        spec
                    )));
                }
                let port = port.parse().map_err(|_| {
                    ClientError::Parse(format!("Could not parse connection host: {:?}", spec))
                })?;
                Ok(Self::new(host.to_string(), port))
            }
        }
    }

    /// Address tuple for the tokio connectors.
    pub fn addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        let spec = HostSpec::parse("ftp.example.com", 21).unwrap();
        assert_eq!(spec.host, "ftp.example.com");
        assert_eq!(spec.port, 21);
    }

    #[test]
    fn test_explicit_port() {
        let spec = HostSpec::parse("ftp.example.com:2121", 21).unwrap();
        assert_eq!(spec.host, "ftp.example.com");
        assert_eq!(spec.port, 2121);
    }

    #[test]
    fn test_bad_port_fails() {
        assert!(HostSpec::parse("ftp.example.com:banana", 21).is_err());
        assert!(HostSpec::parse("ftp.example.com:99999", 21).is_err());
    }

    #[test]
    fn test_empty_fails() {
        assert!(HostSpec::parse("", 21).is_err());
        assert!(HostSpec::parse(":2121", 21).is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let spec = HostSpec::parse("127.0.0.1:2121", 21).unwrap();
        assert_eq!(spec.to_string(), "127.0.0.1:2121");
    }
}
