//! Password file source trait abstraction.
//!
//! The reconciliation pass only needs the raw text of a harvester's password
//! history file. This trait hides how that text is obtained so the SSH/SFTP
//! transport can be replaced by an in-memory double in tests.

use crate::models::HarvesterConfig;

/// Errors raised while fetching a password file from a harvester.
///
/// Every variant is recoverable: the caller records it against the harvester
/// and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SftpError {
    /// The SOCKS5 proxy refused or failed the tunnel
    Proxy(String),
    /// TCP connection or SSH handshake failed
    Connection(String),
    /// SSH password authentication failed
    Auth(String),
    /// SFTP subsystem or remote file operation failed
    Protocol(String),
    /// Reading the downloaded content failed
    Io(String),
    /// Anything else
    Other(String),
}

impl SftpError {
    /// Whether this error came from the SSH layer rather than the proxy or
    /// local I/O.
    pub fn is_ssh(&self) -> bool {
        matches!(
            self,
            SftpError::Connection(_) | SftpError::Auth(_) | SftpError::Protocol(_)
        )
    }
}

impl std::fmt::Display for SftpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SftpError::Proxy(msg) => write!(f, "SOCKS5 proxy error: {}", msg),
            SftpError::Connection(msg) => write!(f, "SSH connection failed: {}", msg),
            SftpError::Auth(msg) => write!(f, "SSH authentication failed: {}", msg),
            SftpError::Protocol(msg) => write!(f, "SFTP operation failed: {}", msg),
            SftpError::Io(msg) => write!(f, "Failed to read file: {}", msg),
            SftpError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SftpError {}

/// Source of harvester password history files.
pub trait PasswordFileSource {
    /// Download the password file of `harvester` and return it as text.
    ///
    /// The file is named after the harvester's username and lives in the
    /// login directory of that user.
    fn fetch_password_file(&self, harvester: &HarvesterConfig) -> Result<String, SftpError>;
}
