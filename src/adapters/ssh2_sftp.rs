//! SSH/SFTP password file source.
//!
//! Connects to a harvester host with password authentication, directly or
//! through a SOCKS5 proxy, and reads the password history file into memory.
//! Host keys are not verified.
//!
//! Connecting and every blocking SSH call are bounded by a timeout, so a
//! harvester that stalls costs at most that long.

use socks::Socks5Stream;
use ssh2::Session;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Config, ProxyConfig};
use crate::models::HarvesterConfig;
use crate::traits::{PasswordFileSource, SftpError};

/// Bound on connecting and on each blocking SSH operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production [`PasswordFileSource`] backed by `ssh2`.
#[derive(Debug, Clone)]
pub struct Ssh2PasswordFileSource {
    proxy: Option<ProxyConfig>,
    timeout: Duration,
}

impl Default for Ssh2PasswordFileSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Ssh2PasswordFileSource {
    /// Create a source that tunnels through `proxy` when one is given.
    pub fn new(proxy: Option<ProxyConfig>) -> Self {
        Self {
            proxy,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replace [`DEFAULT_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create a source using the proxy settings of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.proxy.clone())
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    /// Open a TCP stream to the harvester, through the proxy if configured.
    fn connect_tcp(&self, host: &str, port: u16) -> Result<TcpStream, SftpError> {
        match &self.proxy {
            Some(proxy) => {
                debug!(
                    "Tunnelling to {}:{} through SOCKS5 proxy {}:{}",
                    host, port, proxy.hostname, proxy.port
                );
                let proxy_addr = (proxy.hostname.as_str(), proxy.port);
                let stream = match proxy.credentials() {
                    Some((user, password)) => {
                        Socks5Stream::connect_with_password(proxy_addr, (host, port), user, password)
                    }
                    None => Socks5Stream::connect(proxy_addr, (host, port)),
                }
                .map_err(|e| SftpError::Proxy(e.to_string()))?;
                Ok(stream.into_inner())
            }
            None => self.connect_direct(host, port),
        }
    }

    /// Try each resolved address in turn, each bounded by the timeout.
    fn connect_direct(&self, host: &str, port: u16) -> Result<TcpStream, SftpError> {
        let connection_error = |e: std::io::Error| {
            SftpError::Connection(format!("{}:{}: {}", host, port, e))
        };
        let mut last_error = None;
        for addr in (host, port).to_socket_addrs().map_err(connection_error)? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }
        Err(match last_error {
            Some(e) => connection_error(e),
            None => SftpError::Connection(format!("{}:{}: no address", host, port)),
        })
    }
}

impl PasswordFileSource for Ssh2PasswordFileSource {
    fn fetch_password_file(&self, harvester: &HarvesterConfig) -> Result<String, SftpError> {
        let tcp = self.connect_tcp(&harvester.host, harvester.port)?;
        let connection = SftpConnection::open(tcp, harvester, self.timeout)?;
        connection.read_to_string(harvester.password_file_path())
    }
}

/// An authenticated SSH session to one harvester.
///
/// The session is disconnected when the value is dropped, whether or not
/// the download succeeded.
struct SftpConnection {
    session: Session,
    host: String,
}

impl SftpConnection {
    fn open(
        tcp: TcpStream,
        harvester: &HarvesterConfig,
        timeout: Duration,
    ) -> Result<Self, SftpError> {
        let mut session = Session::new()
            .map_err(|e| SftpError::Connection(format!("Failed to create session: {}", e)))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));

        // From here on the guard owns the session and closes it on every path.
        let mut connection = Self {
            session,
            host: harvester.host.clone(),
        };

        connection
            .session
            .handshake()
            .map_err(|e| SftpError::Connection(format!("Handshake failed: {}", e)))?;
        connection
            .session
            .userauth_password(&harvester.username, &harvester.password)
            .map_err(|e| SftpError::Auth(e.to_string()))?;
        if !connection.session.authenticated() {
            return Err(SftpError::Auth(
                "Not authenticated after userauth_password".to_string(),
            ));
        }

        Ok(connection)
    }

    fn read_to_string(&self, remote_path: &str) -> Result<String, SftpError> {
        let sftp = self
            .session
            .sftp()
            .map_err(|e| SftpError::Protocol(format!("Failed to create SFTP session: {}", e)))?;

        let mut remote_file = sftp
            .open(Path::new(remote_path))
            .map_err(|e| SftpError::Protocol(format!("Failed to open {}: {}", remote_path, e)))?;

        let mut buffer = Vec::new();
        remote_file
            .read_to_end(&mut buffer)
            .map_err(|e| SftpError::Protocol(format!("Failed to read {}: {}", remote_path, e)))?;

        String::from_utf8(buffer)
            .map_err(|e| SftpError::Io(format!("{} is not valid UTF-8: {}", remote_path, e)))
    }
}

impl Drop for SftpConnection {
    fn drop(&mut self) {
        info!("Connection to {} is about to be closed.", self.host);
        if let Err(e) = self.session.disconnect(None, "password sync done", None) {
            debug!("Disconnect from {} failed: {}", self.host, e);
        }
    }
}
