//! Runtime configuration read from the environment.
//!
//! The configuration is built once at process start and handed to every
//! component. No component reads the environment on its own.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `SATURN_REST_ENDPOINT` | Saturn base URL | `http://no-server` |
//! | `PASSWORD_CHANGE_ENABLED_SFTP_HOSTS` | JSON array of host names | `[]` |
//! | `PROXY_HOSTNAME` | SOCKS5 proxy host; no proxy when unset | - |
//! | `PROXY_PORT` | SOCKS5 proxy port | `1080` |
//! | `PROXY_USERNAME` / `PROXY_PASSWORD` | SOCKS5 credentials | - |

use thiserror::Error;

pub const SATURN_REST_ENDPOINT: &str = "SATURN_REST_ENDPOINT";
pub const PASSWORD_CHANGE_ENABLED_SFTP_HOSTS: &str = "PASSWORD_CHANGE_ENABLED_SFTP_HOSTS";
pub const PROXY_HOSTNAME: &str = "PROXY_HOSTNAME";
pub const PROXY_PORT: &str = "PROXY_PORT";
pub const PROXY_USERNAME: &str = "PROXY_USERNAME";
pub const PROXY_PASSWORD: &str = "PROXY_PASSWORD";

pub const DEFAULT_SATURN_REST_ENDPOINT: &str = "http://no-server";
pub const DEFAULT_PROXY_PORT: u16 = 1080;

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PASSWORD_CHANGE_ENABLED_SFTP_HOSTS must be a JSON array of host names, got '{value}': {source}")]
    InvalidHostList {
        value: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("PROXY_PORT must be a port number, got '{0}'")]
    InvalidProxyPort(String),
}

/// SOCKS5 proxy used to reach harvester hosts.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub hostname: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(hostname: impl Into<String>, port: u16) -> Self {
        Self {
            hostname: hostname.into(),
            port,
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Username and password for the proxy handshake, when a username is set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref().unwrap_or("")))
    }
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "XXXX"))
            .finish()
    }
}

/// Configuration of one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Saturn base URL, without trailing slash
    pub saturn_rest_endpoint: String,
    /// Hosts whose harvesters take part in reconciliation and rotation
    pub password_change_enabled_sftp_hosts: Vec<String>,
    /// SOCKS5 proxy for SFTP connections
    pub proxy: Option<ProxyConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            saturn_rest_endpoint: DEFAULT_SATURN_REST_ENDPOINT.to_string(),
            password_change_enabled_sftp_hosts: Vec::new(),
            proxy: None,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let saturn_rest_endpoint = var(SATURN_REST_ENDPOINT)
            .unwrap_or_else(|| DEFAULT_SATURN_REST_ENDPOINT.to_string());

        let password_change_enabled_sftp_hosts = match var(PASSWORD_CHANGE_ENABLED_SFTP_HOSTS) {
            Some(value) => serde_json::from_str::<Vec<String>>(&value)
                .map_err(|source| ConfigError::InvalidHostList { value, source })?,
            None => Vec::new(),
        };

        let proxy = match var(PROXY_HOSTNAME) {
            Some(hostname) => {
                let port = match var(PROXY_PORT) {
                    Some(port) => port
                        .trim()
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidProxyPort(port.clone()))?,
                    None => DEFAULT_PROXY_PORT,
                };
                Some(ProxyConfig {
                    hostname,
                    port,
                    username: var(PROXY_USERNAME),
                    password: lookup(PROXY_PASSWORD),
                })
            }
            None => None,
        };

        Ok(Self::default()
            .with_saturn_rest_endpoint(saturn_rest_endpoint)
            .with_enabled_hosts(password_change_enabled_sftp_hosts)
            .with_proxy(proxy))
    }

    /// Set the Saturn base URL. A trailing slash is removed.
    pub fn with_saturn_rest_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.saturn_rest_endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Set the hosts enabled for reconciliation and rotation.
    pub fn with_enabled_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.password_change_enabled_sftp_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the SOCKS5 proxy.
    pub fn with_proxy(mut self, proxy: Option<ProxyConfig>) -> Self {
        self.proxy = proxy;
        self
    }

    /// Whether harvesters on `host` take part in the run.
    pub fn is_host_enabled(&self, host: &str) -> bool {
        self.password_change_enabled_sftp_hosts
            .iter()
            .any(|enabled| enabled == host)
    }
}
