//! In-memory password file source for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::HarvesterConfig;
use crate::traits::{PasswordFileSource, SftpError};

/// Password file source serving configured contents or errors per
/// `(host, username)`.
///
/// Unconfigured harvesters fail with a connection error, as an unreachable
/// host would.
#[derive(Debug, Clone, Default)]
pub struct MockPasswordFileSource {
    files: Arc<Mutex<HashMap<(String, String), Result<String, SftpError>>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockPasswordFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `contents` for the file of `username` on `host`.
    pub fn set_file(&self, host: &str, username: &str, contents: &str) {
        self.files.lock().unwrap().insert(
            (host.to_string(), username.to_string()),
            Ok(contents.to_string()),
        );
    }

    /// Fail the fetch of `username` on `host` with `error`.
    pub fn set_error(&self, host: &str, username: &str, error: SftpError) {
        self.files
            .lock()
            .unwrap()
            .insert((host.to_string(), username.to_string()), Err(error));
    }

    /// Names of the harvesters fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

impl PasswordFileSource for MockPasswordFileSource {
    fn fetch_password_file(&self, harvester: &HarvesterConfig) -> Result<String, SftpError> {
        self.fetched.lock().unwrap().push(harvester.name.clone());
        let key = (harvester.host.clone(), harvester.username.clone());
        self.files
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(SftpError::Connection(format!(
                    "no route to {}:{}",
                    harvester.host, harvester.port
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvester() -> HarvesterConfig {
        HarvesterConfig {
            name: "dbc".to_string(),
            host: "sftp.example.com".to_string(),
            username: "harvest".to_string(),
            password: "secret".to_string(),
            port: 22,
        }
    }

    #[test]
    fn test_serves_configured_file() {
        let source = MockPasswordFileSource::new();
        source.set_file("sftp.example.com", "harvest", "01/01/2024 - pw1");
        assert_eq!(
            source.fetch_password_file(&harvester()).unwrap(),
            "01/01/2024 - pw1"
        );
        assert_eq!(source.fetched(), vec!["dbc"]);
    }

    #[test]
    fn test_unconfigured_is_connection_error() {
        let source = MockPasswordFileSource::new();
        assert!(matches!(
            source.fetch_password_file(&harvester()),
            Err(SftpError::Connection(_))
        ));
    }
}
