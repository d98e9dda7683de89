//! SFTP harvester configuration records.
//!
//! Saturn exposes every SFTP harvester it knows through
//! `GET configs/sftp/list`. The same record is written back through
//! `POST configs/sftp/add` when a rotated password is applied.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A harvester config as stored by Saturn.
///
/// Only the fields this tool reads or writes are typed. Everything else
/// (`id`, `schedule`, `dir`, `filesPattern`, ...) is kept in `extra` and
/// echoed back unchanged on save, so a rotation never drops settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SftpConfigEntry {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Plaintext password currently used to log in.
    pub password: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SftpConfigEntry {
    /// Whether this config targets `host`.
    pub fn is_for_host(&self, host: &str) -> bool {
        self.host == host
    }
}

/// Connection details of a harvester host holding a password history file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HarvesterConfig {
    pub name: String,
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

impl HarvesterConfig {
    /// Remote path of the password history file, relative to the login
    /// directory. It is named after the login user.
    pub fn password_file_path(&self) -> &str {
        &self.username
    }
}

impl From<&SftpConfigEntry> for HarvesterConfig {
    fn from(entry: &SftpConfigEntry) -> Self {
        Self {
            name: entry.name.clone(),
            host: entry.host.clone(),
            username: entry.username.clone(),
            password: entry.password.clone(),
            port: entry.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_json() -> Value {
        json!({
            "id": 7,
            "name": "dbc-sftp",
            "host": "sftp.example.com",
            "port": 22,
            "username": "harvest",
            "password": "secret",
            "dir": "in",
            "filesPattern": "*.xml",
            "enabled": true
        })
    }

    #[test]
    fn test_sftp_config_entry_deserialize() {
        let entry: SftpConfigEntry = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(entry.name, "dbc-sftp");
        assert_eq!(entry.host, "sftp.example.com");
        assert_eq!(entry.port, 22);
        assert_eq!(entry.username, "harvest");
        assert_eq!(entry.password, "secret");
        assert_eq!(entry.extra.get("id"), Some(&json!(7)));
        assert_eq!(entry.extra.get("filesPattern"), Some(&json!("*.xml")));
    }

    #[test]
    fn test_sftp_config_entry_preserves_unknown_fields() {
        let mut entry: SftpConfigEntry = serde_json::from_value(sample_json()).unwrap();
        entry.password = "rotated".to_string();

        let value = serde_json::to_value(&entry).unwrap();
        let mut expected = sample_json();
        expected["password"] = json!("rotated");
        assert_eq!(value, expected);
    }

    #[test]
    fn test_sftp_config_entry_missing_required_field() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("host");
        let result = serde_json::from_value::<SftpConfigEntry>(value);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("host"));
    }

    #[test]
    fn test_harvester_config_ignores_extra_fields() {
        let harvester: HarvesterConfig = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(harvester.name, "dbc-sftp");
        assert_eq!(harvester.port, 22);
        assert_eq!(harvester.password_file_path(), "harvest");
    }

    #[test]
    fn test_harvester_config_from_entry() {
        let entry: SftpConfigEntry = serde_json::from_value(sample_json()).unwrap();
        let harvester = HarvesterConfig::from(&entry);
        assert_eq!(harvester.host, entry.host);
        assert_eq!(harvester.username, entry.username);
        assert_eq!(harvester.password, entry.password);
    }

    #[test]
    fn test_is_for_host() {
        let entry: SftpConfigEntry = serde_json::from_value(sample_json()).unwrap();
        assert!(entry.is_for_host("sftp.example.com"));
        assert!(!entry.is_for_host("other.example.com"));
    }
}
