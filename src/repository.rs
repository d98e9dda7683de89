//! Client for the Saturn REST service.
//!
//! Saturn holds both the SFTP harvester configs and the password repository.
//! Every non-2xx answer is returned as [`SyncError::Http`]; callers let it
//! propagate, which ends the run.
//!
//! # Password encoding
//!
//! The repository wire format carries passwords base64-encoded on
//! `passwordrepository/add` and on `passwordrepository/{host}/{user}/{date}`.
//! This client encodes on every write and decodes on every read, so the rest
//! of the crate only handles plaintext.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::models::{
    ActivePassword, HarvesterConfig, PasswordCandidate, PasswordEntryWire, PersistedEntry,
    RepositoryEntry, SftpConfigEntry,
};
use crate::traits::{Headers, HttpClient, HttpError};

pub const SFTP_CONFIGS_LIST: &str = "configs/sftp/list";
pub const SFTP_CONFIGS_ADD: &str = "configs/sftp/add";
pub const PASSWORD_REPOSITORY_LIST: &str = "passwordrepository/list";
pub const PASSWORD_REPOSITORY_ADD: &str = "passwordrepository/add";
pub const PASSWORD_REPOSITORY: &str = "passwordrepository";

/// Longest slice of an error body kept in [`HttpError::ServerError`].
const MAX_ERROR_BODY: usize = 512;

/// Base64-encode a plaintext password for the repository.
pub fn encode_password(password: &str) -> String {
    BASE64.encode(password.as_bytes())
}

/// Decode a base64 password read from the repository.
pub fn decode_password(encoded: &str) -> SyncResult<String> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SyncError::InvalidRecord(format!("password is not base64: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| SyncError::InvalidRecord(format!("decoded password is not UTF-8: {}", e)))
}

/// Typed access to the Saturn endpoints used by the password store.
#[derive(Debug, Clone)]
pub struct SaturnClient<C> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> SaturnClient<C> {
    /// Create a client for the Saturn instance at `base_url`.
    pub fn new(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Absolute URL of an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET `url` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SyncResult<T> {
        debug!("GET {}", url);
        let response = self.http.get(url, &Headers::new()).await?;
        if !response.is_success() {
            return Err(server_error(response.status, response.text()).into());
        }
        Ok(response.json()?)
    }

    /// POST `body` to `url` as JSON with 2-space indentation.
    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> SyncResult<()> {
        debug!("POST {}", url);
        let payload = serde_json::to_string_pretty(body)?;
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let response = self.http.post(url, &payload, &headers).await?;
        if !response.is_success() {
            return Err(server_error(response.status, response.text()).into());
        }
        Ok(())
    }

    /// All SFTP harvester configs known to Saturn.
    pub async fn list_sftp_configs(&self) -> SyncResult<Vec<SftpConfigEntry>> {
        self.get_json(&self.url(SFTP_CONFIGS_LIST)).await
    }

    /// Connection details of all SFTP harvesters.
    pub async fn list_harvesters(&self) -> SyncResult<Vec<HarvesterConfig>> {
        let configs = self.list_sftp_configs().await?;
        Ok(configs.iter().map(HarvesterConfig::from).collect())
    }

    /// Create or update an SFTP harvester config.
    pub async fn save_sftp_config(&self, config: &SftpConfigEntry) -> SyncResult<()> {
        self.post_json(&self.url(SFTP_CONFIGS_ADD), config).await
    }

    /// Entries already stored for `username` on `host`.
    pub async fn list_password_entries(
        &self,
        host: &str,
        username: &str,
    ) -> SyncResult<Vec<PersistedEntry>> {
        let url = self.url(&format!(
            "{}/{}/{}",
            PASSWORD_REPOSITORY_LIST,
            urlencoding::encode(host),
            urlencoding::encode(username)
        ));
        self.get_json(&url).await
    }

    /// Store a new password entry. The password is base64-encoded on the wire.
    pub async fn add_password_entry(&self, entry: &RepositoryEntry) -> SyncResult<()> {
        let wire = PasswordEntryWire {
            host: Some(entry.host.clone()),
            username: Some(entry.username.clone()),
            password: Some(encode_password(&entry.password)),
            active_from: Some(entry.active_from.clone()),
        };
        self.post_json(&self.url(PASSWORD_REPOSITORY_ADD), &wire).await
    }

    /// The password the repository expects `username` on `host` to use at
    /// `internal_date`.
    ///
    /// `internal_date` is sent as-is; the internal format only contains
    /// characters allowed in a path segment.
    pub async fn password_for_date(
        &self,
        host: &str,
        username: &str,
        internal_date: &str,
    ) -> SyncResult<PasswordCandidate> {
        let url = self.url(&format!(
            "{}/{}/{}/{}",
            PASSWORD_REPOSITORY,
            urlencoding::encode(host),
            urlencoding::encode(username),
            internal_date
        ));
        let wire: PasswordEntryWire = self.get_json(&url).await?;
        candidate_from_wire(wire)
    }
}

fn server_error(status: u16, body: String) -> HttpError {
    let mut message = if body.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        body
    };
    if message.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        message.truncate(end);
    }
    HttpError::ServerError { status, message }
}

fn candidate_from_wire(wire: PasswordEntryWire) -> SyncResult<PasswordCandidate> {
    let active = match (wire.active_from, wire.password) {
        (Some(active_from), Some(encoded)) => Some(ActivePassword {
            password: decode_password(&encoded)?,
            active_from,
        }),
        (Some(active_from), None) => {
            return Err(SyncError::InvalidRecord(format!(
                "entry active from {} has no password",
                active_from
            )))
        }
        (None, _) => None,
    };
    Ok(PasswordCandidate {
        host: wire.host,
        username: wire.username,
        active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use serde_json::json;

    const BASE: &str = "http://saturn";

    fn client() -> SaturnClient<MockHttpClient> {
        SaturnClient::new(format!("{}/", BASE), MockHttpClient::new())
    }

    #[test]
    fn test_encode_decode_password() {
        assert_eq!(encode_password("gNwXt9x=eADM"), "Z053WHQ5eD1lQURN");
        assert_eq!(decode_password("Z053WHQ5eD1lQURN").unwrap(), "gNwXt9x=eADM");
    }

    #[test]
    fn test_decode_password_rejects_garbage() {
        assert!(matches!(
            decode_password("not base64!"),
            Err(SyncError::InvalidRecord(_))
        ));
        // "/w==" decodes to 0xFF, which is not UTF-8
        assert!(matches!(decode_password("/w=="), Err(SyncError::InvalidRecord(_))));
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let client = client();
        assert_eq!(client.base_url(), BASE);
        assert_eq!(client.url("configs/sftp/list"), "http://saturn/configs/sftp/list");
        assert_eq!(client.url("/configs/sftp/add"), "http://saturn/configs/sftp/add");
    }

    #[test]
    fn test_server_error_truncates_long_bodies() {
        let err = server_error(500, "é".repeat(600));
        match err {
            HttpError::ServerError { status, message } => {
                assert_eq!(status, 500);
                assert!(message.len() <= MAX_ERROR_BODY);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            server_error(404, "  ".to_string()),
            HttpError::ServerError { message, .. } if message == "Unknown error"
        ));
    }

    #[tokio::test]
    async fn test_get_json_non_2xx_is_error() {
        let client = client();
        client.http().set_response(
            "http://saturn/configs/sftp/list",
            MockResponse::status(500),
        );

        let err = client.list_sftp_configs().await.unwrap_err();
        assert_eq!(err.http_status(), Some(500));
    }

    #[tokio::test]
    async fn test_list_harvesters() {
        let client = client();
        client.http().set_response(
            "http://saturn/configs/sftp/list",
            MockResponse::json(json!([
                {"id": 1, "name": "a", "host": "h1", "port": 22, "username": "u1", "password": "p1"},
                {"id": 2, "name": "b", "host": "h2", "port": 2222, "username": "u2", "password": "p2"}
            ])),
        );

        let harvesters = client.list_harvesters().await.unwrap();
        assert_eq!(harvesters.len(), 2);
        assert_eq!(harvesters[1].port, 2222);
    }

    #[tokio::test]
    async fn test_list_sftp_configs_missing_field_is_json_error() {
        let client = client();
        client.http().set_response(
            "http://saturn/configs/sftp/list",
            MockResponse::json(json!([{"name": "a", "host": "h1"}])),
        );

        let err = client.list_sftp_configs().await.unwrap_err();
        assert!(matches!(err, SyncError::Json(_)));
    }

    #[tokio::test]
    async fn test_add_password_entry_encodes_password() {
        let client = client();
        client.http().set_response(
            "http://saturn/passwordrepository/add",
            MockResponse::status(200),
        );

        client
            .add_password_entry(&RepositoryEntry {
                host: "h".to_string(),
                username: "u".to_string(),
                password: "pw1".to_string(),
                active_from: "2024-01-01T00:00:00".to_string(),
            })
            .await
            .unwrap();

        let posts = client.http().requests_with_method("POST");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].json_body(),
            Some(json!({
                "host": "h",
                "username": "u",
                "password": "cHcx",
                "activeFrom": "2024-01-01T00:00:00"
            }))
        );
        assert_eq!(
            posts[0].headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert!(posts[0].body.as_deref().unwrap().contains("\n  \"host\": \"h\""));
    }

    #[tokio::test]
    async fn test_list_password_entries_encodes_path() {
        let client = client();
        client.http().set_response(
            "http://saturn/passwordrepository/list/",
            MockResponse::json(json!([])),
        );

        client
            .list_password_entries("sftp.example.com", "user name")
            .await
            .unwrap();

        let gets = client.http().get_requests();
        assert_eq!(
            gets[0].url,
            "http://saturn/passwordrepository/list/sftp.example.com/user%20name"
        );
    }

    #[tokio::test]
    async fn test_password_for_date_decodes_password() {
        let client = client();
        client.http().set_response(
            "http://saturn/passwordrepository/h/u/2024-02-01T00:00:00",
            MockResponse::json(json!({
                "host": "h",
                "username": "u",
                "password": "cHcy",
                "activeFrom": "2024-01-15T00:00:00"
            })),
        );

        let candidate = client
            .password_for_date("h", "u", "2024-02-01T00:00:00")
            .await
            .unwrap();
        let active = candidate.active.unwrap();
        assert_eq!(active.password, "pw2");
        assert_eq!(active.active_from, "2024-01-15T00:00:00");
    }

    #[tokio::test]
    async fn test_password_for_date_without_entry() {
        let client = client();
        client.http().set_response(
            "http://saturn/passwordrepository/h/u/2024-02-01T00:00:00",
            MockResponse::json(json!({"host": "h", "username": "u"})),
        );

        let candidate = client
            .password_for_date("h", "u", "2024-02-01T00:00:00")
            .await
            .unwrap();
        assert!(candidate.active.is_none());
        assert_eq!(candidate.host.as_deref(), Some("h"));
    }

    #[tokio::test]
    async fn test_password_for_date_active_without_password_is_invalid() {
        let client = client();
        client.http().set_response(
            "http://saturn/passwordrepository/h/u/2024-02-01T00:00:00",
            MockResponse::json(json!({"activeFrom": "2024-01-15T00:00:00"})),
        );

        let err = client
            .password_for_date("h", "u", "2024-02-01T00:00:00")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidRecord(_)));
    }
}
