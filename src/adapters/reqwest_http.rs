//! Production [`HttpClient`] on top of reqwest.
//!
//! Timeouts and connection handling are reqwest's defaults; requests are
//! never retried.

use async_trait::async_trait;

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// reqwest-backed HTTP client.
///
/// ```ignore
/// use passwordstore::adapters::ReqwestHttpClient;
/// use passwordstore::repository::SaturnClient;
///
/// let saturn = SaturnClient::new("http://saturn", ReqwestHttpClient::new());
/// let configs = saturn.list_sftp_configs().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn execute(
        &self,
        mut request: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> Result<Response, HttpError> {
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(Response::new(status, body))
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            HttpError::Timeout(message)
        } else if err.is_connect() {
            HttpError::ConnectionFailed(message)
        } else if err.is_builder() {
            HttpError::InvalidUrl(message)
        } else {
            HttpError::Other(message)
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(self.client.get(url), headers).await
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.execute(self.client.post(url).body(body.to_owned()), headers)
            .await
    }
}
