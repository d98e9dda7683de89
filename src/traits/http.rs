//! HTTP seam used to talk to Saturn.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use thiserror::Error;

/// Request headers by name.
pub type Headers = HashMap<String, String>;

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text; invalid UTF-8 is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failure of an HTTP exchange with Saturn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Saturn answered with a non-2xx status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Other(String),
}

impl HttpError {
    /// HTTP status of a [`HttpError::ServerError`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Minimal async HTTP client.
///
/// Implementations hand back every response whatever its status. Deciding
/// that a status is an error belongs to the caller
/// ([`crate::repository::SaturnClient`]).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError>;

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError>;
}
