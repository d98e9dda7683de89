//! Scriptable in-memory [`HttpClient`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A request seen by [`MockHttpClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// `GET` or `POST`
    pub method: String,
    pub url: String,
    pub headers: Headers,
    /// `None` for GET
    pub body: Option<String>,
}

impl RecordedRequest {
    /// Body parsed as JSON, if it is JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        serde_json::from_str(self.body.as_deref()?).ok()
    }
}

/// Canned outcome of a request.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A response of any status
    Success(Response),
    Error(HttpError),
}

impl MockResponse {
    /// 200 with `value` as body.
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse::Success(Response::new(200, value.to_string()))
    }

    /// Empty body with `status`.
    pub fn status(status: u16) -> Self {
        MockResponse::Success(Response::new(status, ""))
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    requests: Vec<RecordedRequest>,
}

impl MockState {
    /// Exact URL, else the longest configured prefix, else the fallback.
    fn route(&self, url: &str) -> Option<&MockResponse> {
        self.routes.get(url).or_else(|| {
            self.routes
                .iter()
                .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
                .max_by_key(|(prefix, _)| prefix.len())
                .map(|(_, response)| response)
                .or(self.fallback.as_ref())
        })
    }
}

/// HTTP client answering from configured routes and recording every call.
///
/// Clones share their routes and recorded requests.
///
/// ```ignore
/// let http = MockHttpClient::new();
/// http.set_response("http://saturn/configs/sftp/list", MockResponse::json(json!([])));
/// let saturn = SaturnClient::new("http://saturn", http);
/// assert!(saturn.list_sftp_configs().await?.is_empty());
/// assert_eq!(saturn.http().get_requests().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests to `url`, or to URLs starting with it, with `response`.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(url.to_string(), response);
    }

    /// Answer requests matching no route with `response`.
    pub fn set_default_response(&self, response: MockResponse) {
        self.state.lock().unwrap().fallback = Some(response);
    }

    /// Every request so far, in call order.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    fn handle(
        &self,
        method: &str,
        url: &str,
        headers: &Headers,
        body: Option<&str>,
    ) -> Result<Response, HttpError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
        match state.route(url) {
            Some(MockResponse::Success(response)) => Ok(response.clone()),
            Some(MockResponse::Error(err)) => Err(err.clone()),
            None => Err(HttpError::Other(format!("no mock route for {}", url))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("GET", url, headers, None)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.handle("POST", url, headers, Some(body))
    }
}
