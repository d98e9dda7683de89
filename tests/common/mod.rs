//! Common test utilities for integration tests.
//!
//! Fixtures for Saturn records and a wiremock setup of the Saturn endpoints.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use passwordstore::config::Config;

pub const USERNAME: &str = "harvest";

/// A `configs/sftp/list` element for `host`.
pub fn sftp_config(name: &str, host: &str, password: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "host": host,
        "port": 22,
        "username": USERNAME,
        "password": password,
        "dir": "/",
        "filesPattern": "*.xml"
    })
}

/// Config pointing at `server` with `hosts` enabled.
pub fn config_for(server: &MockServer, hosts: &[&str]) -> Config {
    Config::default()
        .with_saturn_rest_endpoint(server.uri())
        .with_enabled_hosts(hosts.iter().copied())
}

/// Serve `configs` on `GET /configs/sftp/list`.
pub async fn mount_sftp_configs(server: &MockServer, configs: Value) {
    Mock::given(method("GET"))
        .and(path("/configs/sftp/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(configs))
        .mount(server)
        .await;
}

/// Serve `entries` on `GET /passwordrepository/list/{host}/harvest`.
pub async fn mount_persisted(server: &MockServer, host: &str, entries: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/passwordrepository/list/{}/{}", host, USERNAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}

/// Serve `entry` on `GET /passwordrepository/{host}/harvest/{date}`.
pub async fn mount_candidate(server: &MockServer, host: &str, date: &str, entry: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/passwordrepository/{}/{}/{}", host, USERNAME, date)))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry))
        .mount(server)
        .await;
}

/// Bodies of all POST requests received on `endpoint`.
pub async fn posted_bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "POST" && r.url.path() == endpoint)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}
