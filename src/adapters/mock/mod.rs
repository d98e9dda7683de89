//! Mock implementations for testing.
//!
//! These doubles implement the trait abstractions without network access,
//! so the reconciliation and rotation passes can be exercised in unit and
//! integration tests.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`MockPasswordFileSource`] - Password files served from memory

pub mod http;
pub mod sftp;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use sftp::MockPasswordFileSource;
