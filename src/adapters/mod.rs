//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`Ssh2PasswordFileSource`] - Password files over SSH/SFTP, optionally via SOCKS5
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles for both adapters:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockPasswordFileSource`] - Password files served from memory

pub mod mock;
pub mod reqwest_http;
pub mod ssh2_sftp;

pub use mock::{MockHttpClient, MockPasswordFileSource};
pub use reqwest_http::ReqwestHttpClient;
pub use ssh2_sftp::Ssh2PasswordFileSource;
