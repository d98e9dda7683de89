//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST) against Saturn
//! - [`PasswordFileSource`] - Retrieval of harvester password history files

pub mod http;
pub mod sftp;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use sftp::{PasswordFileSource, SftpError};
