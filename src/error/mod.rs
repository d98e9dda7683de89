//! Error handling for the password store.
//!
//! Failures fall in two tiers:
//!
//! | Tier | Examples | Handling |
//! |------|----------|----------|
//! | Recoverable | proxy, SSH and SFTP failures on one harvester | recorded in [`ErrorMap`], run continues |
//! | Fatal | non-2xx from Saturn, bad JSON, malformed dates | [`SyncError`] propagated with `?`, run stops |
//!
//! A non-empty [`ErrorMap`] at shutdown turns an otherwise complete run into
//! a failing exit code.

mod error_map;
mod sync_error;

pub use error_map::ErrorMap;
pub use sync_error::{SyncError, SyncResult};
