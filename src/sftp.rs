//! Password history retrieval from harvester hosts.
//!
//! A harvester exposes a plain text file named after its login user. Each
//! line announces a password and the date it takes effect:
//!
//! ```text
//! 01/31/2024 - s3cret
//! 03/01/2024 - n3w-s3cret
//! ```
//!
//! Transport failures are recoverable: they are recorded against the
//! harvester and reported as "no data". A file that was downloaded but
//! cannot be parsed is fatal.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::date::{to_internal_date, DateParseError};
use crate::error::{ErrorMap, SyncError, SyncResult};
use crate::models::{HarvesterConfig, PasswordHistory};
use crate::traits::{PasswordFileSource, SftpError};

/// Separator between the date and the password on each line.
pub const LINE_SEPARATOR: &str = " - ";

/// Error raised when a password history file is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryParseError {
    #[error("line {line_number} has no ' - ' separator")]
    MissingSeparator { line_number: usize },

    #[error("line {line_number} has more than one ' - ' separator")]
    ExtraSeparator { line_number: usize },

    #[error("line {line_number}: {source}")]
    InvalidDate {
        line_number: usize,
        #[source]
        source: DateParseError,
    },
}

/// Parse the content of a password history file.
///
/// Every line must hold exactly one `" - "`; date and password are trimmed.
/// A blank line is malformed, but the newline ending the last line is not.
/// When a date occurs twice the later line wins.
pub fn parse_password_file(contents: &str) -> Result<PasswordHistory, HistoryParseError> {
    let mut history = PasswordHistory::new();
    for (index, line) in contents.lines().enumerate() {
        let line_number = index + 1;
        let parts: Vec<&str> = line.split(LINE_SEPARATOR).collect();
        let (date, password) = match parts.as_slice() {
            [date, password] => (*date, *password),
            [_] => return Err(HistoryParseError::MissingSeparator { line_number }),
            _ => return Err(HistoryParseError::ExtraSeparator { line_number }),
        };
        let active_from = to_internal_date(date.trim())
            .map_err(|source| HistoryParseError::InvalidDate { line_number, source })?;
        history.insert(active_from, password.trim());
    }
    Ok(history)
}

/// Message stored in the error map for a failed retrieval.
pub fn error_message(harvester: &HarvesterConfig, err: &SftpError) -> String {
    match err {
        SftpError::Proxy(msg) => format!("Proxy error '{}' for '{}'", msg, harvester.host),
        err if err.is_ssh() => format!(
            "Connection to {} unsuccessful. Check connection settings.",
            harvester.host
        ),
        err => format!("Error: {}", err),
    }
}

/// Retrieve and parse the password history of one harvester.
///
/// Returns `Ok(None)` when the file could not be retrieved; the failure is
/// then recorded in `errors` under the harvester name. Returns `Err` only
/// for a malformed file.
pub fn fetch_password_history<S>(
    source: &S,
    harvester: &HarvesterConfig,
    errors: &mut ErrorMap,
) -> SyncResult<Option<PasswordHistory>>
where
    S: PasswordFileSource + ?Sized,
{
    info!(
        "sftp connection: '{}' at '{}':{} with pass: 'XXXX'",
        harvester.username, harvester.host, harvester.port
    );

    let contents = match source.fetch_password_file(harvester) {
        Ok(contents) => contents,
        Err(err) => {
            let message = error_message(harvester, &err);
            match err {
                SftpError::Proxy(_) => warn!("{}", message),
                _ => error!("Harvester '{}': {} ({})", harvester.name, message, err),
            }
            errors.record(harvester.name.clone(), message);
            return Ok(None);
        }
    };

    let history = parse_password_file(&contents).map_err(|source| SyncError::PasswordFile {
        harvester: harvester.name.clone(),
        source,
    })?;
    info!(
        "Read {} password entries for '{}@{}'",
        history.len(),
        harvester.username,
        harvester.host
    );
    Ok(Some(history))
}
