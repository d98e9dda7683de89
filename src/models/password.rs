//! Password repository records.
//!
//! All passwords held by these types are plaintext. Base64 wire encoding is
//! applied and removed by [`crate::repository::SaturnClient`] only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Passwords read from a harvester file, keyed by internal activation date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordHistory {
    entries: BTreeMap<String, String>,
}

impl PasswordHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a password active from `active_from`. A later insert for the
    /// same date replaces the earlier one.
    pub fn insert(&mut self, active_from: impl Into<String>, password: impl Into<String>) {
        self.entries.insert(active_from.into(), password.into());
    }

    pub fn get(&self, active_from: &str) -> Option<&str> {
        self.entries.get(active_from).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(active_from, password)` pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(d, p)| (d.as_str(), p.as_str()))
    }

    /// Entries whose activation date is not among `persisted`.
    pub fn missing_from<'a>(
        &'a self,
        persisted: &'a [PersistedEntry],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter()
            .filter(move |(date, _)| !persisted.iter().any(|p| p.active_from == *date))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PasswordHistory {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut history = PasswordHistory::new();
        for (date, password) in iter {
            history.insert(date, password);
        }
        history
    }
}

/// Element of `GET passwordrepository/list/{host}/{user}`.
///
/// The listing is only used to learn which activation dates already exist,
/// so its password field is not read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEntry {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub active_from: String,
}

/// A password to store in the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEntry {
    pub host: String,
    pub username: String,
    pub password: String,
    pub active_from: String,
}

/// The password the repository expects to be in use at a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCandidate {
    pub host: Option<String>,
    pub username: Option<String>,
    /// `None` when the repository has no password active at that date.
    pub active: Option<ActivePassword>,
}

/// Password half of a [`PasswordCandidate`] that the repository holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePassword {
    pub password: String,
    pub active_from: String,
}

impl PasswordCandidate {
    /// The candidate password if it should replace `current`.
    pub fn replacement_for(&self, current: &str) -> Option<&ActivePassword> {
        self.active.as_ref().filter(|a| a.password != current)
    }
}

/// Wire form shared by `passwordrepository/add` and
/// `passwordrepository/{host}/{user}/{date}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordEntryWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_from: Option<String>,
}
