//! Typed records exchanged with Saturn and read from harvester hosts.

mod harvester;
mod password;

pub use harvester::{HarvesterConfig, SftpConfigEntry};
pub use password::{
    ActivePassword, PasswordCandidate, PasswordHistory, PersistedEntry, RepositoryEntry,
};
pub(crate) use password::PasswordEntryWire;
