//! Reconciliation of harvester password files with the repository.
//!
//! For every allow-listed harvester the password history file is read over
//! SFTP and every entry whose activation date the repository does not know
//! yet is added. Entries already present are never written again, so a
//! second run over unchanged files issues no writes.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ErrorMap, SyncResult};
use crate::models::{HarvesterConfig, RepositoryEntry};
use crate::repository::SaturnClient;
use crate::sftp::fetch_password_history;
use crate::traits::{HttpClient, PasswordFileSource};

/// Counts gathered during one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Allow-listed harvesters visited
    pub harvesters_checked: usize,
    /// Harvesters without retrievable or non-empty history
    pub harvesters_skipped: usize,
    /// New repository entries added
    pub entries_persisted: usize,
}

/// Copies password history from harvesters into the repository.
pub struct PasswordSyncer<'a, C, S: ?Sized> {
    saturn: &'a SaturnClient<C>,
    source: &'a S,
    config: &'a Config,
}

impl<'a, C, S> PasswordSyncer<'a, C, S>
where
    C: HttpClient,
    S: PasswordFileSource + ?Sized,
{
    pub fn new(saturn: &'a SaturnClient<C>, source: &'a S, config: &'a Config) -> Self {
        Self {
            saturn,
            source,
            config,
        }
    }

    /// Run one reconciliation pass over all allow-listed harvesters.
    ///
    /// SFTP failures are recorded in `errors` and the harvester is skipped.
    /// Any Saturn failure aborts the pass.
    pub async fn persist_remote_dates_and_passwords(
        &self,
        errors: &mut ErrorMap,
    ) -> SyncResult<SyncReport> {
        let mut report = SyncReport::default();

        let harvesters = self.saturn.list_harvesters().await?;
        for harvester in harvesters
            .iter()
            .filter(|h| self.config.is_host_enabled(&h.host))
        {
            report.harvesters_checked += 1;
            match self.sync_harvester(harvester, errors).await? {
                Some(persisted) => report.entries_persisted += persisted,
                None => report.harvesters_skipped += 1,
            }
        }

        info!(
            "Password sync done: {} harvesters checked, {} skipped, {} entries added",
            report.harvesters_checked, report.harvesters_skipped, report.entries_persisted
        );
        Ok(report)
    }

    /// Returns the number of entries added, or `None` when the harvester had
    /// nothing to offer.
    async fn sync_harvester(
        &self,
        harvester: &HarvesterConfig,
        errors: &mut ErrorMap,
    ) -> SyncResult<Option<usize>> {
        info!("Checking harvester '{}' on {}", harvester.name, harvester.host);

        let history = match fetch_password_history(self.source, harvester, errors)? {
            Some(history) if !history.is_empty() => history,
            _ => {
                debug!("No password history for '{}'", harvester.name);
                return Ok(None);
            }
        };

        let persisted = self
            .saturn
            .list_password_entries(&harvester.host, &harvester.username)
            .await?;

        let mut added = 0;
        for (active_from, password) in history.missing_from(&persisted) {
            info!(
                "New password for '{}@{}' active from {}",
                harvester.username, harvester.host, active_from
            );
            self.saturn
                .add_password_entry(&RepositoryEntry {
                    host: harvester.host.clone(),
                    username: harvester.username.clone(),
                    password: password.to_string(),
                    active_from: active_from.to_string(),
                })
                .await?;
            added += 1;
        }

        if added == 0 {
            info!("Repository already up to date for '{}'", harvester.name);
        }
        Ok(Some(added))
    }
}
