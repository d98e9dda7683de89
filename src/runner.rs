//! One invocation of the password store.
//!
//! A run applies today's passwords to the SFTP configs first and then
//! copies new harvester passwords into the repository. A password found by
//! the second pass is applied by the next run once it becomes active.

use tracing::info;

use crate::adapters::{ReqwestHttpClient, Ssh2PasswordFileSource};
use crate::changer::{ChangeReport, PasswordChanger};
use crate::config::Config;
use crate::error::{ErrorMap, SyncResult};
use crate::repository::SaturnClient;
use crate::syncer::{PasswordSyncer, SyncReport};
use crate::traits::{HttpClient, PasswordFileSource};

/// Everything a run needs, built once at startup.
pub struct RunContext<C, S> {
    pub config: Config,
    pub saturn: SaturnClient<C>,
    pub source: S,
}

impl<C: HttpClient, S: PasswordFileSource> RunContext<C, S> {
    pub fn new(config: Config, http: C, source: S) -> Self {
        let saturn = SaturnClient::new(config.saturn_rest_endpoint.clone(), http);
        Self {
            config,
            saturn,
            source,
        }
    }
}

impl RunContext<ReqwestHttpClient, Ssh2PasswordFileSource> {
    /// Context talking to the real Saturn service and harvester hosts.
    pub fn production(config: Config) -> Self {
        let source = Ssh2PasswordFileSource::from_config(&config);
        Self::new(config, ReqwestHttpClient::new(), source)
    }
}

/// Result of a run that was not aborted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub changes: ChangeReport,
    pub sync: SyncReport,
    /// Harvesters with a recorded error
    pub failed_harvesters: usize,
}

impl RunOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed_harvesters == 0
    }

    /// Process exit code: 0 when no harvester failed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean() {
            0
        } else {
            1
        }
    }
}

/// Run the rotation pass and then the reconciliation pass.
///
/// `today` is the internal date used to look up active passwords.
/// Recoverable failures end up in `errors`; any other failure aborts the
/// run and is returned.
pub async fn run_once<C, S>(
    ctx: &RunContext<C, S>,
    errors: &mut ErrorMap,
    today: &str,
) -> SyncResult<RunOutcome>
where
    C: HttpClient,
    S: PasswordFileSource,
{
    info!("Saturn endpoint: {}", ctx.saturn.base_url());
    info!(
        "Password change enabled hosts: {:?}",
        ctx.config.password_change_enabled_sftp_hosts
    );

    let changes = PasswordChanger::new(&ctx.saturn, &ctx.config)
        .change_passwords(today)
        .await?;

    let sync = PasswordSyncer::new(&ctx.saturn, &ctx.source, &ctx.config)
        .persist_remote_dates_and_passwords(errors)
        .await?;

    Ok(RunOutcome {
        changes,
        sync,
        failed_harvesters: errors.len(),
    })
}

/// Build the production context from `lookup` (see [`Config::from_lookup`])
/// and run once.
pub async fn run_from_lookup<F>(
    lookup: F,
    errors: &mut ErrorMap,
    today: &str,
) -> SyncResult<RunOutcome>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    let ctx = RunContext::production(config);
    run_once(&ctx, errors, today).await
}
