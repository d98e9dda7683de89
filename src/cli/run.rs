//! Default command: one synchronization pass.

use color_eyre::Result;
use tracing::{error, info};

use crate::date::today_internal_date;
use crate::error::{ErrorMap, SyncResult};
use crate::runner::{run_from_lookup, RunOutcome};

/// Run the password store once and return the process exit code.
///
/// Configuration and run failures are logged and mapped to exit code 1.
///
/// # Errors
///
/// Returns an error only if the tokio runtime cannot be created.
pub fn handle_run_command() -> Result<i32> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut errors = ErrorMap::new();
    let today = today_internal_date();
    let result = runtime.block_on(run_from_lookup(
        |key| std::env::var(key).ok(),
        &mut errors,
        &today,
    ));

    for line in failure_report(&result, &errors) {
        error!("{}", line);
    }
    Ok(match result {
        Ok(outcome) => {
            if outcome.is_clean() {
                info!(
                    "Run finished: {} passwords changed, {} entries added",
                    outcome.changes.configs_changed, outcome.sync.entries_persisted
                );
            }
            outcome.exit_code()
        }
        Err(_) => 1,
    })
}

/// Error-level lines closing a run: the fatal error, if any, then the
/// recorded harvester errors.
fn failure_report(result: &SyncResult<RunOutcome>, errors: &ErrorMap) -> Vec<String> {
    let mut lines = Vec::new();
    if let Err(e) = result {
        lines.push(e.to_string());
    }
    if !errors.is_empty() {
        lines.push(format!("Errors found: {}", errors));
    }
    lines
}
