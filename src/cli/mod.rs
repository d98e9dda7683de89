//! CLI module for passwordstore.
//!
//! - Argument parsing
//! - Version and help display
//! - The synchronization run
//!
//! # Usage
//!
//! ```ignore
//! use passwordstore::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! let code = run_cli_command(command)?;
//! std::process::exit(code);
//! ```

pub mod args;
pub mod run;
pub mod version;

pub use args::{parse_args, CliCommand};
pub use run::handle_run_command;
pub use version::{handle_help_command, handle_version_command, VERSION};

use color_eyre::Result;

/// Run a CLI command and return the process exit code.
///
/// `Version` and `Help` never return; they exit the process with status 0.
pub fn run_cli_command(command: CliCommand) -> Result<i32> {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => handle_help_command(),
        CliCommand::Run => handle_run_command(),
    }
}
