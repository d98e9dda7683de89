//! Command-line argument parsing for passwordstore.
//!
//! The tool takes no options beyond version and help; everything else is
//! configured through the environment.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run one synchronization pass (default)
    Run,
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first argument is the program name. Unknown arguments are ignored.
///
/// # Examples
///
/// ```
/// use passwordstore::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["passwordstore".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }
    CliCommand::Run
}
