//! Version and help output.

use crate::config::{
    PASSWORD_CHANGE_ENABLED_SFTP_HOSTS, PROXY_HOSTNAME, PROXY_PASSWORD, PROXY_PORT,
    PROXY_USERNAME, SATURN_REST_ENDPOINT,
};

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handle the --version command.
pub fn handle_version_command() -> ! {
    println!("passwordstore {}", VERSION);
    std::process::exit(0)
}

/// Usage text listing the environment variables read at startup.
pub fn usage() -> String {
    format!(
        "passwordstore {VERSION}\n\
         Synchronizes harvester password files with the Saturn password repository.\n\
         \n\
         USAGE:\n    passwordstore [--version | --help]\n\
         \n\
         ENVIRONMENT:\n    \
         {SATURN_REST_ENDPOINT}    Saturn base URL\n    \
         {PASSWORD_CHANGE_ENABLED_SFTP_HOSTS}    JSON array of enabled hosts\n    \
         {PROXY_HOSTNAME}, {PROXY_PORT}, {PROXY_USERNAME}, {PROXY_PASSWORD}    SOCKS5 proxy\n    \
         RUST_LOG    log filter (default: info)\n"
    )
}

/// Handle the --help command.
pub fn handle_help_command() -> ! {
    print!("{}", usage());
    std::process::exit(0)
}
