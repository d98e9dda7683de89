use passwordstore::cli::{parse_args, run_cli_command};
use passwordstore::logging;

use color_eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let command = parse_args(std::env::args());
    let code = run_cli_command(command)?;
    std::process::exit(code)
}
