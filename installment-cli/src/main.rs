use anyhow::Result;
use clap::Parser;
use tracing::debug;

use installment_cli::cli::Cli;
use installment_cli::commands::{self, Settings};
use installment_cli::logging;

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::resolve(&cli)?;
    logging::init_logging(&settings.log_level, settings.log_file.as_deref())?;
    debug!(?settings, "resolved settings");

    let output = commands::run(&cli.command, &settings)?;
    println!("{output}");

    Ok(())
}
