//! Subcommand handlers. Each one builds a fresh [`CalculatorSession`] from
//! the resolved [`Settings`] and returns the text to print.

use std::path::PathBuf;

use anyhow::{Context, Result};
use installment_core::{CalculatorSession, FinancingCalculator, RateTable};
use installment_data::{CalculatorConfig, RateTableLoader};
use tracing::{debug, warn};

use crate::cli::{Cli, Command, CompareArgs, ModeArgs, QuoteArgs, RateAssignment, RatesArgs};
use crate::report;

// ─── settings ────────────────────────────────────────────────────────────────

/// Configuration file values with command-line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Table restored by a reset.
    pub baseline: RateTable,
    /// Table quotes start from.
    pub committed: RateTable,
    pub decimal_places: u32,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Loads `--config` (or the defaults) and layers the global flags on top.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => CalculatorConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => CalculatorConfig::default(),
        };
        Self::from_config(config, cli)
    }

    pub fn from_config(
        mut config: CalculatorConfig,
        cli: &Cli,
    ) -> Result<Self> {
        if let Some(preset) = cli.preset {
            // An explicit preset wins over a table file named in the config.
            config.rates.preset = preset;
            config.rates.file = None;
        }
        if let Some(path) = &cli.rates {
            config.rates.file = Some(path.clone());
        }

        let committed = config.rate_table().context("Failed to load rate table")?;

        Ok(Self {
            baseline: config.baseline_rates(),
            committed,
            decimal_places: cli.decimal_places.unwrap_or(config.display.decimal_places),
            log_level: cli.log_level.clone().unwrap_or(config.logging.level),
            log_file: config.logging.file,
        })
    }

    fn session(&self) -> CalculatorSession {
        let mut session = CalculatorSession::new(self.baseline.clone());
        session.rates_mut().replace(self.committed.clone());
        session
    }
}

// ─── dispatch ────────────────────────────────────────────────────────────────

pub fn run(
    command: &Command,
    settings: &Settings,
) -> Result<String> {
    match command {
        Command::Quote(args) => Ok(quote(args, settings)),
        Command::Compare(args) => Ok(compare(args, settings)),
        Command::Rates(args) => rates(args, settings),
    }
}

/// Stages the edits on the working copy and commits them together.
/// Edits the editor rejects are reported and skipped.
fn apply_rate_edits(
    session: &mut CalculatorSession,
    edits: &[RateAssignment],
) {
    if edits.is_empty() {
        return;
    }
    let editor = session.rates_mut();
    for edit in edits {
        if !editor.edit(edit.month, &edit.value) {
            warn!(month = edit.month, value = %edit.value, "rate edit ignored");
        }
    }
    editor.apply();
}

fn prepare(
    settings: &Settings,
    price: &str,
    mode: &ModeArgs,
    edits: &[RateAssignment],
) -> CalculatorSession {
    let mut session = settings.session();
    apply_rate_edits(&mut session, edits);
    session.set_price(price);
    mode.apply_to(&mut session);
    session
}

// ─── handlers ────────────────────────────────────────────────────────────────

pub fn quote(
    args: &QuoteArgs,
    settings: &Settings,
) -> String {
    let mut session = prepare(settings, &args.price, &args.mode, &args.set_rate);
    session.set_term(&args.term);
    debug!(request = ?session.request(), "quoting");

    let result = session.evaluate();
    report::render_quote(
        session.price(),
        session.term(),
        session.mode().kind(),
        &result,
        settings.decimal_places,
    )
}

pub fn compare(
    args: &CompareArgs,
    settings: &Settings,
) -> String {
    let session = prepare(settings, &args.price, &args.mode, &args.set_rate);
    let quotes = FinancingCalculator::new(session.rates().committed())
        .evaluate_all_terms(session.price(), session.mode());
    report::render_comparison(&quotes, settings.decimal_places)
}

pub fn rates(
    args: &RatesArgs,
    settings: &Settings,
) -> Result<String> {
    let mut session = settings.session();
    if args.reset {
        session.rates_mut().reset();
    }
    apply_rate_edits(&mut session, &args.set);
    let table = session.rates().committed();

    if args.csv {
        let mut buf = Vec::new();
        RateTableLoader::write(table, &mut buf).context("Failed to write rate table")?;
        String::from_utf8(buf).context("Rate table CSV is not valid UTF-8")
    } else {
        Ok(report::render_rates(table))
    }
}
