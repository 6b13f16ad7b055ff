use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use installment_core::{CalculatorSession, ModeKind, RatePreset};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Installment price calculator.
///
/// Computes the down payment, monthly payment and grand total for a product
/// bought on installments, using a month-indexed markup table.
#[derive(Debug, Parser)]
#[command(name = "installment", version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV markup table (`month,rate_pct`) overriding the configured table.
    #[arg(long, global = true)]
    pub rates: Option<PathBuf>,

    /// Built-in markup table to use.
    #[arg(long, global = true, value_parser = parse_preset)]
    pub preset: Option<RatePreset>,

    /// Decimal places shown for amounts.
    #[arg(long, global = true)]
    pub decimal_places: Option<u32>,

    /// Log filter (e.g. `debug` or `warn,installment_core=debug`).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote a single price and term.
    Quote(QuoteArgs),

    /// Quote a price for every term in the markup table.
    Compare(CompareArgs),

    /// Show, edit or reset the markup table.
    Rates(RatesArgs),
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Product price. Digit groups may be separated by spaces or commas.
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,

    /// Term in months (1-15). 0 leaves the term unselected.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub term: String,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Override one month's markup before quoting, as MONTH=PERCENT.
    #[arg(long = "set-rate", value_parser = parse_rate_assignment)]
    pub set_rate: Vec<RateAssignment>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Product price.
    #[arg(long, allow_hyphen_values = true)]
    pub price: String,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Override one month's markup before quoting, as MONTH=PERCENT.
    #[arg(long = "set-rate", value_parser = parse_rate_assignment)]
    pub set_rate: Vec<RateAssignment>,
}

#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Edit one month's markup, as MONTH=PERCENT. Non-numeric values are ignored.
    #[arg(long = "set", value_parser = parse_rate_assignment)]
    pub set: Vec<RateAssignment>,

    /// Restore the built-in table before applying edits.
    #[arg(long)]
    pub reset: bool,

    /// Print the table as CSV instead of aligned text.
    #[arg(long)]
    pub csv: bool,
}

/// Financing mode flags. At most one limit may be given; without one the
/// quote uses a plain down payment.
#[derive(Debug, Default, Args)]
pub struct ModeArgs {
    /// Down payment entered by the customer.
    #[arg(
        long,
        allow_hyphen_values = true,
        conflicts_with_all = ["yearly_limit", "monthly_limit", "scoring_limit"]
    )]
    pub down: Option<String>,

    /// Yearly credit limit; the down payment covers what it cannot.
    #[arg(
        long,
        allow_hyphen_values = true,
        conflicts_with_all = ["monthly_limit", "scoring_limit"]
    )]
    pub yearly_limit: Option<String>,

    /// Amount of the yearly limit already used this year.
    #[arg(long, allow_hyphen_values = true, requires = "yearly_limit")]
    pub used: Option<String>,

    /// Largest acceptable monthly payment.
    #[arg(long, allow_hyphen_values = true, conflicts_with = "scoring_limit")]
    pub monthly_limit: Option<String>,

    /// Largest total repayment approved by credit scoring.
    #[arg(long, allow_hyphen_values = true)]
    pub scoring_limit: Option<String>,
}

impl ModeArgs {
    pub fn kind(&self) -> ModeKind {
        if self.yearly_limit.is_some() {
            ModeKind::YearlyLimit
        } else if self.monthly_limit.is_some() {
            ModeKind::MonthlyLimit
        } else if self.scoring_limit.is_some() {
            ModeKind::ScoringLimit
        } else {
            ModeKind::Plain
        }
    }

    /// Selects the mode on `session` and fills in its parameters.
    pub fn apply_to(
        &self,
        session: &mut CalculatorSession,
    ) {
        session.select_mode(self.kind());
        // Setters for inactive modes are no-ops, so every flag can be forwarded.
        if let Some(text) = &self.down {
            session.set_down(text);
        }
        if let Some(text) = &self.yearly_limit {
            session.set_yearly_limit(text);
        }
        if let Some(text) = &self.used {
            session.set_used_this_year(text);
        }
        if let Some(text) = &self.monthly_limit {
            session.set_monthly_limit(text);
        }
        if let Some(text) = &self.scoring_limit {
            session.set_scoring_limit(text);
        }
    }
}

/// A `MONTH=PERCENT` edit. The percentage stays as text so the rate editor
/// can decide whether it is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateAssignment {
    pub month: u32,
    pub value: String,
}

fn parse_rate_assignment(s: &str) -> Result<RateAssignment, String> {
    let (month, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected MONTH=PERCENT, got '{s}'"))?;
    let month = month
        .trim()
        .parse()
        .map_err(|_| format!("invalid month '{}'", month.trim()))?;
    Ok(RateAssignment {
        month,
        value: value.trim().to_string(),
    })
}

fn parse_preset(s: &str) -> Result<RatePreset, String> {
    RatePreset::parse(s).ok_or_else(|| {
        let known: Vec<&str> = RatePreset::all().iter().map(RatePreset::as_str).collect();
        format!("unknown preset '{s}' (expected one of: {})", known.join(", "))
    })
}
