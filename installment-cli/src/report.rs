//! Plain-text rendering of quotes and rate tables.

use installment_core::calculations::common::round_half_up_dp;
use installment_core::{FinancingResult, ModeKind, RateTable, TermQuote};
use rust_decimal::Decimal;

/// Advisory shown when a limit cannot be met for the chosen term.
pub const OVER_LIMIT_ADVISORY: &str =
    "Warning: the required down payment exceeds the price; this limit and term cannot be met.";

/// Formats an amount with `dp` decimal places and space-separated thousands.
///
/// ```
/// use rust_decimal_macros::dec;
/// use installment_cli::report::format_amount;
///
/// assert_eq!(format_amount(dec!(1862500.456), 0), "1 862 500");
/// assert_eq!(format_amount(dec!(1234.5), 2), "1 234.50");
/// assert_eq!(format_amount(dec!(-999), 0), "-999");
/// ```
pub fn format_amount(
    value: Decimal,
    dp: u32,
) -> String {
    let rounded = round_half_up_dp(value, dp);
    let text = format!("{:.*}", dp as usize, rounded);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Formats a markup percentage without trailing zeros (`55%`, `5.5%`).
pub fn format_rate(rate_pct: Decimal) -> String {
    format!("{}%", rate_pct.normalize())
}

fn row(
    label: &str,
    value: String,
) -> String {
    format!("{label:<18}{value:>16}")
}

/// Renders a single quote as a label/value block.
pub fn render_quote(
    price: Decimal,
    term: u32,
    mode: ModeKind,
    result: &FinancingResult,
    dp: u32,
) -> String {
    let term_text = if term == 0 {
        "not selected".to_string()
    } else {
        format!("{term} mo @ {}", format_rate(result.rate_pct))
    };

    let mut lines = vec![
        row("Price", format_amount(price, dp)),
        row("Term", term_text),
        row("Mode", mode.label().to_string()),
        row("Down payment", format_amount(result.applied_down, dp)),
        row("Financed", format_amount(result.financed_amount, dp)),
        row("Markup", format_amount(result.fee, dp)),
        row("Repayment total", format_amount(result.repayment_total, dp)),
        row("Monthly payment", format_amount(result.displayed_monthly, dp)),
        row("Grand total", format_amount(result.grand_total, dp)),
    ];
    if result.over_limit_warning {
        lines.push(String::new());
        lines.push(OVER_LIMIT_ADVISORY.to_string());
    }
    lines.join("\n")
}

/// Renders one line per term for side-by-side comparison.
pub fn render_comparison(
    quotes: &[TermQuote],
    dp: u32,
) -> String {
    let mut lines = vec![format!(
        "{:>4} {:>7} {:>16} {:>16} {:>16} {:>16}",
        "Term", "Markup", "Down", "Monthly", "Repayment", "Total"
    )];
    for quote in quotes {
        let r = &quote.result;
        let flag = if r.over_limit_warning { " !" } else { "" };
        lines.push(format!(
            "{:>4} {:>7} {:>16} {:>16} {:>16} {:>16}{flag}",
            quote.term,
            format_rate(r.rate_pct),
            format_amount(r.applied_down, dp),
            format_amount(r.displayed_monthly, dp),
            format_amount(r.repayment_total, dp),
            format_amount(r.grand_total, dp),
        ));
    }
    if quotes.iter().any(|q| q.result.over_limit_warning) {
        lines.push(String::new());
        lines.push(format!("! {OVER_LIMIT_ADVISORY}"));
    }
    lines.join("\n")
}

/// Renders the month/markup table.
pub fn render_rates(table: &RateTable) -> String {
    let mut lines = vec![format!("{:>5} {:>7}", "Month", "Markup")];
    lines.extend(
        table
            .iter()
            .map(|(month, rate)| format!("{:>5} {:>7}", month, format_rate(rate))),
    );
    lines.join("\n")
}
