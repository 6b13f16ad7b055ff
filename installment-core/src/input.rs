//! Coercion of free-text form input into calculator values.
//!
//! Every field on the calculator form is recomputed on each keystroke, so
//! nothing here rejects input: an unreadable amount becomes zero and an
//! unreadable rate edit is dropped.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

/// Digit-group separators accepted in amounts. `\s` is Unicode-aware, so the
/// no-break spaces used by many locales are covered too.
static GROUP_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,_'\s]").expect("separator pattern is valid"));

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid decimal '{input}': {source}")]
pub struct ParseDecimalError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

fn normalize_decimal_input(s: &str) -> String {
    GROUP_SEPARATORS.replace_all(s.trim(), "").into_owned()
}

/// Parses a string into a [`Decimal`].
///
/// Digit-group separators are removed first, so `"17 000 000"` and
/// `"17,000,000"` both parse. Empty input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| ParseDecimalError {
        input: s.to_string(),
        source: e,
    })
}

/// Parses a monetary amount, falling back to zero.
///
/// Unparseable and negative input both become zero.
pub fn coerce_amount(s: &str) -> Decimal {
    match parse_decimal(s) {
        Ok(value) if value < Decimal::ZERO => {
            tracing::warn!(input = %s, "negative amount clamped to zero");
            Decimal::ZERO
        }
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(input = %s, "invalid amount treated as zero: {}", e);
            Decimal::ZERO
        }
    }
}

/// Parses a term in months. Anything that is not a whole non-negative
/// number means "unselected" and becomes 0.
pub fn coerce_term(s: &str) -> u32 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse().unwrap_or_else(|_| {
        tracing::warn!(input = %s, "invalid term treated as unselected");
        0
    })
}

/// Parses a rate-table cell edit. Returns `None` for empty or non-numeric
/// text so the caller can keep the previous value.
///
/// Percentages never carry digit groups, so a comma is read as the decimal
/// point (`5,5` is 5.5). Anything with more than one separator is rejected.
pub fn parse_rate_edit(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse().ok()
}
