use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest selectable term, in months.
pub const MIN_TERM: u32 = 1;

/// Longest selectable term, in months.
pub const MAX_TERM: u32 = 15;

/// Standard markup table as `(month, mantissa, scale)` triples.
const STANDARD_RATES: [(u32, i64, u32); 15] = [
    (1, 5, 0),
    (2, 10, 0),
    (3, 17, 0),
    (4, 25, 0),
    (5, 35, 0),
    (6, 38, 0),
    (7, 43, 0),
    (8, 47, 0),
    (9, 50, 0),
    (10, 55, 0),
    (11, 58, 0),
    (12, 63, 0),
    (13, 65, 0),
    (14, 68, 0),
    (15, 70, 0),
];

const ALTERNATE_RATES: [(u32, i64, u32); 15] = [
    (1, 55, 1),
    (2, 11, 0),
    (3, 17, 0),
    (4, 25, 0),
    (5, 33, 0),
    (6, 39, 0),
    (7, 45, 0),
    (8, 49, 0),
    (9, 52, 0),
    (10, 58, 0),
    (11, 61, 0),
    (12, 67, 0),
    (13, 71, 0),
    (14, 76, 0),
    (15, 81, 0),
];

/// Errors raised when building a [`RateTable`] from external entries.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    #[error("month {0} is outside the supported range 1..=15")]
    MonthOutOfRange(u32),

    #[error("month {0} appears more than once")]
    DuplicateMonth(u32),

    #[error("no rate given for month {0}")]
    MissingMonth(u32),

    #[error("rate {rate} for month {month} is negative")]
    NegativeRate { month: u32, rate: Decimal },
}

/// Built-in markup tables.
///
/// `Standard` is the canonical default. `Alternate` is kept as an explicit
/// opt-in so that the two tables are never blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatePreset {
    #[default]
    Standard,
    Alternate,
}

impl RatePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Alternate => "alternate",
        }
    }

    pub fn all() -> [RatePreset; 2] {
        [Self::Standard, Self::Alternate]
    }

    /// Case-insensitive lookup by [`as_str`](Self::as_str) name.
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.trim();
        Self::all()
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(name))
    }

    fn entries(&self) -> &'static [(u32, i64, u32); 15] {
        match self {
            Self::Standard => &STANDARD_RATES,
            Self::Alternate => &ALTERNATE_RATES,
        }
    }
}

/// Markup percentage per term length.
///
/// Every month in `MIN_TERM..=MAX_TERM` always has an entry; lookups for any
/// other month resolve to zero. Values are percentages, so `55` means a 55%
/// markup on the financed principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<u32, Decimal>",
    into = "BTreeMap<u32, Decimal>"
)]
pub struct RateTable {
    rates: BTreeMap<u32, Decimal>,
}

impl RateTable {
    /// The canonical default table.
    pub fn standard() -> Self {
        Self::from_preset(RatePreset::Standard)
    }

    pub fn from_preset(preset: RatePreset) -> Self {
        let rates = preset
            .entries()
            .iter()
            .map(|&(month, mantissa, scale)| (month, Decimal::new(mantissa, scale)))
            .collect();
        Self { rates }
    }

    /// Builds a table from `(month, percentage)` pairs.
    ///
    /// Unlike the editing methods this is strict: every month must be present
    /// exactly once, inside the supported range, with a non-negative rate.
    pub fn from_entries<I>(entries: I) -> Result<Self, RateTableError>
    where
        I: IntoIterator<Item = (u32, Decimal)>,
    {
        let mut rates = BTreeMap::new();
        for (month, rate) in entries {
            if !Self::is_valid_month(month) {
                return Err(RateTableError::MonthOutOfRange(month));
            }
            if rate < Decimal::ZERO {
                return Err(RateTableError::NegativeRate { month, rate });
            }
            if rates.insert(month, rate).is_some() {
                return Err(RateTableError::DuplicateMonth(month));
            }
        }

        if let Some(missing) = (MIN_TERM..=MAX_TERM).find(|m| !rates.contains_key(m)) {
            return Err(RateTableError::MissingMonth(missing));
        }

        Ok(Self { rates })
    }

    pub fn is_valid_month(month: u32) -> bool {
        (MIN_TERM..=MAX_TERM).contains(&month)
    }

    /// Markup percentage for `month`, or zero for an unknown month.
    pub fn get(
        &self,
        month: u32,
    ) -> Decimal {
        self.rates.get(&month).copied().unwrap_or(Decimal::ZERO)
    }

    /// Returns a copy of this table with one month changed.
    ///
    /// Out-of-range months leave the copy identical to `self`; negative rates
    /// are clamped to zero.
    pub fn with_rate(
        &self,
        month: u32,
        rate_pct: Decimal,
    ) -> Self {
        let mut next = self.clone();
        next.set_rate(month, rate_pct);
        next
    }

    /// Changes one month in place. Returns `false` if the month is out of range.
    pub fn set_rate(
        &mut self,
        month: u32,
        rate_pct: Decimal,
    ) -> bool {
        if !Self::is_valid_month(month) {
            return false;
        }
        self.rates.insert(month, rate_pct.max(Decimal::ZERO));
        true
    }

    /// Iterates `(month, percentage)` pairs in month order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Decimal)> + '_ {
        self.rates.iter().map(|(&month, &rate)| (month, rate))
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<BTreeMap<u32, Decimal>> for RateTable {
    type Error = RateTableError;

    fn try_from(map: BTreeMap<u32, Decimal>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<RateTable> for BTreeMap<u32, Decimal> {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}
