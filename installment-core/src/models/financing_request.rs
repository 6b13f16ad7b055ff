use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FinancingMode;

/// Everything the calculator needs besides the rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingRequest {
    /// Product price. Negative values are treated as zero.
    pub price: Decimal,

    /// Term in months; zero means no term has been selected yet.
    pub term: u32,

    pub mode: FinancingMode,
}

impl FinancingRequest {
    pub fn new(
        price: Decimal,
        term: u32,
        mode: FinancingMode,
    ) -> Self {
        Self { price, term, mode }
    }
}
