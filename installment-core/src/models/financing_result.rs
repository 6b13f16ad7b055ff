use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up_dp;

/// Outcome of a single evaluation.
///
/// Results are recomputed from scratch for every request and are never
/// updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingResult {
    /// Markup percentage looked up for the requested term.
    pub rate_pct: Decimal,

    /// Down payment the customer pays up front.
    pub applied_down: Decimal,

    /// Principal subject to markup.
    pub financed_amount: Decimal,

    /// Markup charged on the financed principal.
    pub fee: Decimal,

    /// Financed principal plus markup.
    pub repayment_total: Decimal,

    /// Installment shown to the customer.
    ///
    /// In monthly-limit mode this is the limit itself rather than
    /// `repayment_total / term`.
    pub displayed_monthly: Decimal,

    /// Down payment plus repayment total.
    pub grand_total: Decimal,

    /// Set when the down payment exceeds the price, which means the chosen
    /// limit and term cannot be satisfied. Informational only.
    pub over_limit_warning: bool,
}

impl FinancingResult {
    /// Copy with every monetary field rounded half-up to `dp` places.
    pub fn rounded(
        &self,
        dp: u32,
    ) -> Self {
        Self {
            rate_pct: self.rate_pct,
            applied_down: round_half_up_dp(self.applied_down, dp),
            financed_amount: round_half_up_dp(self.financed_amount, dp),
            fee: round_half_up_dp(self.fee, dp),
            repayment_total: round_half_up_dp(self.repayment_total, dp),
            displayed_monthly: round_half_up_dp(self.displayed_monthly, dp),
            grand_total: round_half_up_dp(self.grand_total, dp),
            over_limit_warning: self.over_limit_warning,
        }
    }
}
