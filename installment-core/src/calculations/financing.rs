//! Installment financing calculations.
//!
//! A [`FinancingCalculator`] turns a [`FinancingRequest`] into a
//! [`FinancingResult`] using the markup rate the [`RateTable`] holds for the
//! requested term. Evaluation is total: invalid numbers are clamped, an
//! unselected term divides to zero, and an infeasible limit only raises the
//! `over_limit_warning` flag.
//!
//! # Modes
//!
//! | Mode | Down payment |
//! |------|--------------|
//! | Plain | entered by the customer |
//! | YearlyLimit | `clamp(price - max(0, yearly_limit - used_this_year), 0, price)` |
//! | MonthlyLimit | `clamp(price - monthly_limit * term / (1 + rate/100), 0, price)` |
//! | ScoringLimit | `max(0, price * (1 + rate/100) - scoring_limit)` |
//!
//! The first three share one path:
//!
//! | Value | Formula |
//! |-------|---------|
//! | financed | `max(0, price - down)` |
//! | fee | `financed * rate / 100` |
//! | repayment total | `financed + fee` |
//! | monthly | `repayment total / term` (monthly limit mode shows the limit) |
//! | grand total | `repayment total + down` |
//!
//! Scoring limits cap the total repayment rather than the principal, so that
//! mode works from the fully marked-up price instead.
//!
//! Products and sums saturate at [`Decimal::MAX`] instead of overflowing.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use installment_core::{FinancingCalculator, FinancingMode, FinancingRequest, RateTable};
//!
//! let rates = RateTable::standard();
//! let request = FinancingRequest::new(
//!     dec!(17000000),
//!     10,
//!     FinancingMode::YearlyLimit {
//!         yearly_limit: dec!(12000000),
//!         used_this_year: dec!(0),
//!     },
//! );
//!
//! let result = FinancingCalculator::new(&rates).evaluate(&request);
//!
//! assert_eq!(result.applied_down, dec!(5000000));
//! assert_eq!(result.financed_amount, dec!(12000000));
//! assert_eq!(result.displayed_monthly, dec!(1860000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{
    clamp, markup_factor, max, min, non_negative, per_month,
};
use crate::{FinancingMode, FinancingRequest, FinancingResult, MAX_TERM, MIN_TERM, RateTable};

/// One row of a term comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermQuote {
    pub term: u32,
    pub result: FinancingResult,
}

/// Calculator over a borrowed rate table.
///
/// The calculator never mutates the table; edits go through
/// [`crate::RateTableEditor`] and a new calculator is built from the
/// committed table.
#[derive(Debug, Clone, Copy)]
pub struct FinancingCalculator<'a> {
    rates: &'a RateTable,
}

impl<'a> FinancingCalculator<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// Evaluates a request.
    ///
    /// Exactly one mode branch runs. The same request always produces an
    /// identical result.
    pub fn evaluate(
        &self,
        request: &FinancingRequest,
    ) -> FinancingResult {
        let price = non_negative(request.price);
        let term = request.term;
        let rate_pct = self.rate_for(term);

        let result = match request.mode {
            FinancingMode::Plain { down } => {
                let applied_down = non_negative(down);
                self.principal_basis(price, term, rate_pct, applied_down, None)
            }
            FinancingMode::YearlyLimit {
                yearly_limit,
                used_this_year,
            } => {
                let applied_down = self.yearly_limit_down(price, yearly_limit, used_this_year);
                self.principal_basis(price, term, rate_pct, applied_down, None)
            }
            FinancingMode::MonthlyLimit { monthly_limit } => {
                let monthly_limit = non_negative(monthly_limit);
                let applied_down = self.monthly_limit_down(price, term, rate_pct, monthly_limit);
                self.principal_basis(price, term, rate_pct, applied_down, Some(monthly_limit))
            }
            FinancingMode::ScoringLimit { scoring_limit } => {
                self.scoring_basis(price, term, rate_pct, non_negative(scoring_limit))
            }
        };

        debug!(
            mode = ?request.mode.kind(),
            price = %price,
            term,
            rate_pct = %rate_pct,
            applied_down = %result.applied_down,
            grand_total = %result.grand_total,
            over_limit = result.over_limit_warning,
            "evaluated financing request"
        );

        result
    }

    /// Evaluates the same price and mode for every supported term.
    pub fn evaluate_all_terms(
        &self,
        price: Decimal,
        mode: &FinancingMode,
    ) -> Vec<TermQuote> {
        (MIN_TERM..=MAX_TERM)
            .map(|term| TermQuote {
                term,
                result: self.evaluate(&FinancingRequest::new(price, term, *mode)),
            })
            .collect()
    }

    /// Markup percentage for the term; zero when no term is selected.
    fn rate_for(
        &self,
        term: u32,
    ) -> Decimal {
        if term == 0 {
            return Decimal::ZERO;
        }
        self.rates.get(term)
    }

    /// Down payment left over once the remaining yearly allowance is used.
    fn yearly_limit_down(
        &self,
        price: Decimal,
        yearly_limit: Decimal,
        used_this_year: Decimal,
    ) -> Decimal {
        let available = non_negative(non_negative(yearly_limit) - non_negative(used_this_year));
        clamp(price - available, Decimal::ZERO, price)
    }

    /// Down payment that makes `repayment_total / term` equal the limit.
    fn monthly_limit_down(
        &self,
        price: Decimal,
        term: u32,
        rate_pct: Decimal,
        monthly_limit: Decimal,
    ) -> Decimal {
        if term == 0 {
            return price;
        }
        let affordable_repayment = monthly_limit.saturating_mul(Decimal::from(term));
        let affordable_principal = affordable_repayment
            .checked_div(markup_factor(rate_pct))
            .unwrap_or(Decimal::ZERO);
        clamp(price - affordable_principal, Decimal::ZERO, price)
    }

    /// Shared path for plain, yearly-limit and monthly-limit modes.
    ///
    /// `monthly_override` replaces the derived installment with the limit the
    /// down payment was solved for.
    fn principal_basis(
        &self,
        price: Decimal,
        term: u32,
        rate_pct: Decimal,
        applied_down: Decimal,
        monthly_override: Option<Decimal>,
    ) -> FinancingResult {
        let financed_amount = non_negative(price - applied_down);
        let fee = financed_amount.saturating_mul(rate_pct) / Decimal::ONE_HUNDRED;
        let repayment_total = financed_amount.saturating_add(fee);
        let displayed_monthly =
            monthly_override.unwrap_or_else(|| per_month(repayment_total, term));

        FinancingResult {
            rate_pct,
            applied_down,
            financed_amount,
            fee,
            repayment_total,
            displayed_monthly,
            grand_total: repayment_total.saturating_add(applied_down),
            over_limit_warning: applied_down > price,
        }
    }

    /// Scoring-limit path, computed from the fully marked-up price.
    fn scoring_basis(
        &self,
        price: Decimal,
        term: u32,
        rate_pct: Decimal,
        scoring_limit: Decimal,
    ) -> FinancingResult {
        let factor = markup_factor(rate_pct);
        let repay_full = price.saturating_mul(factor);
        let applied_down = max(Decimal::ZERO, repay_full - scoring_limit);
        let financed_repay = min(repay_full, scoring_limit);
        let financed_amount = financed_repay
            .checked_div(factor)
            .unwrap_or(Decimal::ZERO);

        FinancingResult {
            rate_pct,
            applied_down,
            financed_amount,
            fee: financed_repay - financed_amount,
            repayment_total: financed_repay,
            displayed_monthly: per_month(financed_repay, term),
            grand_total: applied_down.saturating_add(financed_repay),
            over_limit_warning: applied_down > price,
        }
    }
}

/// Evaluates `request` against `rates`.
pub fn evaluate(
    request: &FinancingRequest,
    rates: &RateTable,
) -> FinancingResult {
    FinancingCalculator::new(rates).evaluate(request)
}

/// Markup percentage for `month`, zero when unknown.
pub fn get_rate(
    rates: &RateTable,
    month: u32,
) -> Decimal {
    rates.get(month)
}

/// Copy of `rates` with one month changed.
pub fn set_rate(
    rates: &RateTable,
    month: u32,
    rate_pct: Decimal,
) -> RateTable {
    rates.with_rate(month, rate_pct)
}

/// The built-in default table.
pub fn reset_rates() -> RateTable {
    RateTable::standard()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn plain(down: Decimal) -> FinancingMode {
        FinancingMode::Plain { down }
    }

    fn yearly(
        yearly_limit: Decimal,
        used_this_year: Decimal,
    ) -> FinancingMode {
        FinancingMode::YearlyLimit {
            yearly_limit,
            used_this_year,
        }
    }

    fn monthly(monthly_limit: Decimal) -> FinancingMode {
        FinancingMode::MonthlyLimit { monthly_limit }
    }

    fn scoring(scoring_limit: Decimal) -> FinancingMode {
        FinancingMode::ScoringLimit { scoring_limit }
    }

    fn run(
        price: Decimal,
        term: u32,
        mode: FinancingMode,
    ) -> FinancingResult {
        let rates = RateTable::standard();
        FinancingCalculator::new(&rates).evaluate(&FinancingRequest::new(price, term, mode))
    }

    // =========================================================================
    // Plain mode
    // =========================================================================

    #[test]
    fn plain_mode_splits_price_into_down_and_financed() {
        let result = run(dec!(10000000), 10, plain(dec!(2000000)));

        assert_eq!(result.rate_pct, dec!(55));
        assert_eq!(result.applied_down, dec!(2000000));
        assert_eq!(result.financed_amount, dec!(8000000));
        assert_eq!(result.fee, dec!(4400000));
        assert_eq!(result.repayment_total, dec!(12400000));
        assert_eq!(result.displayed_monthly, dec!(1240000));
        assert_eq!(result.grand_total, dec!(14400000));
        assert!(!result.over_limit_warning);
    }

    #[test]
    fn plain_mode_invariants_hold_across_inputs() {
        let rates = RateTable::standard();
        let calculator = FinancingCalculator::new(&rates);

        for price in [dec!(0), dec!(1), dec!(999999.99), dec!(17000000)] {
            for fraction in [dec!(0), dec!(0.25), dec!(0.5), dec!(1)] {
                for term in 0..=MAX_TERM {
                    let down = price * fraction;
                    let result =
                        calculator.evaluate(&FinancingRequest::new(price, term, plain(down)));

                    assert_eq!(result.financed_amount + result.applied_down, price);
                    assert_eq!(
                        result.repayment_total,
                        result.financed_amount * markup_factor(result.rate_pct)
                    );
                    assert_eq!(
                        result.grand_total,
                        result.repayment_total + result.applied_down
                    );
                }
            }
        }
    }

    #[test]
    fn plain_mode_warns_when_down_exceeds_price() {
        let result = run(dec!(10000000), 6, plain(dec!(12000000)));

        assert!(result.over_limit_warning);
        assert_eq!(result.financed_amount, dec!(0));
        assert_eq!(result.grand_total, dec!(12000000));
    }

    #[test]
    fn plain_mode_clamps_negative_inputs() {
        let result = run(dec!(-500), 3, plain(dec!(-100)));

        assert_eq!(result.applied_down, dec!(0));
        assert_eq!(result.financed_amount, dec!(0));
        assert_eq!(result.grand_total, dec!(0));
        assert!(!result.over_limit_warning);
    }

    // =========================================================================
    // Yearly limit mode
    // =========================================================================

    #[test]
    fn yearly_limit_scenario() {
        let result = run(dec!(17000000), 10, yearly(dec!(12000000), dec!(0)));

        assert_eq!(result.applied_down, dec!(5000000));
        assert_eq!(result.financed_amount, dec!(12000000));
        assert_eq!(result.displayed_monthly, dec!(1860000));
        assert_eq!(result.grand_total, dec!(23600000));
    }

    #[test]
    fn yearly_limit_subtracts_used_amount() {
        let result = run(dec!(17000000), 10, yearly(dec!(12000000), dec!(4000000)));

        assert_eq!(result.applied_down, dec!(9000000));
    }

    #[test]
    fn yearly_limit_down_is_independent_of_rate() {
        let rates = RateTable::standard();
        let calculator = FinancingCalculator::new(&rates);
        let mode = yearly(dec!(3000000), dec!(500000));

        for quote in calculator.evaluate_all_terms(dec!(4000000), &mode) {
            assert_eq!(quote.result.applied_down, dec!(1500000));
        }
    }

    #[test]
    fn yearly_limit_overused_allowance_means_full_down() {
        let result = run(dec!(5000000), 4, yearly(dec!(1000000), dec!(3000000)));

        assert_eq!(result.applied_down, dec!(5000000));
        assert_eq!(result.financed_amount, dec!(0));
        assert!(!result.over_limit_warning);
    }

    #[test]
    fn yearly_limit_larger_than_price_needs_no_down() {
        let result = run(dec!(5000000), 4, yearly(dec!(20000000), dec!(0)));

        assert_eq!(result.applied_down, dec!(0));
        assert_eq!(result.financed_amount, dec!(5000000));
    }

    // =========================================================================
    // Monthly limit mode
    // =========================================================================

    #[test]
    fn monthly_limit_solved_down_matches_limit() {
        let limit = dec!(1000000);
        let result = run(dec!(17000000), 10, monthly(limit));

        let derived_monthly = result.repayment_total / dec!(10);
        assert!((derived_monthly - limit).abs() <= dec!(1));
        assert!(result.applied_down > dec!(0));
        assert!(result.applied_down < dec!(17000000));
    }

    #[test]
    fn monthly_limit_displays_limit_not_derived_value() {
        let limit = dec!(333333);
        let result = run(dec!(9000000), 7, monthly(limit));

        // The derived value may differ in the last digits; the limit is what is shown.
        assert_eq!(result.displayed_monthly, limit);
        let derived_monthly = result.repayment_total / dec!(7);
        assert!((derived_monthly - limit).abs() <= dec!(1));
    }

    #[test]
    fn monthly_limit_high_enough_needs_no_down() {
        let result = run(dec!(1000000), 5, monthly(dec!(5000000)));

        assert_eq!(result.applied_down, dec!(0));
        assert_eq!(result.financed_amount, dec!(1000000));
        assert_eq!(result.displayed_monthly, dec!(5000000));
    }

    #[test]
    fn monthly_limit_without_term_puts_whole_price_down() {
        let result = run(dec!(1000000), 0, monthly(dec!(250000)));

        assert_eq!(result.rate_pct, dec!(0));
        assert_eq!(result.applied_down, dec!(1000000));
        assert_eq!(result.financed_amount, dec!(0));
        assert_eq!(result.displayed_monthly, dec!(250000));
    }

    // =========================================================================
    // Scoring limit mode
    // =========================================================================

    #[test]
    fn scoring_limit_binding_scenario() {
        let result = run(dec!(14000000), 10, scoring(dec!(16000000)));

        assert_eq!(result.applied_down, dec!(5700000));
        assert_eq!(result.repayment_total, dec!(16000000));
        assert_eq!(result.displayed_monthly, dec!(1600000));
        assert_eq!(result.grand_total, dec!(21700000));
        assert!(!result.over_limit_warning);
    }

    #[test]
    fn scoring_limit_non_binding_scenario() {
        let result = run(dec!(5000000), 4, scoring(dec!(10000000)));

        assert_eq!(result.applied_down, dec!(0));
        assert_eq!(result.repayment_total, dec!(6250000));
        assert_eq!(result.financed_amount, dec!(5000000));
        assert_eq!(result.fee, dec!(1250000));
        assert_eq!(result.displayed_monthly, dec!(1562500));
    }

    #[test]
    fn scoring_limit_zero_warns_when_markup_exceeds_price() {
        let result = run(dec!(100), 10, scoring(dec!(0)));

        assert_eq!(result.applied_down, dec!(155));
        assert_eq!(result.displayed_monthly, dec!(0));
        assert!(result.over_limit_warning);
    }

    // =========================================================================
    // Unselected term and purity
    // =========================================================================

    #[test]
    fn zero_term_uses_zero_rate_and_zero_monthly() {
        for mode in [plain(dec!(100)), yearly(dec!(500), dec!(0)), scoring(dec!(700))] {
            let result = run(dec!(1000), 0, mode);

            assert_eq!(result.rate_pct, dec!(0));
            assert_eq!(result.fee, dec!(0));
            assert_eq!(result.displayed_monthly, dec!(0));
        }
    }

    #[test]
    fn term_past_table_has_zero_rate() {
        let result = run(dec!(1600), 16, plain(dec!(0)));

        assert_eq!(result.rate_pct, dec!(0));
        assert_eq!(result.displayed_monthly, dec!(100));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let rates = RateTable::standard();
        let request = FinancingRequest::new(dec!(9876543.21), 11, monthly(dec!(777777)));

        let first = evaluate(&request, &rates);
        let second = evaluate(&request, &rates);

        assert_eq!(first, second);
        assert_eq!(first.grand_total.serialize(), second.grand_total.serialize());
    }

    #[test]
    fn evaluate_all_terms_covers_every_month() {
        let rates = RateTable::standard();
        let quotes = FinancingCalculator::new(&rates).evaluate_all_terms(dec!(1000), &plain(dec!(0)));

        assert_eq!(quotes.len(), 15);
        assert_eq!(quotes[0].term, 1);
        assert_eq!(quotes[0].result.repayment_total, dec!(1050));
        assert_eq!(quotes[14].term, 15);
        assert_eq!(quotes[14].result.repayment_total, dec!(1700));
    }

    // =========================================================================
    // Extreme amounts
    // =========================================================================

    #[test]
    fn largest_amounts_saturate_in_every_mode() {
        let huge = Decimal::MAX;
        for mode in [
            plain(dec!(0)),
            yearly(huge, dec!(0)),
            yearly(dec!(0), dec!(0)),
            monthly(huge),
            monthly(dec!(10000000000000000000000000000)),
            scoring(huge),
            scoring(dec!(0)),
        ] {
            for term in [0, 10, 15] {
                let result = run(huge, term, mode);

                assert!(result.grand_total <= huge);
                assert!(result.repayment_total >= result.financed_amount);
            }
        }
    }

    #[test]
    fn largest_price_plain_mode_caps_totals() {
        let result = run(Decimal::MAX, 10, plain(dec!(0)));

        assert_eq!(result.financed_amount, Decimal::MAX);
        assert_eq!(result.repayment_total, Decimal::MAX);
        assert_eq!(result.grand_total, Decimal::MAX);
        assert!(!result.over_limit_warning);
    }

    // =========================================================================
    // Rate table contract
    // =========================================================================

    #[test]
    fn rate_helpers_follow_table_semantics() {
        let rates = reset_rates();

        let edited = set_rate(&rates, 10, dec!(60));

        assert_eq!(get_rate(&rates, 10), dec!(55));
        assert_eq!(get_rate(&edited, 10), dec!(60));
        assert_eq!(get_rate(&edited, 0), dec!(0));
    }

    #[test]
    fn evaluate_reads_edited_rate() {
        let rates = set_rate(&reset_rates(), 2, dec!(50));
        let request = FinancingRequest::new(dec!(1000), 2, plain(dec!(0)));

        let result = evaluate(&request, &rates);

        assert_eq!(result.repayment_total, dec!(1500));
        assert_eq!(result.displayed_monthly, dec!(750));
    }
}
