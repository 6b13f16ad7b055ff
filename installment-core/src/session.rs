//! State behind a single calculator form.
//!
//! The session holds the raw form values, makes sure exactly one financing
//! mode is active, and evaluates against the committed rate table. Every
//! setter takes the text as typed; coercion happens here so the form never
//! has to validate anything.

use rust_decimal::Decimal;
use tracing::debug;

use crate::input::{coerce_amount, coerce_term};
use crate::{
    FinancingCalculator, FinancingMode, FinancingRequest, FinancingResult, ModeKind, RateTable,
    RateTableEditor,
};

#[derive(Debug, Clone, Default)]
pub struct CalculatorSession {
    price: Decimal,
    term: u32,
    mode: FinancingMode,
    rates: RateTableEditor,
}

impl CalculatorSession {
    /// New session whose rate table starts (and resets) at `baseline`.
    pub fn new(baseline: RateTable) -> Self {
        Self {
            rates: RateTableEditor::new(baseline),
            ..Default::default()
        }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn mode(&self) -> &FinancingMode {
        &self.mode
    }

    pub fn rates(&self) -> &RateTableEditor {
        &self.rates
    }

    pub fn rates_mut(&mut self) -> &mut RateTableEditor {
        &mut self.rates
    }

    pub fn set_price(
        &mut self,
        text: &str,
    ) {
        self.price = coerce_amount(text);
    }

    pub fn set_term(
        &mut self,
        text: &str,
    ) {
        self.term = coerce_term(text);
    }

    /// Activates `kind`, clearing the parameters of every other mode.
    pub fn select_mode(
        &mut self,
        kind: ModeKind,
    ) {
        self.mode = kind.default_mode();
    }

    /// Checkbox behaviour: turning the active limit mode off falls back to a
    /// plain down payment; turning any other mode on selects it.
    pub fn toggle_mode(
        &mut self,
        kind: ModeKind,
    ) {
        if self.mode.kind() == kind {
            self.select_mode(ModeKind::Plain);
        } else {
            self.select_mode(kind);
        }
    }

    pub fn set_down(
        &mut self,
        text: &str,
    ) {
        match &mut self.mode {
            FinancingMode::Plain { down } => *down = coerce_amount(text),
            other => Self::ignore("down", other),
        }
    }

    pub fn set_yearly_limit(
        &mut self,
        text: &str,
    ) {
        match &mut self.mode {
            FinancingMode::YearlyLimit { yearly_limit, .. } => *yearly_limit = coerce_amount(text),
            other => Self::ignore("yearly_limit", other),
        }
    }

    pub fn set_used_this_year(
        &mut self,
        text: &str,
    ) {
        match &mut self.mode {
            FinancingMode::YearlyLimit { used_this_year, .. } => {
                *used_this_year = coerce_amount(text)
            }
            other => Self::ignore("used_this_year", other),
        }
    }

    pub fn set_monthly_limit(
        &mut self,
        text: &str,
    ) {
        match &mut self.mode {
            FinancingMode::MonthlyLimit { monthly_limit } => *monthly_limit = coerce_amount(text),
            other => Self::ignore("monthly_limit", other),
        }
    }

    pub fn set_scoring_limit(
        &mut self,
        text: &str,
    ) {
        match &mut self.mode {
            FinancingMode::ScoringLimit { scoring_limit } => *scoring_limit = coerce_amount(text),
            other => Self::ignore("scoring_limit", other),
        }
    }

    fn ignore(
        field: &'static str,
        active: &FinancingMode,
    ) {
        debug!(field, active = ?active.kind(), "ignoring input for inactive mode");
    }

    pub fn request(&self) -> FinancingRequest {
        FinancingRequest::new(self.price, self.term, self.mode)
    }

    /// Evaluates the current form against the committed rate table.
    pub fn evaluate(&self) -> FinancingResult {
        FinancingCalculator::new(self.rates.committed()).evaluate(&self.request())
    }
}
