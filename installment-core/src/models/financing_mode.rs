use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the down payment is determined.
///
/// Exactly one mode is active at a time and each variant carries only its own
/// parameters, so switching modes discards the parameters of the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FinancingMode {
    /// The customer states the down payment directly.
    Plain { down: Decimal },

    /// Down payment is whatever the remaining yearly credit allowance cannot cover.
    YearlyLimit {
        yearly_limit: Decimal,
        used_this_year: Decimal,
    },

    /// Down payment is solved so the monthly installment equals the limit.
    MonthlyLimit { monthly_limit: Decimal },

    /// Down payment is whatever exceeds the approved total repayment.
    ScoringLimit { scoring_limit: Decimal },
}

impl FinancingMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Plain { .. } => ModeKind::Plain,
            Self::YearlyLimit { .. } => ModeKind::YearlyLimit,
            Self::MonthlyLimit { .. } => ModeKind::MonthlyLimit,
            Self::ScoringLimit { .. } => ModeKind::ScoringLimit,
        }
    }
}

impl Default for FinancingMode {
    fn default() -> Self {
        ModeKind::Plain.default_mode()
    }
}

/// Parameter-free discriminant of [`FinancingMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Plain,
    YearlyLimit,
    MonthlyLimit,
    ScoringLimit,
}

impl ModeKind {
    pub fn label(&self) -> &'static str {
        match self {
            ModeKind::Plain => "Down payment",
            ModeKind::YearlyLimit => "Yearly limit",
            ModeKind::MonthlyLimit => "Monthly limit",
            ModeKind::ScoringLimit => "Scoring limit",
        }
    }

    /// The variant of this kind with every parameter set to zero.
    pub fn default_mode(&self) -> FinancingMode {
        match self {
            ModeKind::Plain => FinancingMode::Plain {
                down: Decimal::ZERO,
            },
            ModeKind::YearlyLimit => FinancingMode::YearlyLimit {
                yearly_limit: Decimal::ZERO,
                used_this_year: Decimal::ZERO,
            },
            ModeKind::MonthlyLimit => FinancingMode::MonthlyLimit {
                monthly_limit: Decimal::ZERO,
            },
            ModeKind::ScoringLimit => FinancingMode::ScoringLimit {
                scoring_limit: Decimal::ZERO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_mode_round_trips_kind() {
        for kind in [
            ModeKind::Plain,
            ModeKind::YearlyLimit,
            ModeKind::MonthlyLimit,
            ModeKind::ScoringLimit,
        ] {
            assert_eq!(kind.default_mode().kind(), kind);
        }
    }

    #[test]
    fn default_is_plain_with_no_down_payment() {
        assert_eq!(
            FinancingMode::default(),
            FinancingMode::Plain {
                down: Decimal::ZERO
            }
        );
    }
}
