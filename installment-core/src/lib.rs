pub mod calculations;
pub mod editor;
pub mod input;
pub mod models;
pub mod session;

pub use calculations::{FinancingCalculator, TermQuote, evaluate, get_rate, reset_rates, set_rate};
pub use editor::RateTableEditor;
pub use models::*;
pub use session::CalculatorSession;
