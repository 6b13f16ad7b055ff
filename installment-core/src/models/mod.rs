mod financing_mode;
mod financing_request;
mod financing_result;
mod rate_table;

pub use financing_mode::{FinancingMode, ModeKind};
pub use financing_request::FinancingRequest;
pub use financing_result::FinancingResult;
pub use rate_table::{MAX_TERM, MIN_TERM, RatePreset, RateTable, RateTableError};
