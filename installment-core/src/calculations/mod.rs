//! Installment pricing calculations.
//!
//! This module provides the financing arithmetic that turns a product price,
//! a term and a markup-rate table into a down payment, a monthly payment and
//! a grand total.

pub mod common;
pub mod financing;

pub use financing::{FinancingCalculator, TermQuote, evaluate, get_rate, reset_rates, set_rate};
