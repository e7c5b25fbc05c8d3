//! Unit economics of a data-center capital investment.
//!
//! Assumptions flow one way: [`pnl::compute_pnl`] derives a steady-state
//! annual P&L, [`cash_flow::project_cash_flows`] repeats it over the
//! projection horizon, and [`returns::derive_returns`] adds IRR and ROIC.
//! All functions are pure and hold no state between calls.

pub mod assumptions;
pub mod cash_flow;
pub mod error;
pub mod model;
pub mod pnl;
pub mod returns;
pub mod summary;
pub mod time_value;
pub mod types;

pub use error::ModelError;
pub use types::*;

/// Standard result type for all model operations
pub type ModelResult<T> = Result<T, ModelError>;
