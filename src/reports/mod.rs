//! Reports module for FinanceFlow
//!
//! The monthly dashboard and the annual series. Both are computed from
//! plain record lists, so they work the same over either storage backend.

pub mod annual;
pub mod dashboard;

pub use annual::{AnnualSeries, MonthBucket};
pub use dashboard::{CumulativeSavings, GoalProgress, MonthlySummary};
