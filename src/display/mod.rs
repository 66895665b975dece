//! Display formatting for terminal output
//!
//! Tables for entity lists and small helpers shared by the reports.

pub mod report;
pub mod tables;

pub use tables::{
    format_bank_details, format_bank_list, format_card_list, format_expense_list,
    format_income_list, format_wallet_list,
};
