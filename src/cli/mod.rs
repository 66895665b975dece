//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod advice;
pub mod audit;
pub mod bank;
pub mod card;
pub mod expense;
pub mod export;
pub mod import;
pub mod income;
pub mod report;
pub mod savings;

pub use advice::handle_advice_command;
pub use audit::handle_audit_command;
pub use bank::{handle_account_command, handle_bank_command, AccountCommands, BankCommands};
pub use card::{handle_card_command, handle_wallet_command, CardCommands, WalletCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::handle_import_command;
pub use income::{handle_income_command, IncomeCommands};
pub use report::{handle_annual_command, handle_dashboard_command};
pub use savings::{handle_savings_command, SavingsCommands};

use chrono::{Local, NaiveDate};

use crate::error::{FinanceError, FinanceResult};
use crate::models::Money;

/// Parse a date argument: "hoy"/"today" or a calendar date
pub(crate) fn parse_date(s: &str) -> FinanceResult<NaiveDate> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("hoy") || s.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| {
            FinanceError::invalid("date", format!("invalid date '{}', use YYYY-MM-DD", s))
        })
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn parse_date_or_today(s: Option<&str>) -> FinanceResult<NaiveDate> {
    s.map(parse_date)
        .unwrap_or_else(|| Ok(Local::now().date_naive()))
}

pub(crate) fn parse_amount(s: &str) -> FinanceResult<Money> {
    Money::parse(s).map_err(|e| FinanceError::invalid("amount", e.to_string()))
}
