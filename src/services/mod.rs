//! Service layer for FinanceFlow
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, installment expansion, name-reference checks and audit
//! logging of every change.

pub mod bank;
pub mod card;
pub mod expense;
pub mod import;
pub mod income;
pub mod installments;
pub mod period;
pub mod savings;

pub use bank::{AccountChanges, BankService};
pub use card::{CardService, CardSummary, WalletService};
pub use expense::{ExpenseChanges, ExpenseService, NewExpense};
pub use import::{ImportResult, ImportService, ImportStatus};
pub use income::{IncomeChanges, IncomeService};
pub use installments::expand_installments;
pub use period::{filter_month, filter_period, filter_range, filter_year, PeriodService};
pub use savings::SavingsService;
