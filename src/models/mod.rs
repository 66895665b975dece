//! Core data models for FinanceFlow
//!
//! This module contains the data structures of the finance domain: incomes,
//! expenses and their payment methods, banks with accounts, cards, wallets,
//! the savings goal and reporting periods.

pub mod bank;
pub mod card;
pub mod expense;
pub mod ids;
pub mod income;
pub mod money;
pub mod period;
pub mod savings;

pub use bank::{Account, Bank, Currency, SAVINGS_BANK_NAME};
pub use card::{Card, Wallet};
pub use expense::{Expense, PaymentMethod};
pub use ids::{AccountId, BankId, CardId, ExpenseId, IncomeId, WalletId};
pub use income::Income;
pub use money::Money;
pub use period::Period;
pub use savings::SavingsGoal;
