//! FinanceFlow - personal finance tracking from the terminal
//!
//! Records incomes and expenses (with credit-card installments), keeps a
//! registry of banks, cards and wallets, and reports monthly and annual
//! totals against a savings goal.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (incomes, expenses, banks, periods, etc.)
//! - `storage`: JSON file and SQLite backends behind one store interface
//! - `services`: Business logic layer
//! - `reports`: Monthly dashboard and annual series
//! - `export`: CSV export and full JSON/YAML snapshots
//! - `advice`: Financial advice from a language model
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use financeflow::config::{FinancePaths, Settings};
//! use financeflow::storage::Storage;
//!
//! let paths = FinancePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths, settings.backend)?;
//! ```

pub mod advice;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
