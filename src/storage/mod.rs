//! Storage layer for FinanceFlow
//!
//! `RecordStore` is the one persistence interface the services talk to. Two
//! backends implement it:
//!
//! - `JsonStore`: one JSON file per entity kind, written atomically
//! - `SqliteStore`: relational tables in a single SQLite database
//!
//! Every mutating call is all-or-nothing: when it returns an error the
//! stored data and any in-memory cache are exactly as before the call.

pub mod file_io;
pub mod init;
pub mod json;
pub mod sqlite;

#[cfg(test)]
mod contract;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use json::JsonStore;
pub use sqlite::SqliteStore;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::FinancePaths;
use crate::config::settings::StorageBackend;
use crate::error::FinanceResult;
use crate::models::{
    Bank, BankId, Card, CardId, Expense, ExpenseId, Income, IncomeId, SavingsGoal, Wallet,
    WalletId,
};

/// Persistence interface shared by all backends
///
/// `save_*` upserts by id. `delete_*` returns whether a record was removed.
pub trait RecordStore: Send + Sync {
    fn list_incomes(&self) -> FinanceResult<Vec<Income>>;
    /// Upsert several incomes in one all-or-nothing write
    fn save_incomes(&self, incomes: &[Income]) -> FinanceResult<()>;
    fn delete_income(&self, id: IncomeId) -> FinanceResult<bool>;

    fn list_expenses(&self) -> FinanceResult<Vec<Expense>>;
    /// Upsert several expenses in one all-or-nothing write
    fn save_expenses(&self, expenses: &[Expense]) -> FinanceResult<()>;
    fn delete_expense(&self, id: ExpenseId) -> FinanceResult<bool>;

    fn list_banks(&self) -> FinanceResult<Vec<Bank>>;
    /// Upsert a bank together with its full account list
    fn save_bank(&self, bank: &Bank) -> FinanceResult<()>;
    /// Delete a bank and all of its accounts
    fn delete_bank(&self, id: BankId) -> FinanceResult<bool>;

    fn list_cards(&self) -> FinanceResult<Vec<Card>>;
    fn save_card(&self, card: &Card) -> FinanceResult<()>;
    fn delete_card(&self, id: CardId) -> FinanceResult<bool>;

    fn list_wallets(&self) -> FinanceResult<Vec<Wallet>>;
    fn save_wallet(&self, wallet: &Wallet) -> FinanceResult<()>;
    fn delete_wallet(&self, id: WalletId) -> FinanceResult<bool>;

    fn savings_goal(&self) -> FinanceResult<Option<SavingsGoal>>;
    fn set_savings_goal(&self, goal: SavingsGoal) -> FinanceResult<()>;

    fn save_income(&self, income: &Income) -> FinanceResult<()> {
        self.save_incomes(std::slice::from_ref(income))
    }

    fn save_expense(&self, expense: &Expense) -> FinanceResult<()> {
        self.save_expenses(std::slice::from_ref(expense))
    }
}

/// Storage coordinator: the selected backend plus the audit log
pub struct Storage {
    paths: FinancePaths,
    store: Box<dyn RecordStore>,
    audit: AuditLogger,
}

impl Storage {
    /// Open the configured backend under `paths`
    pub fn open(paths: FinancePaths, backend: StorageBackend) -> FinanceResult<Self> {
        paths.ensure_directories()?;

        let store: Box<dyn RecordStore> = match backend {
            StorageBackend::Json => Box::new(JsonStore::open(&paths)?),
            StorageBackend::Sqlite => Box::new(SqliteStore::open(&paths.database_file())?),
        };
        tracing::debug!(%backend, base = %paths.base_dir().display(), "storage opened");

        Ok(Self::with_store(paths, store))
    }

    /// Wrap an already-built store
    pub fn with_store(paths: FinancePaths, store: Box<dyn RecordStore>) -> Self {
        Self {
            audit: AuditLogger::new(paths.audit_log()),
            paths,
            store,
        }
    }

    pub fn paths(&self) -> &FinancePaths {
        &self.paths
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Check if storage has been initialized (settings written by `init`)
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.report_audit(1, self.audit.log(&AuditEntry::create(
            entity_type,
            entity_id,
            entity_name,
            entity,
        )));
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) {
        self.report_audit(1, self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        )));
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.report_audit(1, self.audit.log(&AuditEntry::delete(
            entity_type,
            entity_id,
            entity_name,
            entity,
        )));
    }

    /// Append a batch of entries with one flush
    pub fn log_batch(&self, entries: &[AuditEntry]) {
        self.report_audit(entries.len(), self.audit.log_batch(entries));
    }

    // The log_* helpers run after the store write succeeded. The mutation
    // is applied either way, so an audit failure is only reported.
    fn report_audit(&self, entries: usize, result: FinanceResult<()>) {
        if let Err(e) = result {
            tracing::warn!(
                error = %e,
                entries,
                path = %self.audit.path().display(),
                "failed to append to audit log"
            );
        }
    }
}
