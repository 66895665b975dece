//! JSON snapshot export
//!
//! Serializes every stored entity with schema versioning and counts.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Bank, Card, Expense, Income, SavingsGoal, Wallet};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full snapshot of the stored data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,

    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub banks: Vec<Bank>,
    pub cards: Vec<Card>,
    pub wallets: Vec<Wallet>,
    pub savings_goal: SavingsGoal,

    pub metadata: ExportMetadata,
}

/// Counts and date range, for a reader skimming the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub income_count: usize,
    pub expense_count: usize,
    pub bank_count: usize,
    pub account_count: usize,
    pub card_count: usize,
    pub wallet_count: usize,
    pub earliest_record: Option<NaiveDate>,
    pub latest_record: Option<NaiveDate>,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> FinanceResult<Self> {
        let store = storage.store();
        let incomes = store.list_incomes()?;
        let expenses = store.list_expenses()?;
        let banks = store.list_banks()?;
        let cards = store.list_cards()?;
        let wallets = store.list_wallets()?;
        let savings_goal = store.savings_goal()?.unwrap_or_default();

        let dates = || {
            incomes
                .iter()
                .map(|i| i.date)
                .chain(expenses.iter().map(|e| e.date))
        };
        let metadata = ExportMetadata {
            income_count: incomes.len(),
            expense_count: expenses.len(),
            bank_count: banks.len(),
            account_count: banks.iter().map(|b| b.accounts.len()).sum(),
            card_count: cards.len(),
            wallet_count: wallets.len(),
            earliest_record: dates().min(),
            latest_record: dates().max(),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            incomes,
            expenses,
            banks,
            cards,
            wallets,
            savings_goal,
            metadata,
        })
    }
}

/// Export the full snapshot as JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod};
    use crate::storage::test_support::create_test_storage;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_export_counts() {
        let (_temp_dir, storage) = create_test_storage();
        let store = storage.store();
        store
            .save_income(&Income::new("Sueldo", Money::from_units(1), date(2024, 3, 5), "Galicia"))
            .unwrap();
        store
            .save_expense(&Expense::new(
                "Nafta",
                Money::from_units(1),
                date(2023, 12, 1),
                PaymentMethod::Cash,
            ))
            .unwrap();
        store.save_wallet(&Wallet::new("Ualá")).unwrap();

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.income_count, 1);
        assert_eq!(export.metadata.bank_count, 1);
        assert_eq!(export.metadata.wallet_count, 1);
        assert_eq!(export.metadata.earliest_record, Some(date(2023, 12, 1)));
        assert_eq!(export.metadata.latest_record, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_json_parses_back() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .store()
            .save_income(&Income::new("Sueldo", Money::from_units(2500), date(2024, 3, 5), "Galicia"))
            .unwrap();

        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.incomes, storage.store().list_incomes().unwrap());
        assert_eq!(parsed.savings_goal.percentage, 20);
        assert_eq!(parsed.banks[0].name, "Ahorros");
    }
}
