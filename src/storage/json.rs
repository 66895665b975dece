//! JSON file backend
//!
//! Each entity kind lives in its own file under the data directory, cached
//! in memory behind an `RwLock`. A mutation builds the new collection,
//! writes it atomically, and only then swaps it into the cache.

use std::path::PathBuf;
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use super::file_io::{read_json, write_json_atomic};
use super::RecordStore;
use crate::config::paths::FinancePaths;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Bank, BankId, Card, CardId, Expense, ExpenseId, Income, IncomeId, SavingsGoal, Wallet,
    WalletId,
};

/// Records addressable by an id
trait Keyed {
    type Id: PartialEq + Copy;
    fn key(&self) -> Self::Id;
}

macro_rules! keyed {
    ($ty:ty, $id:ty) => {
        impl Keyed for $ty {
            type Id = $id;
            fn key(&self) -> $id {
                self.id
            }
        }
    };
}

keyed!(Income, IncomeId);
keyed!(Expense, ExpenseId);
keyed!(Bank, BankId);
keyed!(Card, CardId);
keyed!(Wallet, WalletId);

/// One JSON file holding an ordered list of records
struct JsonCollection<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> JsonCollection<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned,
{
    fn load(path: PathBuf) -> FinanceResult<Self> {
        let records: Vec<T> = read_json(&path)?;
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    fn list(&self) -> FinanceResult<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(records.clone())
    }

    /// Apply `change` to a copy, persist it, then publish it
    fn mutate<R>(&self, change: impl FnOnce(&mut Vec<T>) -> R) -> FinanceResult<R> {
        let mut records = self
            .records
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut next = records.clone();
        let result = change(&mut next);
        write_json_atomic(&self.path, &next)?;
        *records = next;

        Ok(result)
    }

    fn upsert_many(&self, items: &[T]) -> FinanceResult<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.mutate(|records| {
            for item in items {
                match records.iter_mut().find(|r| r.key() == item.key()) {
                    Some(existing) => *existing = item.clone(),
                    None => records.push(item.clone()),
                }
            }
        })
    }

    fn remove(&self, id: T::Id) -> FinanceResult<bool> {
        let exists = self.list()?.iter().any(|r| r.key() == id);
        if !exists {
            return Ok(false);
        }
        self.mutate(|records| records.retain(|r| r.key() != id))?;
        Ok(true)
    }
}

/// Record store backed by JSON files
pub struct JsonStore {
    incomes: JsonCollection<Income>,
    expenses: JsonCollection<Expense>,
    banks: JsonCollection<Bank>,
    cards: JsonCollection<Card>,
    wallets: JsonCollection<Wallet>,
    goal_path: PathBuf,
    goal: RwLock<Option<SavingsGoal>>,
}

impl JsonStore {
    /// Load every collection from the data directory
    pub fn open(paths: &FinancePaths) -> FinanceResult<Self> {
        let goal_path = paths.savings_goal_file();
        let goal: Option<SavingsGoal> = read_json(&goal_path)?;

        Ok(Self {
            incomes: JsonCollection::load(paths.incomes_file())?,
            expenses: JsonCollection::load(paths.expenses_file())?,
            banks: JsonCollection::load(paths.banks_file())?,
            cards: JsonCollection::load(paths.cards_file())?,
            wallets: JsonCollection::load(paths.wallets_file())?,
            goal_path,
            goal: RwLock::new(goal),
        })
    }
}

impl RecordStore for JsonStore {
    fn list_incomes(&self) -> FinanceResult<Vec<Income>> {
        self.incomes.list()
    }

    fn save_incomes(&self, incomes: &[Income]) -> FinanceResult<()> {
        self.incomes.upsert_many(incomes)
    }

    fn delete_income(&self, id: IncomeId) -> FinanceResult<bool> {
        self.incomes.remove(id)
    }

    fn list_expenses(&self) -> FinanceResult<Vec<Expense>> {
        self.expenses.list()
    }

    fn save_expenses(&self, expenses: &[Expense]) -> FinanceResult<()> {
        self.expenses.upsert_many(expenses)
    }

    fn delete_expense(&self, id: ExpenseId) -> FinanceResult<bool> {
        self.expenses.remove(id)
    }

    fn list_banks(&self) -> FinanceResult<Vec<Bank>> {
        self.banks.list()
    }

    fn save_bank(&self, bank: &Bank) -> FinanceResult<()> {
        self.banks.upsert_many(std::slice::from_ref(bank))
    }

    // Accounts are embedded in the bank record, so they go with it
    fn delete_bank(&self, id: BankId) -> FinanceResult<bool> {
        self.banks.remove(id)
    }

    fn list_cards(&self) -> FinanceResult<Vec<Card>> {
        self.cards.list()
    }

    fn save_card(&self, card: &Card) -> FinanceResult<()> {
        self.cards.upsert_many(std::slice::from_ref(card))
    }

    fn delete_card(&self, id: CardId) -> FinanceResult<bool> {
        self.cards.remove(id)
    }

    fn list_wallets(&self) -> FinanceResult<Vec<Wallet>> {
        self.wallets.list()
    }

    fn save_wallet(&self, wallet: &Wallet) -> FinanceResult<()> {
        self.wallets.upsert_many(std::slice::from_ref(wallet))
    }

    fn delete_wallet(&self, id: WalletId) -> FinanceResult<bool> {
        self.wallets.remove(id)
    }

    fn savings_goal(&self) -> FinanceResult<Option<SavingsGoal>> {
        let goal = self
            .goal
            .read()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(*goal)
    }

    fn set_savings_goal(&self, goal: SavingsGoal) -> FinanceResult<()> {
        let mut current = self
            .goal
            .write()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        write_json_atomic(&self.goal_path, &Some(goal))?;
        *current = Some(goal);
        Ok(())
    }
}
