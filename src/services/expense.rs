//! Expense service
//!
//! New credit purchases with several installments are expanded into one
//! record per installment before saving. Edits never re-expand.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Expense, ExpenseId, Money, PaymentMethod, Period};
use crate::storage::Storage;

use super::installments::expand_installments;
use super::period::filter_period;

/// Fields of a new expense as submitted by the user
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub payment: PaymentMethod,
    pub is_saving: bool,
}

/// Changes to apply to an existing expense; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub payment: Option<PaymentMethod>,
    pub is_saving: Option<bool>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new expense, expanding installments. Returns every stored
    /// record; all of them are saved in a single write or none are.
    pub fn create(&self, new: NewExpense) -> FinanceResult<Vec<Expense>> {
        let mut expense = Expense::new(new.description.trim(), new.amount, new.date, new.payment);
        expense.is_saving = new.is_saving;
        expense.validate_new()?;

        let records = expand_installments(&expense);
        self.storage.store().save_expenses(&records)?;

        let entries: Vec<AuditEntry> = records
            .iter()
            .map(|e| {
                AuditEntry::create(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            })
            .collect();
        self.storage.log_batch(&entries);

        if records.len() > 1 {
            tracing::info!(
                installments = records.len(),
                total = %expense.amount,
                "expense expanded into installments"
            );
        }

        Ok(records)
    }

    pub fn get(&self, id: ExpenseId) -> FinanceResult<Option<Expense>> {
        Ok(self.list()?.into_iter().find(|e| e.id == id))
    }

    /// Find an expense by full id or short id ("exp-1a2b3c4d")
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Expense>> {
        let identifier = identifier.trim();
        Ok(self
            .list()?
            .into_iter()
            .find(|e| e.id.to_string() == identifier || e.id.short() == identifier))
    }

    pub fn list(&self) -> FinanceResult<Vec<Expense>> {
        self.storage.store().list_expenses()
    }

    /// Expenses dated inside a period, newest first
    pub fn list_for_period(&self, period: &Period) -> FinanceResult<Vec<Expense>> {
        let mut expenses = filter_period(&self.list()?, period);
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(expenses)
    }

    /// Edit a single stored record in place. Changing the installment count
    /// only relabels this record.
    pub fn update(&self, id: ExpenseId, changes: ExpenseChanges) -> FinanceResult<Expense> {
        let before = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Expense", id.short()))?;

        let mut expense = before.clone();
        if let Some(description) = changes.description {
            expense.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            expense.amount = amount;
        }
        if let Some(date) = changes.date {
            expense.date = date;
        }
        if let Some(payment) = changes.payment {
            expense.payment = payment;
        }
        if let Some(is_saving) = changes.is_saving {
            expense.is_saving = is_saving;
        }
        expense.validate()?;

        self.storage.store().save_expense(&expense)?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            &before,
            &expense,
            None,
        );

        Ok(expense)
    }

    pub fn delete(&self, id: ExpenseId) -> FinanceResult<Expense> {
        let expense = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Expense", id.short()))?;

        self.storage.store().delete_expense(id)?;

        self.storage.log_delete(
            EntityType::Expense,
            id.to_string(),
            Some(expense.description.clone()),
            &expense,
        );

        Ok(expense)
    }
}
