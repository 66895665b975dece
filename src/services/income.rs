//! Income service
//!
//! Create, edit and delete incomes with validation and audit logging.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Income, IncomeId, Money, Period};
use crate::storage::Storage;

use super::period::filter_period;

/// Changes to apply to an existing income; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct IncomeChanges {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub source: Option<String>,
}

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new income
    pub fn create(
        &self,
        description: &str,
        amount: Money,
        date: NaiveDate,
        source: &str,
    ) -> FinanceResult<Income> {
        let income = Income::new(description.trim(), amount, date, source.trim());
        income.validate()?;

        self.storage.store().save_income(&income)?;

        self.storage.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &income,
        );
        tracing::debug!(id = %income.id, amount = %income.amount, "income created");

        Ok(income)
    }

    pub fn get(&self, id: IncomeId) -> FinanceResult<Option<Income>> {
        Ok(self.list()?.into_iter().find(|i| i.id == id))
    }

    /// Find an income by full id or short id ("inc-1a2b3c4d")
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Income>> {
        let identifier = identifier.trim();
        Ok(self
            .list()?
            .into_iter()
            .find(|i| i.id.to_string() == identifier || i.id.short() == identifier))
    }

    /// All incomes in storage order
    pub fn list(&self) -> FinanceResult<Vec<Income>> {
        self.storage.store().list_incomes()
    }

    /// Incomes dated inside a period, newest first
    pub fn list_for_period(&self, period: &Period) -> FinanceResult<Vec<Income>> {
        let mut incomes = filter_period(&self.list()?, period);
        incomes.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(incomes)
    }

    /// Apply changes to an income in place (same id)
    pub fn update(&self, id: IncomeId, changes: IncomeChanges) -> FinanceResult<Income> {
        let before = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Income", id.short()))?;

        let mut income = before.clone();
        if let Some(description) = changes.description {
            income.description = description.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            income.amount = amount;
        }
        if let Some(date) = changes.date {
            income.date = date;
        }
        if let Some(source) = changes.source {
            income.source = source.trim().to_string();
        }
        income.validate()?;

        self.storage.store().save_income(&income)?;

        self.storage.log_update(
            EntityType::Income,
            income.id.to_string(),
            Some(income.description.clone()),
            &before,
            &income,
            None,
        );

        Ok(income)
    }

    pub fn delete(&self, id: IncomeId) -> FinanceResult<Income> {
        let income = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Income", id.short()))?;

        self.storage.store().delete_income(id)?;

        self.storage.log_delete(
            EntityType::Income,
            id.to_string(),
            Some(income.description.clone()),
            &income,
        );

        Ok(income)
    }
}
