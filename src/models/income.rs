//! Income model
//!
//! An income is money received into a bank account or digital wallet. The
//! source is stored as a name reference, not an id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::IncomeId;
use super::money::Money;
use crate::error::{FinanceResult, ValidationErrors};

/// Money received on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,

    pub description: String,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,

    /// Name of the bank or wallet the money went into
    pub source: String,
}

impl Income {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: IncomeId::new(),
            description: description.into(),
            amount,
            date,
            source: source.into(),
        }
    }

    /// Validate the income
    pub fn validate(&self) -> FinanceResult<()> {
        let mut errors = ValidationErrors::new();

        if self.description.trim().chars().count() < 3 {
            errors.add("description", "must be at least 3 characters");
        }
        if !self.amount.is_positive() {
            errors.add("amount", "must be positive");
        }
        if self.source.trim().is_empty() {
            errors.add("source", "a bank or wallet is required");
        }

        errors.into_result()
    }
}
