//! Credit card and digital wallet models

use serde::{Deserialize, Serialize};

use super::ids::{CardId, WalletId};
use crate::error::{FinanceResult, ValidationErrors};

/// A credit card. `bank` is a name reference that is not enforced: the
/// bank may be renamed or deleted later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub bank: String,
}

impl Card {
    pub fn new(name: impl Into<String>, bank: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            bank: bank.into(),
        }
    }

    pub fn validate(&self) -> FinanceResult<()> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.add("name", "must be at least 2 characters");
        }
        if self.bank.trim().chars().count() < 2 {
            errors.add("bank", "must be at least 2 characters");
        }
        errors.into_result()
    }
}

/// A digital wallet, usable as an income source next to banks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub name: String,
}

impl Wallet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WalletId::new(),
            name: name.into(),
        }
    }

    pub fn validate(&self) -> FinanceResult<()> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.add("name", "must be at least 2 characters");
        }
        errors.into_result()
    }
}
