//! Bank and account models
//!
//! A bank owns an ordered list of accounts. One bank, the savings bank, is
//! created on first run and can never be edited or deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, BankId};
use crate::error::{FinanceResult, ValidationErrors};

/// Name of the built-in savings bank. Expenses paid from it count as
/// withdrawals from savings.
pub const SAVINGS_BANK_NAME: &str = "Ahorros";

/// Account currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ars,
    Usd,
}

impl Currency {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ARS" => Some(Self::Ars),
            "USD" => Some(Self::Usd),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ars => "ARS",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An account held at a bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Account {
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            currency,
            cbu: None,
            alias: None,
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

/// A bank with its accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: BankId,
    pub name: String,
    /// False only for the savings bank
    #[serde(default = "default_deletable")]
    pub is_deletable: bool,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

fn default_deletable() -> bool {
    true
}

impl Bank {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BankId::new(),
            name: name.into(),
            is_deletable: true,
            accounts: Vec::new(),
        }
    }

    /// The built-in savings bank
    pub fn savings() -> Self {
        Self {
            is_deletable: false,
            ..Self::new(SAVINGS_BANK_NAME)
        }
    }

    pub fn is_savings(&self) -> bool {
        self.name == SAVINGS_BANK_NAME
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Insert or replace an account, keeping list order
    pub fn upsert_account(&mut self, account: Account) {
        match self.accounts.iter_mut().find(|a| a.id == account.id) {
            Some(existing) => *existing = account,
            None => self.accounts.push(account),
        }
    }

    /// Remove an account; returns it if it existed
    pub fn remove_account(&mut self, id: AccountId) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.id == id)?;
        Some(self.accounts.remove(index))
    }

    pub fn validate(&self) -> FinanceResult<()> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().chars().count() < 2 {
            errors.add("name", "must be at least 2 characters");
        }
        errors.into_result()
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_bank_is_protected() {
        let bank = Bank::savings();
        assert_eq!(bank.name, "Ahorros");
        assert!(!bank.is_deletable);
        assert!(bank.is_savings());
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::parse("usd"), Some(Currency::Usd));
        assert_eq!(Currency::parse("ARS"), Some(Currency::Ars));
        assert_eq!(Currency::parse("EUR"), None);
        assert_eq!(Currency::default(), Currency::Ars);
    }

    #[test]
    fn test_account_upsert_keeps_order() {
        let mut bank = Bank::new("Galicia");
        let first = Account::new("Caja de ahorro", Currency::Ars);
        let second = Account::new("Cuenta USD", Currency::Usd);
        bank.upsert_account(first.clone());
        bank.upsert_account(second.clone());

        let mut renamed = first.clone();
        renamed.name = "CA Pesos".into();
        bank.upsert_account(renamed);

        assert_eq!(bank.accounts.len(), 2);
        assert_eq!(bank.accounts[0].name, "CA Pesos");
        assert_eq!(bank.accounts[1].id, second.id);

        assert!(bank.remove_account(first.id).is_some());
        assert!(bank.remove_account(first.id).is_none());
        assert_eq!(bank.accounts.len(), 1);
    }

    #[test]
    fn test_validation() {
        assert!(Bank::new("B").validate().is_err());
        assert!(Account::new("C", Currency::Ars).validate().is_err());
        assert!(Bank::new("BBVA").validate().is_ok());
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        let account = Account::new("Cuenta", Currency::Usd);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["currency"], "USD");
        assert!(json.get("cbu").is_none());
    }
}
