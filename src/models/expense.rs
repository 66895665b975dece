//! Expense model
//!
//! The payment method is a tagged union: each variant carries exactly the
//! references that method needs (a bank for debit and transfer, a card and
//! an installment count for credit).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{FinanceError, FinanceResult, ValidationErrors};

pub const LABEL_DEBIT: &str = "Débito";
pub const LABEL_CREDIT: &str = "Crédito";
pub const LABEL_CASH: &str = "Efectivo";
pub const LABEL_TRANSFER: &str = "Transferencia";

/// Upper bound on credit installments (ten years of monthly payments)
pub const MAX_INSTALLMENTS: u32 = 120;

/// How an expense was paid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    Debit { bank: String },
    Credit { card: String, installments: u32 },
    Cash,
    Transfer { bank: String },
    Other {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bank: Option<String>,
    },
}

impl PaymentMethod {
    /// Single-payment credit purchase
    pub fn credit(card: impl Into<String>) -> Self {
        Self::Credit {
            card: card.into(),
            installments: 1,
        }
    }

    /// Label used in exports and tables
    pub fn label(&self) -> &str {
        match self {
            Self::Debit { .. } => LABEL_DEBIT,
            Self::Credit { .. } => LABEL_CREDIT,
            Self::Cash => LABEL_CASH,
            Self::Transfer { .. } => LABEL_TRANSFER,
            Self::Other { label, .. } => label,
        }
    }

    pub fn bank(&self) -> Option<&str> {
        match self {
            Self::Debit { bank } | Self::Transfer { bank } => Some(bank),
            Self::Other { bank, .. } => bank.as_deref(),
            Self::Credit { .. } | Self::Cash => None,
        }
    }

    pub fn card(&self) -> Option<&str> {
        match self {
            Self::Credit { card, .. } => Some(card),
            _ => None,
        }
    }

    /// Installment count; 1 for everything that is not credit
    pub fn installments(&self) -> u32 {
        match self {
            Self::Credit { installments, .. } => *installments,
            _ => 1,
        }
    }

    /// Bank if present, else card, else nothing
    pub fn counterparty(&self) -> Option<&str> {
        self.bank().or_else(|| self.card())
    }

    /// Build a method from its flat parts (label plus optional references).
    ///
    /// Labels are matched case-insensitively with or without accents, and the
    /// English names are accepted too. Unknown labels become `Other`.
    pub fn from_parts(
        label: &str,
        bank: Option<String>,
        card: Option<String>,
        installments: Option<u32>,
    ) -> Result<Self, String> {
        let bank = bank.filter(|b| !b.trim().is_empty());
        let card = card.filter(|c| !c.trim().is_empty());

        match normalize_label(label).as_str() {
            "debito" | "debit" => bank
                .map(|bank| Self::Debit { bank })
                .ok_or_else(|| "debit payments need a bank".to_string()),
            "credito" | "credit" => card
                .map(|card| Self::Credit {
                    card,
                    installments: installments.unwrap_or(1),
                })
                .ok_or_else(|| "credit payments need a card".to_string()),
            "efectivo" | "cash" => Ok(Self::Cash),
            "transferencia" | "transfer" => bank
                .map(|bank| Self::Transfer { bank })
                .ok_or_else(|| "transfers need a bank".to_string()),
            "" => Err("payment method is required".to_string()),
            _ => Ok(Self::Other {
                label: label.trim().to_string(),
                bank,
            }),
        }
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credit { card, installments } if *installments > 1 => {
                write!(f, "{} ({}, {} cuotas)", self.label(), card, installments)
            }
            _ => match self.counterparty() {
                Some(other) => write!(f, "{} ({})", self.label(), other),
                None => write!(f, "{}", self.label()),
            },
        }
    }
}

/// Money spent on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    pub description: String,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,

    pub payment: PaymentMethod,

    /// Contribution to savings rather than regular spending
    #[serde(default)]
    pub is_saving: bool,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: Money,
        date: NaiveDate,
        payment: PaymentMethod,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            description: description.into(),
            amount,
            date,
            payment,
            is_saving: false,
        }
    }

    /// Mark as a savings contribution
    pub fn saving(mut self) -> Self {
        self.is_saving = true;
        self
    }

    pub fn bank(&self) -> Option<&str> {
        self.payment.bank()
    }

    pub fn card(&self) -> Option<&str> {
        self.payment.card()
    }

    pub fn installments(&self) -> u32 {
        self.payment.installments()
    }

    /// Validate the expense
    pub fn validate(&self) -> FinanceResult<()> {
        let mut errors = ValidationErrors::new();

        if self.description.trim().chars().count() < 3 {
            errors.add("description", "must be at least 3 characters");
        }
        if !self.amount.is_positive() {
            errors.add("amount", "must be positive");
        }
        match &self.payment {
            PaymentMethod::Debit { bank } | PaymentMethod::Transfer { bank }
                if bank.trim().is_empty() =>
            {
                errors.add("bank", "a bank is required for this payment method");
            }
            PaymentMethod::Credit { card, installments } => {
                if card.trim().is_empty() {
                    errors.add("card", "a card is required for credit payments");
                }
                if *installments < 1 {
                    errors.add("installments", "must be at least 1");
                } else if *installments > MAX_INSTALLMENTS {
                    errors.add(
                        "installments",
                        format!("must be at most {}", MAX_INSTALLMENTS),
                    );
                }
            }
            PaymentMethod::Other { label, .. } if label.trim().is_empty() => {
                errors.add("payment", "payment method is required");
            }
            _ => {}
        }

        errors.into_result()
    }

    /// Validate a purchase that is about to be expanded into installments.
    /// Every installment must get at least one cent.
    pub fn validate_new(&self) -> FinanceResult<()> {
        self.validate()?;

        let installments = self.installments();
        if installments > 1 && self.amount.cents() < i64::from(installments) {
            return Err(FinanceError::invalid(
                "amount",
                format!("too small to split into {} installments", installments),
            ));
        }
        Ok(())
    }
}
