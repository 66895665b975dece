//! Entity lists as terminal tables

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::models::{Bank, Expense, Income, Wallet};
use crate::services::CardSummary;

use super::report::truncate;

const DESCRIPTION_WIDTH: usize = 32;

#[derive(Tabled)]
struct IncomeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Descripción")]
    description: String,
    #[tabled(rename = "Monto")]
    amount: String,
    #[tabled(rename = "Origen")]
    source: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Fecha")]
    date: String,
    #[tabled(rename = "Descripción")]
    description: String,
    #[tabled(rename = "Monto")]
    amount: String,
    #[tabled(rename = "Método")]
    method: String,
    #[tabled(rename = "Ahorro")]
    saving: String,
}

#[derive(Tabled)]
struct BankRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Banco")]
    name: String,
    #[tabled(rename = "Cuentas")]
    accounts: usize,
    #[tabled(rename = "")]
    status: String,
}

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Cuenta")]
    name: String,
    #[tabled(rename = "Moneda")]
    currency: String,
    #[tabled(rename = "CBU")]
    cbu: String,
    #[tabled(rename = "Alias")]
    alias: String,
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tarjeta")]
    name: String,
    #[tabled(rename = "Banco")]
    bank: String,
}

#[derive(Tabled)]
struct WalletRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Billetera")]
    name: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn format_income_list(incomes: &[Income], settings: &Settings) -> String {
    if incomes.is_empty() {
        return "No hay ingresos.".to_string();
    }
    render(
        incomes
            .iter()
            .map(|i| IncomeRow {
                id: i.id.short(),
                date: settings.format_date(i.date),
                description: truncate(&i.description, DESCRIPTION_WIDTH),
                amount: settings.format_money(i.amount),
                source: i.source.clone(),
            })
            .collect(),
    )
}

pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No hay gastos.".to_string();
    }
    render(
        expenses
            .iter()
            .map(|e| ExpenseRow {
                id: e.id.short(),
                date: settings.format_date(e.date),
                description: truncate(&e.description, DESCRIPTION_WIDTH),
                amount: settings.format_money(e.amount),
                method: e.payment.to_string(),
                saving: if e.is_saving { "sí" } else { "" }.to_string(),
            })
            .collect(),
    )
}

pub fn format_bank_list(banks: &[Bank]) -> String {
    if banks.is_empty() {
        return "No hay bancos.".to_string();
    }
    render(
        banks
            .iter()
            .map(|b| BankRow {
                id: b.id.short(),
                name: b.name.clone(),
                accounts: b.accounts.len(),
                status: if b.is_deletable { "" } else { "protegido" }.to_string(),
            })
            .collect(),
    )
}

/// A bank's name followed by its accounts
pub fn format_bank_details(bank: &Bank) -> String {
    let mut output = format!("{} ({})\n", bank.name, bank.id.short());
    if bank.accounts.is_empty() {
        output.push_str("Sin cuentas.\n");
        return output;
    }
    output.push_str(&render(
        bank.accounts
            .iter()
            .map(|a| AccountRow {
                id: a.id.short(),
                name: a.name.clone(),
                currency: a.currency.to_string(),
                cbu: a.cbu.clone().unwrap_or_default(),
                alias: a.alias.clone().unwrap_or_default(),
            })
            .collect(),
    ));
    output.push('\n');
    output
}

/// Cards whose bank no longer exists are marked
pub fn format_card_list(cards: &[CardSummary]) -> String {
    if cards.is_empty() {
        return "No hay tarjetas.".to_string();
    }
    render(
        cards
            .iter()
            .map(|s| CardRow {
                id: s.card.id.short(),
                name: s.card.name.clone(),
                bank: if s.bank_exists {
                    s.card.bank.clone()
                } else {
                    format!("{} (no encontrado)", s.card.bank)
                },
            })
            .collect(),
    )
}

pub fn format_wallet_list(wallets: &[Wallet]) -> String {
    if wallets.is_empty() {
        return "No hay billeteras.".to_string();
    }
    render(
        wallets
            .iter()
            .map(|w| WalletRow {
                id: w.id.short(),
                name: w.name.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Money, PaymentMethod};
    use chrono::NaiveDate;

    #[test]
    fn test_expense_table_shows_installments() {
        let expense = Expense::new(
            "Heladera (Cuota 1/3)",
            Money::from_units(100),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            PaymentMethod::Credit {
                card: "Visa".into(),
                installments: 3,
            },
        );
        let table = format_expense_list(&[expense], &Settings::default());

        assert!(table.contains("Heladera (Cuota 1/3)"));
        assert!(table.contains("3 cuotas"));
        assert!(table.contains("$100.00"));
    }

    #[test]
    fn test_card_table_flags_missing_bank() {
        let cards = vec![CardSummary {
            card: Card::new("Visa", "Santander"),
            bank_exists: false,
        }];
        assert!(format_card_list(&cards).contains("Santander (no encontrado)"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(format_wallet_list(&[]), "No hay billeteras.");
        assert_eq!(format_bank_list(&[]), "No hay bancos.");
    }

    #[test]
    fn test_savings_bank_marked_protected() {
        assert!(format_bank_list(&[Bank::savings()]).contains("protegido"));
    }
}
