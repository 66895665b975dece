//! Expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_list;
use crate::error::{FinanceError, FinanceResult};
use crate::models::expense::LABEL_CASH;
use crate::models::PaymentMethod;
use crate::services::{CardService, ExpenseChanges, ExpenseService, NewExpense, PeriodService};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_date_or_today};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Description (at least 3 characters)
        description: String,
        /// Amount, e.g. 150 or 150.75
        amount: String,
        /// Payment method: Débito, Crédito, Efectivo, Transferencia or any label
        #[arg(short, long, default_value = LABEL_CASH)]
        method: String,
        /// Bank (debit and transfer payments)
        #[arg(short, long)]
        bank: Option<String>,
        /// Card (credit payments)
        #[arg(short, long)]
        card: Option<String>,
        /// Number of monthly installments (credit payments)
        #[arg(short, long)]
        installments: Option<u32>,
        /// Mark as a contribution to savings
        #[arg(long)]
        saving: bool,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List expenses of a period
    List {
        /// Period: "2024-03", "marzo", "last", "2024" (default: current month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Edit a single stored expense (installments are not re-expanded)
    Edit {
        /// Expense ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        date: Option<String>,
        /// New payment method; uses --bank, --card and --installments
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        bank: Option<String>,
        #[arg(long)]
        card: Option<String>,
        #[arg(long)]
        installments: Option<u32>,
        /// Set or clear the savings flag
        #[arg(long)]
        saving: Option<bool>,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_payment(
    method: &str,
    bank: Option<String>,
    card: Option<String>,
    installments: Option<u32>,
) -> FinanceResult<PaymentMethod> {
    PaymentMethod::from_parts(method, bank, card, installments)
        .map_err(|message| FinanceError::invalid("payment", message))
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> FinanceResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            method,
            bank,
            card,
            installments,
            saving,
            date,
        } => {
            let payment = parse_payment(&method, bank, card, installments)?;
            if let Some(card) = payment.card() {
                if CardService::new(storage).find(card)?.is_none() {
                    eprintln!("Aviso: la tarjeta '{}' no está registrada", card);
                }
            }

            let records = service.create(NewExpense {
                description,
                amount: parse_amount(&amount)?,
                date: parse_date_or_today(date.as_deref())?,
                payment,
                is_saving: saving,
            })?;

            if records.len() > 1 {
                println!("Gasto registrado en {} cuotas:", records.len());
                println!("{}", format_expense_list(&records, settings));
            } else {
                for expense in &records {
                    println!(
                        "Gasto registrado: {} {} ({})",
                        expense.description,
                        settings.format_money(expense.amount),
                        expense.id.short()
                    );
                }
            }
        }

        ExpenseCommands::List { period } => {
            let period = PeriodService::new().parse_or_current(period.as_deref())?;
            let expenses = service.list_for_period(&period)?;

            println!("Gastos: {}", period.friendly());
            println!("{}", format_expense_list(&expenses, settings));
        }

        ExpenseCommands::Edit {
            id,
            description,
            amount,
            date,
            method,
            bank,
            card,
            installments,
            saving,
        } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| FinanceError::not_found("Expense", &id))?;

            let payment = match method {
                Some(method) => Some(parse_payment(&method, bank, card, installments)?),
                None => None,
            };
            let changes = ExpenseChanges {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                payment,
                is_saving: saving,
            };
            let updated = service.update(expense.id, changes)?;
            println!("Gasto actualizado: {}", updated.description);
        }

        ExpenseCommands::Delete { id, force } => {
            let expense = service
                .find(&id)?
                .ok_or_else(|| FinanceError::not_found("Expense", &id))?;

            if !force {
                println!("Se eliminará el gasto: {}", expense.description);
                println!("Use --force para confirmar");
                return Ok(());
            }

            let deleted = service.delete(expense.id)?;
            println!("Gasto eliminado: {}", deleted.description);
        }
    }

    Ok(())
}
