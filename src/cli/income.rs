//! Income CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_income_list;
use crate::error::{FinanceError, FinanceResult};
use crate::services::{BankService, IncomeChanges, IncomeService, PeriodService, WalletService};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_date_or_today};

/// Income subcommands
#[derive(Subcommand)]
pub enum IncomeCommands {
    /// Record an income
    Add {
        /// Description (at least 3 characters)
        description: String,
        /// Amount, e.g. 2500 or 2500.50
        amount: String,
        /// Bank or wallet the money went into
        #[arg(short, long)]
        source: String,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List incomes of a period
    List {
        /// Period: "2024-03", "marzo", "last", "2024" (default: current month)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Edit an income
    Edit {
        /// Income ID
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an income
    Delete {
        /// Income ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Warn when a source names neither a bank nor a wallet
pub(crate) fn warn_unknown_source(storage: &Storage, source: &str) -> FinanceResult<()> {
    let known = BankService::new(storage).find(source)?.is_some()
        || WalletService::new(storage).find(source)?.is_some();
    if !known {
        eprintln!("Aviso: '{}' no es un banco ni una billetera registrada", source);
    }
    Ok(())
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> FinanceResult<()> {
    let service = IncomeService::new(storage);

    match cmd {
        IncomeCommands::Add {
            description,
            amount,
            source,
            date,
        } => {
            let amount = parse_amount(&amount)?;
            let date = parse_date_or_today(date.as_deref())?;
            let income = service.create(&description, amount, date, &source)?;
            warn_unknown_source(storage, &income.source)?;

            println!(
                "Ingreso registrado: {} {} ({})",
                income.description,
                settings.format_money(income.amount),
                income.id.short()
            );
        }

        IncomeCommands::List { period } => {
            let period = PeriodService::new().parse_or_current(period.as_deref())?;
            let incomes = service.list_for_period(&period)?;

            println!("Ingresos: {}", period.friendly());
            println!("{}", format_income_list(&incomes, settings));
        }

        IncomeCommands::Edit {
            id,
            description,
            amount,
            source,
            date,
        } => {
            let income = service
                .find(&id)?
                .ok_or_else(|| FinanceError::not_found("Income", &id))?;

            let changes = IncomeChanges {
                description,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                date: date.as_deref().map(parse_date).transpose()?,
                source,
            };
            let updated = service.update(income.id, changes)?;
            println!("Ingreso actualizado: {}", updated.description);
        }

        IncomeCommands::Delete { id, force } => {
            let income = service
                .find(&id)?
                .ok_or_else(|| FinanceError::not_found("Income", &id))?;

            if !force {
                println!("Se eliminará el ingreso: {}", income.description);
                println!("Use --force para confirmar");
                return Ok(());
            }

            let deleted = service.delete(income.id)?;
            println!("Ingreso eliminado: {}", deleted.description);
        }
    }

    Ok(())
}
