//! Bank and account CLI commands

use clap::Subcommand;

use crate::display::{format_bank_details, format_bank_list};
use crate::error::{FinanceError, FinanceResult};
use crate::models::Currency;
use crate::services::{AccountChanges, BankService};
use crate::storage::Storage;

/// Bank subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// Add a bank
    Add {
        /// Bank name
        name: String,
    },
    /// List banks
    List,
    /// Show a bank with its accounts
    Show {
        /// Bank name or ID
        bank: String,
    },
    /// Rename a bank
    Rename {
        /// Bank name or ID
        bank: String,
        /// New name
        name: String,
    },
    /// Delete a bank and all of its accounts
    Delete {
        /// Bank name or ID
        bank: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an account to a bank
    Add {
        /// Bank name or ID
        bank: String,
        /// Account name
        name: String,
        /// Currency (ARS or USD)
        #[arg(long, default_value = "ARS")]
        currency: String,
        #[arg(long)]
        cbu: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
    /// List the accounts of a bank
    List {
        /// Bank name or ID
        bank: String,
    },
    /// Edit an account (an empty value clears CBU or alias)
    Edit {
        /// Bank name or ID
        bank: String,
        /// Account name or ID
        account: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        cbu: Option<String>,
        #[arg(long)]
        alias: Option<String>,
    },
    /// Remove an account from a bank
    Remove {
        /// Bank name or ID
        bank: String,
        /// Account name or ID
        account: String,
    },
}

fn parse_currency(s: &str) -> FinanceResult<Currency> {
    Currency::parse(s).ok_or_else(|| {
        FinanceError::invalid("currency", format!("unknown currency '{}', use ARS or USD", s))
    })
}

/// Handle a bank command
pub fn handle_bank_command(storage: &Storage, cmd: BankCommands) -> FinanceResult<()> {
    let service = BankService::new(storage);

    match cmd {
        BankCommands::Add { name } => {
            let bank = service.create(&name)?;
            println!("Banco creado: {} ({})", bank.name, bank.id.short());
        }

        BankCommands::List => {
            println!("{}", format_bank_list(&service.list()?));
        }

        BankCommands::Show { bank } => {
            let bank = service.require(&bank)?;
            print!("{}", format_bank_details(&bank));
        }

        BankCommands::Rename { bank, name } => {
            let bank = service.require(&bank)?;
            let old_name = bank.name.clone();
            let renamed = service.rename(bank.id, &name)?;
            println!("Banco renombrado: '{}' -> '{}'", old_name, renamed.name);
        }

        BankCommands::Delete { bank, force } => {
            let bank = service.require(&bank)?;

            if !force && bank.is_deletable {
                println!(
                    "Se eliminará el banco '{}' y sus {} cuentas",
                    bank.name,
                    bank.accounts.len()
                );
                println!("Use --force para confirmar");
                return Ok(());
            }

            let deleted = service.delete(bank.id)?;
            println!("Banco eliminado: {}", deleted.name);
        }
    }

    Ok(())
}

/// Handle an account command
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> FinanceResult<()> {
    let service = BankService::new(storage);

    match cmd {
        AccountCommands::Add {
            bank,
            name,
            currency,
            cbu,
            alias,
        } => {
            let bank = service.require(&bank)?;
            let account =
                service.add_account(bank.id, &name, parse_currency(&currency)?, cbu, alias)?;
            println!(
                "Cuenta creada: {} / {} ({})",
                bank.name,
                account.name,
                account.id.short()
            );
        }

        AccountCommands::List { bank } => {
            let bank = service.require(&bank)?;
            print!("{}", format_bank_details(&bank));
        }

        AccountCommands::Edit {
            bank,
            account,
            name,
            currency,
            cbu,
            alias,
        } => {
            let bank = service.require(&bank)?;
            let account_id = service
                .find_account(&bank, &account)
                .map(|a| a.id)
                .ok_or_else(|| FinanceError::not_found("Account", &account))?;

            let changes = AccountChanges {
                name,
                currency: currency.as_deref().map(parse_currency).transpose()?,
                cbu,
                alias,
            };
            let updated = service.update_account(bank.id, account_id, changes)?;
            println!("Cuenta actualizada: {} / {}", bank.name, updated.name);
        }

        AccountCommands::Remove { bank, account } => {
            let bank = service.require(&bank)?;
            let account_id = service
                .find_account(&bank, &account)
                .map(|a| a.id)
                .ok_or_else(|| FinanceError::not_found("Account", &account))?;

            let removed = service.remove_account(bank.id, account_id)?;
            println!("Cuenta eliminada: {} / {}", bank.name, removed.name);
        }
    }

    Ok(())
}
