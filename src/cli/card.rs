//! Credit card and wallet CLI commands

use clap::Subcommand;

use crate::display::{format_card_list, format_wallet_list};
use crate::error::{FinanceError, FinanceResult};
use crate::services::{BankService, CardService, WalletService};
use crate::storage::Storage;

/// Card subcommands
#[derive(Subcommand)]
pub enum CardCommands {
    /// Add a credit card
    Add {
        /// Card name
        name: String,
        /// Issuing bank name
        #[arg(short, long)]
        bank: String,
    },
    /// List cards
    List,
    /// Edit a card
    Edit {
        /// Card name or ID
        card: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bank: Option<String>,
    },
    /// Delete a card
    Delete {
        /// Card name or ID
        card: String,
    },
}

/// Wallet subcommands
#[derive(Subcommand)]
pub enum WalletCommands {
    /// Add a digital wallet
    Add {
        /// Wallet name
        name: String,
    },
    /// List wallets
    List,
    /// Rename a wallet
    Rename {
        /// Wallet name or ID
        wallet: String,
        /// New name
        name: String,
    },
    /// Delete a wallet
    Delete {
        /// Wallet name or ID
        wallet: String,
    },
}

fn warn_unknown_bank(storage: &Storage, bank: &str) -> FinanceResult<()> {
    if BankService::new(storage).find(bank)?.is_none() {
        eprintln!("Aviso: el banco '{}' no está registrado", bank);
    }
    Ok(())
}

/// Handle a card command
pub fn handle_card_command(storage: &Storage, cmd: CardCommands) -> FinanceResult<()> {
    let service = CardService::new(storage);

    match cmd {
        CardCommands::Add { name, bank } => {
            let card = service.create(&name, &bank)?;
            warn_unknown_bank(storage, &card.bank)?;
            println!("Tarjeta creada: {} ({})", card.name, card.id.short());
        }

        CardCommands::List => {
            println!("{}", format_card_list(&service.list_with_status()?));
        }

        CardCommands::Edit { card, name, bank } => {
            let existing = service
                .find(&card)?
                .ok_or_else(|| FinanceError::not_found("Card", &card))?;
            let updated = service.update(existing.id, name.as_deref(), bank.as_deref())?;
            warn_unknown_bank(storage, &updated.bank)?;
            println!("Tarjeta actualizada: {}", updated.name);
        }

        CardCommands::Delete { card } => {
            let existing = service
                .find(&card)?
                .ok_or_else(|| FinanceError::not_found("Card", &card))?;
            let deleted = service.delete(existing.id)?;
            println!("Tarjeta eliminada: {}", deleted.name);
        }
    }

    Ok(())
}

/// Handle a wallet command
pub fn handle_wallet_command(storage: &Storage, cmd: WalletCommands) -> FinanceResult<()> {
    let service = WalletService::new(storage);

    match cmd {
        WalletCommands::Add { name } => {
            let wallet = service.create(&name)?;
            println!("Billetera creada: {} ({})", wallet.name, wallet.id.short());
        }

        WalletCommands::List => {
            println!("{}", format_wallet_list(&service.list()?));
        }

        WalletCommands::Rename { wallet, name } => {
            let existing = service
                .find(&wallet)?
                .ok_or_else(|| FinanceError::not_found("Wallet", &wallet))?;
            let renamed = service.rename(existing.id, &name)?;
            println!("Billetera renombrada: '{}' -> '{}'", existing.name, renamed.name);
        }

        WalletCommands::Delete { wallet } => {
            let existing = service
                .find(&wallet)?
                .ok_or_else(|| FinanceError::not_found("Wallet", &wallet))?;
            let deleted = service.delete(existing.id)?;
            println!("Billetera eliminada: {}", deleted.name);
        }
    }

    Ok(())
}
