//! Savings goal CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::FinanceResult;
use crate::reports::CumulativeSavings;
use crate::services::SavingsService;
use crate::storage::Storage;

/// Savings subcommands
#[derive(Subcommand)]
pub enum SavingsCommands {
    /// Show the savings goal and accumulated savings
    Show,
    /// Set the savings goal as a percentage of monthly income
    SetGoal {
        /// Percentage (0-100)
        percentage: u8,
    },
}

/// Handle a savings command
pub fn handle_savings_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SavingsCommands,
) -> FinanceResult<()> {
    let service = SavingsService::new(storage);

    match cmd {
        SavingsCommands::Show => {
            let goal = service.goal()?;
            let savings = CumulativeSavings::compute(&storage.store().list_expenses()?);

            println!("Meta de ahorro:   {}% de los ingresos", goal.percentage);
            println!(
                "Aportes:          {}",
                settings.format_money(savings.contributions)
            );
            println!(
                "Retiros:          {}",
                settings.format_money(savings.withdrawals)
            );
            println!("Ahorro acumulado: {}", settings.format_money(savings.total()));
        }

        SavingsCommands::SetGoal { percentage } => {
            let goal = service.set_goal(percentage)?;
            println!("Meta de ahorro actualizada: {}%", goal.percentage);
        }
    }

    Ok(())
}
