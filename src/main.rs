use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use financeflow::advice::AdviceClient;
use financeflow::cli::{
    handle_account_command, handle_advice_command, handle_annual_command, handle_audit_command,
    handle_bank_command, handle_card_command, handle_dashboard_command, handle_expense_command,
    handle_export_command, handle_import_command, handle_income_command, handle_savings_command,
    handle_wallet_command,
};
use financeflow::config::{FinancePaths, Settings, StorageBackend};
use financeflow::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "financeflow",
    version,
    about = "Personal finance tracker for the terminal",
    long_about = "FinanceFlow records incomes and expenses, splits credit card \
                  purchases into monthly installments and shows how each month \
                  compares with your savings goal."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Storage backend for this run (json or sqlite)
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory, settings and default records
    Init,

    /// Show current configuration and paths
    Config,

    /// Income management commands
    #[command(subcommand)]
    Income(financeflow::cli::IncomeCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(financeflow::cli::ExpenseCommands),

    /// Bank management commands
    #[command(subcommand)]
    Bank(financeflow::cli::BankCommands),

    /// Bank account management commands
    #[command(subcommand)]
    Account(financeflow::cli::AccountCommands),

    /// Credit card management commands
    #[command(subcommand)]
    Card(financeflow::cli::CardCommands),

    /// Digital wallet management commands
    #[command(subcommand)]
    Wallet(financeflow::cli::WalletCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Savings(financeflow::cli::SavingsCommands),

    /// Monthly summary
    #[command(alias = "resumen")]
    Dashboard {
        /// Period: "2024-03", "marzo", "last" (default: current month)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Month-by-month totals for a year
    Annual {
        /// Year (default: current year)
        year: Option<i32>,
    },

    /// Export data
    #[command(subcommand)]
    Export(financeflow::cli::ExportCommands),

    /// Import incomes and expenses from a CSV export
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Only show what would be imported
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask the assistant for advice on your records
    Advice,

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let paths = FinancePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    if let Some(name) = cli.backend.as_deref() {
        settings.backend = StorageBackend::parse(name)
            .ok_or_else(|| anyhow!("unknown backend '{}', use json or sqlite", name))?;
    }

    let Some(command) = cli.command else {
        println!("FinanceFlow - personal finance tracker");
        println!();
        println!("Run 'financeflow --help' for usage information.");
        println!("Run 'financeflow init' to get started.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing FinanceFlow at: {}", paths.base_dir().display());
            let storage = Storage::open(paths.clone(), settings.backend)?;
            initialize_storage(&storage)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Storage backend: {}", settings.backend);
            println!("Savings bank and a default savings goal have been created.");
            println!("Run 'financeflow income add' to record your first income.");
        }
        Commands::Config => {
            println!("FinanceFlow Configuration");
            println!("=========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Backend:         {}", settings.backend);
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Advice host:     {}", settings.advice.host);
            println!("  Advice model:    {}", settings.advice.model);
        }
        command => {
            let storage = Storage::open(paths, settings.backend)?;
            if initialize_storage(&storage)? {
                tracing::info!("seeded default records");
            }
            run(&storage, &settings, command)?;
        }
    }

    Ok(())
}

fn run(storage: &Storage, settings: &Settings, command: Commands) -> Result<()> {
    match command {
        Commands::Income(cmd) => handle_income_command(storage, settings, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(storage, settings, cmd)?,
        Commands::Bank(cmd) => handle_bank_command(storage, cmd)?,
        Commands::Account(cmd) => handle_account_command(storage, cmd)?,
        Commands::Card(cmd) => handle_card_command(storage, cmd)?,
        Commands::Wallet(cmd) => handle_wallet_command(storage, cmd)?,
        Commands::Savings(cmd) => handle_savings_command(storage, settings, cmd)?,
        Commands::Dashboard { period } => handle_dashboard_command(storage, period)?,
        Commands::Annual { year } => handle_annual_command(storage, year)?,
        Commands::Export(cmd) => handle_export_command(storage, cmd)?,
        Commands::Import { file, dry_run } => handle_import_command(storage, &file, dry_run)?,
        Commands::Advice => {
            let client = AdviceClient::from_settings(&settings.advice)?;
            handle_advice_command(storage, &client)?;
        }
        Commands::Audit { limit } => handle_audit_command(storage, limit)?,
        Commands::Init | Commands::Config => {}
    }
    Ok(())
}
