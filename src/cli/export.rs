//! Export CLI commands

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{FinanceError, FinanceResult};
use crate::export::{export_csv, export_full_json, export_full_yaml, ExportOutcome};
use crate::models::Period;
use crate::services::PeriodService;
use crate::storage::Storage;

use super::parse_date;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export incomes and expenses between two dates to CSV
    Csv {
        /// Start date (default: first day of the current month)
        #[arg(long)]
        from: Option<String>,
        /// End date (default: today)
        #[arg(long)]
        to: Option<String>,
        /// Directory for the file (default: current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Export every record as JSON
    Json {
        /// Output file (default: stdout)
        output: Option<PathBuf>,
        /// Pretty-print
        #[arg(long)]
        pretty: bool,
    },
    /// Export every record as YAML
    Yaml {
        /// Output file (default: stdout)
        output: Option<PathBuf>,
    },
}

fn open_output(path: Option<&Path>) -> FinanceResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| FinanceError::Export(format!("{}: {}", path.display(), e)))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn finish(mut writer: Box<dyn Write>, path: Option<&Path>) -> FinanceResult<()> {
    writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;
    if let Some(path) = path {
        eprintln!("Exportado a {}", path.display());
    }
    Ok(())
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> FinanceResult<()> {
    match cmd {
        ExportCommands::Csv { from, to, output } => {
            let periods = PeriodService::new();
            let today = periods.today();
            let start = match from {
                Some(s) => parse_date(&s)?,
                None => Period::month_of(today).start_date(),
            };
            let end = match to {
                Some(s) => parse_date(&s)?,
                None => today,
            };

            match export_csv(storage, &output, start, end, today)? {
                ExportOutcome::NoData => {
                    println!("No hay datos para exportar entre {} y {}", start, end);
                }
                ExportOutcome::Exported { path, rows } => {
                    println!("Exportados {} movimientos a {}", rows, path.display());
                }
            }
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_json(storage, &mut writer, pretty)?;
            if output.is_none() {
                writeln!(writer).map_err(|e| FinanceError::Export(e.to_string()))?;
            }
            finish(writer, output.as_deref())?;
        }

        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_yaml(storage, &mut writer)?;
            finish(writer, output.as_deref())?;
        }
    }

    Ok(())
}
