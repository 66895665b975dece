//! CSV import command

use std::path::Path;

use crate::error::FinanceResult;
use crate::services::{ImportService, ImportStatus};
use crate::storage::Storage;

/// Import a CSV file in the export format. With `dry_run` only the
/// classification of each row is printed.
pub fn handle_import_command(storage: &Storage, file: &Path, dry_run: bool) -> FinanceResult<()> {
    let service = ImportService::new(storage);
    let preview = service.preview_file(file)?;

    if dry_run {
        let mut new = 0;
        let mut duplicates = 0;
        for entry in &preview {
            match &entry.status {
                ImportStatus::New => new += 1,
                ImportStatus::Duplicate => duplicates += 1,
                ImportStatus::Error(msg) => println!("  línea {}: {}", entry.line, msg),
            }
        }
        println!(
            "Vista previa: {} nuevos, {} duplicados, {} con errores",
            new,
            duplicates,
            preview.len() - new - duplicates
        );
        return Ok(());
    }

    let result = service.import(&preview)?;

    println!(
        "Importados: {} ingresos, {} gastos",
        result.incomes_imported, result.expenses_imported
    );
    if result.duplicates_skipped > 0 {
        println!("Duplicados omitidos: {}", result.duplicates_skipped);
    }
    if !result.errors.is_empty() {
        println!("Filas con errores:");
        for (line, msg) in &result.errors {
            println!("  línea {}: {}", line, msg);
        }
    }

    Ok(())
}
