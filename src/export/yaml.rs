//! YAML snapshot export
//!
//! Same content as the JSON snapshot, for human reading.

use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full snapshot as YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> FinanceResult<()> {
    let export = FullExport::from_storage(storage)?;
    let io_err = |e: std::io::Error| FinanceError::Export(e.to_string());

    writeln!(writer, "# FinanceFlow data export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}
