//! Export module for FinanceFlow
//!
//! - CSV: incomes and expenses in a date range (spreadsheet-compatible)
//! - JSON: machine-readable snapshot of all data
//! - YAML: human-readable snapshot of all data

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{build_rows, export_csv, export_filename, write_rows, ExportOutcome, ExportRow};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
