//! CSV export of incomes and expenses
//!
//! One row per movement between two dates (inclusive), incomes positive and
//! expenses negative, sorted by date. The header line is written bare and
//! every data field is quoted.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Expense, Income, Money};
use crate::services::period::filter_range;
use crate::storage::Storage;

pub const CSV_HEADER: &str = "fecha,tipo,descripcion,monto,metodo_pago,origen_destino";
pub const KIND_INCOME: &str = "Ingreso";
pub const KIND_EXPENSE: &str = "Gasto";

/// One exported movement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub date: NaiveDate,
    pub kind: &'static str,
    pub description: String,
    /// Positive for incomes, negative for expenses
    pub amount: Money,
    pub payment_method: String,
    /// Income source, or the expense's bank or card
    pub counterparty: String,
}

impl ExportRow {
    pub fn from_income(income: &Income) -> Self {
        Self {
            date: income.date,
            kind: KIND_INCOME,
            description: income.description.clone(),
            amount: income.amount,
            payment_method: String::new(),
            counterparty: income.source.clone(),
        }
    }

    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            date: expense.date,
            kind: KIND_EXPENSE,
            description: expense.description.clone(),
            amount: -expense.amount,
            payment_method: expense.payment.label().to_string(),
            counterparty: expense
                .payment
                .counterparty()
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn to_record(&self) -> [String; 6] {
        [
            self.date.format("%Y-%m-%d").to_string(),
            self.kind.to_string(),
            self.description.clone(),
            self.amount.to_decimal_string(),
            self.payment_method.clone(),
            self.counterparty.clone(),
        ]
    }
}

/// Rows for every record dated within `start..=end`, ascending by date.
/// The sort is stable and incomes go in first, so on equal dates incomes
/// come before expenses and records keep their stored order.
pub fn build_rows(
    incomes: &[Income],
    expenses: &[Expense],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ExportRow> {
    let mut rows: Vec<ExportRow> = filter_range(incomes, start, end)
        .iter()
        .map(ExportRow::from_income)
        .chain(filter_range(expenses, start, end).iter().map(ExportRow::from_expense))
        .collect();
    rows.sort_by_key(|r| r.date);
    rows
}

/// Write the header and rows
pub fn write_rows<W: Write>(rows: &[ExportRow], writer: &mut W) -> FinanceResult<()> {
    writeln!(writer, "{}", CSV_HEADER).map_err(|e| FinanceError::Export(e.to_string()))?;

    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for row in rows {
        csv_writer.write_record(row.to_record())?;
    }
    csv_writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))?;

    Ok(())
}

/// File name for an export made on `today`
pub fn export_filename(today: NaiveDate) -> String {
    format!("financeflow_export_{}.csv", today.format("%Y%m%d"))
}

/// What an export produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing in the range; no file was written
    NoData,
    Exported { path: PathBuf, rows: usize },
}

/// Export the records between `start` and `end` into `dir`
pub fn export_csv(
    storage: &Storage,
    dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> FinanceResult<ExportOutcome> {
    if start > end {
        return Err(FinanceError::invalid(
            "end",
            "end date must not be before start date",
        ));
    }

    let store = storage.store();
    let rows = build_rows(&store.list_incomes()?, &store.list_expenses()?, start, end);
    if rows.is_empty() {
        tracing::info!(%start, %end, "nothing to export");
        return Ok(ExportOutcome::NoData);
    }

    let path = dir.join(export_filename(today));
    let mut file = File::create(&path)
        .map_err(|e| FinanceError::Export(format!("{}: {}", path.display(), e)))?;
    write_rows(&rows, &mut file)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "csv export written");
    Ok(ExportOutcome::Exported {
        path,
        rows: rows.len(),
    })
}
