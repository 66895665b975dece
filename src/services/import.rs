//! CSV import service
//!
//! Reads files in the export layout (`fecha,tipo,descripcion,monto,
//! metodo_pago,origen_destino`) back into incomes and expenses. Rows are
//! parsed and previewed first; bad rows are reported by line and skipped,
//! rows identical to stored records are skipped as duplicates, and the rest
//! are saved in one batch per kind. Imported expenses are never expanded
//! into installments.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{FinanceError, FinanceResult};
use crate::export::csv::{CSV_HEADER, KIND_EXPENSE, KIND_INCOME};
use crate::models::{Expense, Income, Money, PaymentMethod};
use crate::storage::Storage;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// A record parsed from one CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Income(Income),
    Expense(Expense),
}

impl ParsedRecord {
    /// Consume a stored record with the same content, if one is left.
    /// Each stored record absorbs at most one row, so repeated identical
    /// movements are only duplicates up to the number already stored.
    fn take_match(&self, incomes: &mut Vec<Income>, expenses: &mut Vec<Expense>) -> bool {
        let position = match self {
            Self::Income(new) => incomes.iter().position(|i| {
                i.date == new.date
                    && i.amount == new.amount
                    && i.description == new.description
                    && i.source == new.source
            }),
            Self::Expense(new) => expenses.iter().position(|e| {
                e.date == new.date
                    && e.amount == new.amount
                    && e.description == new.description
                    && e.payment.label() == new.payment.label()
            }),
        };

        match (self, position) {
            (Self::Income(_), Some(idx)) => {
                incomes.swap_remove(idx);
                true
            }
            (Self::Expense(_), Some(idx)) => {
                expenses.swap_remove(idx);
                true
            }
            (_, None) => false,
        }
    }
}

/// Status of a row in the import preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    New,
    /// Matches a stored record not already matched by an earlier row
    Duplicate,
    Error(String),
}

/// One row of the import preview
#[derive(Debug, Clone)]
pub struct ImportPreviewEntry {
    /// Line in the file, counting the header as line 1
    pub line: usize,
    pub record: Option<ParsedRecord>,
    pub status: ImportStatus,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub incomes_imported: usize,
    pub expenses_imported: usize,
    pub duplicates_skipped: usize,
    /// Error message per file line
    pub errors: BTreeMap<usize, String>,
}

impl ImportResult {
    pub fn imported(&self) -> usize {
        self.incomes_imported + self.expenses_imported
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a CSV file and classify every row without saving anything
    pub fn preview_file(&self, path: &Path) -> FinanceResult<Vec<ImportPreviewEntry>> {
        let file = std::fs::File::open(path)
            .map_err(|e| FinanceError::Import(format!("{}: {}", path.display(), e)))?;
        self.preview(file)
    }

    /// Parse CSV data and classify every row without saving anything
    pub fn preview<R: Read>(&self, input: R) -> FinanceResult<Vec<ImportPreviewEntry>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| FinanceError::Import(format!("could not read header: {}", e)))?
            .clone();
        check_headers(&headers)?;

        let mut incomes = self.storage.store().list_incomes()?;
        let mut expenses = self.storage.store().list_expenses()?;
        let mut entries = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let line = idx + 2;
            let parsed = result
                .map_err(|e| format!("could not read row: {}", e))
                .and_then(|record| parse_record(&record));

            let entry = match parsed {
                Ok(record) => {
                    let status = if record.take_match(&mut incomes, &mut expenses) {
                        ImportStatus::Duplicate
                    } else {
                        ImportStatus::New
                    };
                    ImportPreviewEntry {
                        line,
                        record: Some(record),
                        status,
                    }
                }
                Err(message) => ImportPreviewEntry {
                    line,
                    record: None,
                    status: ImportStatus::Error(message),
                },
            };
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Save the new rows of a preview: one write for incomes and one for
    /// expenses
    pub fn import(&self, preview: &[ImportPreviewEntry]) -> FinanceResult<ImportResult> {
        let mut result = ImportResult::default();
        let mut incomes = Vec::new();
        let mut expenses = Vec::new();

        for entry in preview {
            match (&entry.status, &entry.record) {
                (ImportStatus::New, Some(ParsedRecord::Income(i))) => incomes.push(i.clone()),
                (ImportStatus::New, Some(ParsedRecord::Expense(e))) => expenses.push(e.clone()),
                (ImportStatus::Duplicate, _) => result.duplicates_skipped += 1,
                (ImportStatus::Error(message), _) => {
                    result.errors.insert(entry.line, message.clone());
                }
                (ImportStatus::New, None) => {}
            }
        }

        let mut audit_entries = Vec::with_capacity(incomes.len() + expenses.len());

        if !incomes.is_empty() {
            self.storage.store().save_incomes(&incomes)?;
            audit_entries.extend(incomes.iter().map(|i| {
                AuditEntry::create(
                    EntityType::Income,
                    i.id.to_string(),
                    Some(i.description.clone()),
                    i,
                )
            }));
        }
        if !expenses.is_empty() {
            self.storage.store().save_expenses(&expenses)?;
            audit_entries.extend(expenses.iter().map(|e| {
                AuditEntry::create(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            }));
        }
        self.storage.log_batch(&audit_entries);

        result.incomes_imported = incomes.len();
        result.expenses_imported = expenses.len();
        tracing::info!(
            incomes = result.incomes_imported,
            expenses = result.expenses_imported,
            duplicates = result.duplicates_skipped,
            errors = result.errors.len(),
            "csv import finished"
        );

        Ok(result)
    }

    /// Preview and import a file in one step
    pub fn import_file(&self, path: &Path) -> FinanceResult<ImportResult> {
        let preview = self.preview_file(path)?;
        self.import(&preview)
    }
}

fn check_headers(headers: &StringRecord) -> FinanceResult<()> {
    let expected: Vec<&str> = CSV_HEADER.split(',').collect();
    let found: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    if found.len() < expected.len() || found.iter().zip(&expected).any(|(f, e)| f != e) {
        return Err(FinanceError::Import(format!(
            "unexpected header '{}', expected '{}'",
            found.join(","),
            CSV_HEADER
        )));
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("could not parse date: '{}'", s))
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str, String> {
    record
        .get(index)
        .ok_or_else(|| format!("missing column '{}'", name))
}

/// Turn one data row into a validated record
fn parse_record(record: &StringRecord) -> Result<ParsedRecord, String> {
    let date = parse_date(field(record, 0, "fecha")?)?;
    let kind = field(record, 1, "tipo")?;
    let description = field(record, 2, "descripcion")?;
    let amount_str = field(record, 3, "monto")?;
    let amount = Money::parse(amount_str)
        .map_err(|e| format!("invalid amount '{}': {}", amount_str, e))?;
    let method = record.get(4).unwrap_or("");
    let counterparty = record.get(5).unwrap_or("");

    let parsed = if kind.eq_ignore_ascii_case(KIND_INCOME) {
        ParsedRecord::Income(Income::new(description, amount, date, counterparty))
    } else if kind.eq_ignore_ascii_case(KIND_EXPENSE) {
        let counterparty = Some(counterparty.to_string());
        let payment = PaymentMethod::from_parts(method, counterparty.clone(), counterparty, Some(1))?;
        ParsedRecord::Expense(Expense::new(description, amount.abs(), date, payment))
    } else {
        return Err(format!("unknown row type '{}'", kind));
    };

    let validation = match &parsed {
        ParsedRecord::Income(i) => i.validate(),
        ParsedRecord::Expense(e) => e.validate(),
    };
    validation.map_err(|e| match e {
        FinanceError::Validation(errors) => errors.to_string(),
        other => other.to_string(),
    })?;

    Ok(parsed)
}
