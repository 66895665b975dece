//! Period filtering and period parsing
//!
//! The filter functions are pure: they take records and a period and return
//! the records dated inside it. Bounds are inclusive and compared as plain
//! calendar dates.

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Expense, Income, Period};

/// Records that carry a calendar date
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Income {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Records whose date falls inside `period`
pub fn filter_period<T: Dated + Clone>(records: &[T], period: &Period) -> Vec<T> {
    records
        .iter()
        .filter(|r| period.contains(r.date()))
        .cloned()
        .collect()
}

/// Records in a calendar month; `month0` is zero-based (0 = January).
/// An out-of-range month matches nothing.
pub fn filter_month<T: Dated + Clone>(records: &[T], year: i32, month0: u32) -> Vec<T> {
    records
        .iter()
        .filter(|r| {
            let date = r.date();
            date.year() == year && date.month0() == month0
        })
        .cloned()
        .collect()
}

/// Records in a calendar year
pub fn filter_year<T: Dated + Clone>(records: &[T], year: i32) -> Vec<T> {
    records
        .iter()
        .filter(|r| r.date().year() == year)
        .cloned()
        .collect()
}

/// Records with `start <= date <= end`
pub fn filter_range<T: Dated + Clone>(records: &[T], start: NaiveDate, end: NaiveDate) -> Vec<T> {
    records
        .iter()
        .filter(|r| {
            let date = r.date();
            date >= start && date <= end
        })
        .cloned()
        .collect()
}

const MONTH_NAMES: [(&str, u32); 24] = [
    ("enero", 1),
    ("january", 1),
    ("febrero", 2),
    ("february", 2),
    ("marzo", 3),
    ("march", 3),
    ("abril", 4),
    ("april", 4),
    ("mayo", 5),
    ("may", 5),
    ("junio", 6),
    ("june", 6),
    ("julio", 7),
    ("july", 7),
    ("agosto", 8),
    ("august", 8),
    ("septiembre", 9),
    ("september", 9),
    ("octubre", 10),
    ("october", 10),
    ("noviembre", 11),
    ("november", 11),
    ("diciembre", 12),
    ("december", 12),
];

/// Parses user-supplied period strings relative to today
pub struct PeriodService {
    today: NaiveDate,
}

impl PeriodService {
    pub fn new() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    /// Service with a fixed "today" (for tests and reproducible reports)
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn current_month(&self) -> Period {
        Period::month_of(self.today)
    }

    /// Parse a period string or fall back to the current month
    pub fn parse_or_current(&self, period_str: Option<&str>) -> FinanceResult<Period> {
        match period_str {
            Some(s) => self.parse(s),
            None => Ok(self.current_month()),
        }
    }

    /// Parse a period string
    ///
    /// Formats supported:
    /// - "current", "last", "next" (months relative to today)
    /// - Month names in Spanish or English, optionally with a year: "marzo", "March 2024"
    /// - "2024-03", "2024", "2024-01-01..2024-03-31"
    pub fn parse(&self, s: &str) -> FinanceResult<Period> {
        let lower = s.trim().to_lowercase();

        match lower.as_str() {
            "current" | "now" | "actual" => return Ok(self.current_month()),
            "last" | "prev" | "previous" | "anterior" => return Ok(self.current_month().prev()),
            "next" | "siguiente" => return Ok(self.current_month().next()),
            _ => {}
        }

        if let Some(period) = self.parse_month_name(&lower) {
            return Ok(period);
        }

        Period::parse(&lower)
            .map_err(|e| FinanceError::invalid("period", e.to_string()))
    }

    /// "marzo", "marzo 2024", "Mar 2024"
    fn parse_month_name(&self, s: &str) -> Option<Period> {
        let mut parts = s.split_whitespace();
        let name = parts.next()?;
        let year = match parts.next() {
            Some(y) => y.parse().ok()?,
            None => self.today.year(),
        };
        if parts.next().is_some() || name.len() < 3 {
            return None;
        }

        MONTH_NAMES
            .iter()
            .find(|(full, _)| full.starts_with(name))
            .and_then(|(_, month)| Period::month(year, *month).ok())
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense_on(d: NaiveDate) -> Expense {
        Expense::new("Gasto", Money::from_units(1), d, PaymentMethod::Cash)
    }

    #[test]
    fn test_filter_month_boundaries_inclusive() {
        let records = vec![
            expense_on(date(2024, 2, 29)),
            expense_on(date(2024, 3, 1)),
            expense_on(date(2024, 3, 31)),
            expense_on(date(2024, 4, 1)),
            expense_on(date(2023, 3, 15)),
        ];

        let march = filter_month(&records, 2024, 2);
        let dates: Vec<_> = march.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 31)]);
    }

    #[test]
    fn test_filter_month_matches_filter_period() {
        let records: Vec<Expense> = (1..=12)
            .map(|m| expense_on(date(2024, m, 28)))
            .collect();
        for month0 in 0..12 {
            let period = Period::month_zero_based(2024, month0).unwrap();
            assert_eq!(
                filter_month(&records, 2024, month0),
                filter_period(&records, &period)
            );
        }
    }

    #[test]
    fn test_filter_year_and_range() {
        let records = vec![
            expense_on(date(2023, 12, 31)),
            expense_on(date(2024, 1, 1)),
            expense_on(date(2024, 12, 31)),
        ];
        assert_eq!(filter_year(&records, 2024).len(), 2);
        assert_eq!(
            filter_range(&records, date(2023, 12, 31), date(2024, 1, 1)).len(),
            2
        );
        assert!(filter_range(&records, date(2025, 1, 1), date(2025, 2, 1)).is_empty());
    }

    #[test]
    fn test_parse_relative_and_names() {
        let service = PeriodService::with_today(date(2024, 3, 18));

        assert_eq!(service.parse("current").unwrap(), Period::month(2024, 3).unwrap());
        assert_eq!(service.parse("last").unwrap(), Period::month(2024, 2).unwrap());
        assert_eq!(service.parse("marzo").unwrap(), Period::month(2024, 3).unwrap());
        assert_eq!(
            service.parse("Dic 2023").unwrap(),
            Period::month(2023, 12).unwrap()
        );
        assert_eq!(
            service.parse("january 2025").unwrap(),
            Period::month(2025, 1).unwrap()
        );
        assert_eq!(service.parse("2024").unwrap(), Period::year(2024));
        assert!(service.parse("someday").is_err());
        assert!(service.parse("999999").unwrap_err().is_validation());
        assert!(service.parse("marzo 999999").is_err());
    }

    #[test]
    fn test_parse_or_current_defaults_to_month() {
        let service = PeriodService::with_today(date(2024, 1, 31));
        assert_eq!(
            service.parse_or_current(None).unwrap(),
            Period::month(2024, 1).unwrap()
        );
    }
}
