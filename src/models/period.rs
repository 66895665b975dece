//! Reporting period representation
//!
//! Supports calendar months, calendar years and inclusive date ranges. All
//! bounds are plain calendar dates, so every comparison happens in a single
//! calendar with no time-zone shifts.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Short month labels used by the annual chart
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Years accepted when building or parsing a period
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// A reporting period
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Period {
    /// Calendar month, `month` is 1-12
    Month { year: i32, month: u32 },

    /// Calendar year
    Year { year: i32 },

    /// Inclusive date range
    Range { start: NaiveDate, end: NaiveDate },
}

impl Period {
    /// Create a monthly period from a 1-based month
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodParseError> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::InvalidMonth(month));
        }
        Ok(Self::Month { year, month })
    }

    /// Create a monthly period from a zero-based month (0 = January)
    pub fn month_zero_based(year: i32, month0: u32) -> Result<Self, PeriodParseError> {
        Self::month(year, month0 + 1)
    }

    pub fn year(year: i32) -> Self {
        Self::Year { year }
    }

    /// Inclusive date range; `start` must not be after `end`
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodParseError> {
        if start > end {
            return Err(PeriodParseError::InvalidRange(start, end));
        }
        Ok(Self::Range { start, end })
    }

    /// The month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        Self::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Current calendar month (local clock)
    pub fn current_month() -> Self {
        Self::month_of(chrono::Local::now().date_naive())
    }

    /// First day of the period
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Self::Month { year, month } => first_of_month(*year, *month),
            Self::Year { year } => first_of_month(*year, 1),
            Self::Range { start, .. } => *start,
        }
    }

    /// Last day of the period (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        match self {
            Self::Month { year, month } => {
                let next = if *month == 12 {
                    first_of_month(year.saturating_add(1), 1)
                } else {
                    first_of_month(*year, *month + 1)
                };
                day_before(next)
            }
            Self::Year { year } => day_before(first_of_month(year.saturating_add(1), 1)),
            Self::Range { end, .. } => *end,
        }
    }

    /// Check if a date falls within this period (bounds inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }

    /// The following period of the same kind
    pub fn next(&self) -> Self {
        match self {
            Self::Month { year, month } if *month == 12 => Self::Month {
                year: *year + 1,
                month: 1,
            },
            Self::Month { year, month } => Self::Month {
                year: *year,
                month: *month + 1,
            },
            Self::Year { year } => Self::Year { year: *year + 1 },
            Self::Range { start, end } => {
                let length = *end - *start;
                Self::Range {
                    start: *end + Duration::days(1),
                    end: *end + length + Duration::days(1),
                }
            }
        }
    }

    /// The preceding period of the same kind
    pub fn prev(&self) -> Self {
        match self {
            Self::Month { year, month } if *month == 1 => Self::Month {
                year: *year - 1,
                month: 12,
            },
            Self::Month { year, month } => Self::Month {
                year: *year,
                month: *month - 1,
            },
            Self::Year { year } => Self::Year { year: *year - 1 },
            Self::Range { start, end } => {
                let length = *end - *start;
                Self::Range {
                    start: *start - length - Duration::days(1),
                    end: *start - Duration::days(1),
                }
            }
        }
    }

    /// Parse a period string
    ///
    /// Formats:
    /// - Month: "2024-03"
    /// - Year: "2024"
    /// - Range: "2024-01-01..2024-03-31"
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        if let Some((start, end)) = s.split_once("..") {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            return Self::range(start, end);
        }

        if let Some((year, month)) = s.split_once('-') {
            let year: i32 = year
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let month: u32 = month
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            return Self::month(year, month);
        }

        let year: i32 = s
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        check_year(year)?;
        Ok(Self::year(year))
    }

    /// Human-friendly label, e.g. "Marzo 2024"
    pub fn friendly(&self) -> String {
        match self {
            Self::Month { year, month } => {
                format!("{} {}", MONTH_NAMES[(*month - 1) as usize], year)
            }
            Self::Year { year } => year.to_string(),
            Self::Range { start, end } => format!("{} al {}", start, end),
        }
    }
}

fn check_year(year: i32) -> Result<(), PeriodParseError> {
    if YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(PeriodParseError::InvalidYear(year))
    }
}

/// Hand-built periods can carry any year; outside chrono's calendar the
/// bounds saturate to its first or last day and the period matches nothing.
fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(if year > 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

fn day_before(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(NaiveDate::MIN)
}

fn parse_date(s: &str) -> Result<NaiveDate, PeriodParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Year { year } => write!(f, "{:04}", year),
            Self::Range { start, end } => write!(f, "{}..{}", start, end),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    InvalidYear(i32),
    InvalidRange(NaiveDate, NaiveDate),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            Self::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
            Self::InvalidYear(y) => write!(f, "Invalid year: {}", y),
            Self::InvalidRange(start, end) => {
                write!(f, "Start date {} is after end date {}", start, end)
            }
        }
    }
}

impl std::error::Error for PeriodParseError {}
