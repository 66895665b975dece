//! Dashboard and annual report commands

use chrono::Datelike;

use crate::error::FinanceResult;
use crate::reports::{AnnualSeries, MonthlySummary};
use crate::services::PeriodService;
use crate::storage::Storage;

/// Print the monthly dashboard for a period (default: current month)
pub fn handle_dashboard_command(storage: &Storage, period: Option<String>) -> FinanceResult<()> {
    let period = PeriodService::new().parse_or_current(period.as_deref())?;
    let summary = MonthlySummary::generate(storage, &period)?;
    print!("{}", summary.format_terminal());
    Ok(())
}

/// Print the month-by-month series of a year (default: current year)
pub fn handle_annual_command(storage: &Storage, year: Option<i32>) -> FinanceResult<()> {
    let year = year.unwrap_or_else(|| PeriodService::new().today().year());
    let series = AnnualSeries::generate(storage, year)?;
    print!("{}", series.format_terminal());
    Ok(())
}
