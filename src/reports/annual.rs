//! Annual series
//!
//! One bucket per calendar month of a year with income, regular spending and
//! savings contributions, for the yearly chart.

use chrono::Datelike;

use crate::error::FinanceResult;
use crate::models::period::MONTH_ABBREVIATIONS;
use crate::models::{Expense, Income, Money};
use crate::services::period::filter_year;
use crate::storage::Storage;

use crate::display::report::{format_bar, separator};

/// Totals for one month of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthBucket {
    /// Zero-based month (0 = January)
    pub month0: u32,
    pub income: Money,
    /// Spending excluding savings contributions
    pub expense: Money,
    pub saving: Money,
}

impl MonthBucket {
    pub fn label(&self) -> &'static str {
        MONTH_ABBREVIATIONS[self.month0 as usize % 12]
    }
}

/// Twelve monthly buckets for a year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnualSeries {
    pub year: i32,
    pub months: Vec<MonthBucket>,
}

impl AnnualSeries {
    pub fn compute(incomes: &[Income], expenses: &[Expense], year: i32) -> Self {
        let mut months: Vec<MonthBucket> = (0..12)
            .map(|month0| MonthBucket {
                month0,
                ..Default::default()
            })
            .collect();

        for income in filter_year(incomes, year) {
            months[income.date.month0() as usize].income += income.amount;
        }
        for expense in filter_year(expenses, year) {
            let bucket = &mut months[expense.date.month0() as usize];
            if expense.is_saving {
                bucket.saving += expense.amount;
            } else {
                bucket.expense += expense.amount;
            }
        }

        Self { year, months }
    }

    pub fn generate(storage: &Storage, year: i32) -> FinanceResult<Self> {
        let store = storage.store();
        Ok(Self::compute(
            &store.list_incomes()?,
            &store.list_expenses()?,
            year,
        ))
    }

    pub fn total_income(&self) -> Money {
        self.months.iter().map(|m| m.income).sum()
    }

    pub fn total_expense(&self) -> Money {
        self.months.iter().map(|m| m.expense).sum()
    }

    pub fn total_saving(&self) -> Money {
        self.months.iter().map(|m| m.saving).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months
            .iter()
            .all(|m| m.income.is_zero() && m.expense.is_zero() && m.saving.is_zero())
    }

    /// Format the series as a text chart: one line per month and measure
    pub fn format_terminal(&self) -> String {
        const BAR_WIDTH: usize = 30;

        let max = self
            .months
            .iter()
            .flat_map(|m| [m.income, m.expense, m.saving])
            .map(|m| m.as_f64())
            .fold(0.0_f64, f64::max);

        let mut output = String::new();
        output.push_str(&format!("Resumen anual {}\n", self.year));
        output.push_str(&separator(72));
        output.push('\n');

        for month in &self.months {
            let rows = [
                ("Ingresos", month.income),
                ("Gastos", month.expense),
                ("Ahorro", month.saving),
            ];
            for (i, (name, amount)) in rows.iter().enumerate() {
                let label = if i == 0 { month.label() } else { "" };
                output.push_str(&format!(
                    "{:<4} {:<9} {} {:>14}\n",
                    label,
                    name,
                    format_bar(amount.as_f64(), max, BAR_WIDTH),
                    amount
                ));
            }
        }

        output.push_str(&separator(72));
        output.push('\n');
        output.push_str(&format!("{:<45} {:>14}\n", "Total ingresos", self.total_income()));
        output.push_str(&format!("{:<45} {:>14}\n", "Total gastos", self.total_expense()));
        output.push_str(&format!("{:<45} {:>14}\n", "Total ahorro", self.total_saving()));

        output
    }
}
