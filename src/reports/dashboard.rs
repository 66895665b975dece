//! Monthly dashboard
//!
//! Totals for one period plus the all-time savings balance. Savings
//! contributions are expenses flagged `is_saving`; they are kept out of
//! regular spending. Withdrawals are expenses paid from the savings bank.

use crate::error::FinanceResult;
use crate::models::{Expense, Income, Money, Period, SavingsGoal, SAVINGS_BANK_NAME};
use crate::services::period::filter_period;
use crate::storage::Storage;

use crate::display::report::{format_percentage, separator};

pub fn total_income(incomes: &[Income]) -> Money {
    incomes.iter().map(|i| i.amount).sum()
}

/// Spending that is not a savings contribution
pub fn total_regular_expenses(expenses: &[Expense]) -> Money {
    expenses
        .iter()
        .filter(|e| !e.is_saving)
        .map(|e| e.amount)
        .sum()
}

pub fn savings_contribution(expenses: &[Expense]) -> Money {
    expenses
        .iter()
        .filter(|e| e.is_saving)
        .map(|e| e.amount)
        .sum()
}

/// All-time savings balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CumulativeSavings {
    pub contributions: Money,
    pub withdrawals: Money,
}

impl CumulativeSavings {
    /// Compute over every stored expense, regardless of period
    pub fn compute(all_expenses: &[Expense]) -> Self {
        Self {
            contributions: savings_contribution(all_expenses),
            withdrawals: all_expenses
                .iter()
                .filter(|e| e.bank() == Some(SAVINGS_BANK_NAME))
                .map(|e| e.amount)
                .sum(),
        }
    }

    pub fn total(&self) -> Money {
        self.contributions - self.withdrawals
    }
}

/// Progress towards the savings goal for one period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Amount the goal asks for: income x percentage / 100
    pub target: Money,
    /// Contribution as a percentage of the target
    pub percent: f64,
}

impl GoalProgress {
    /// None when there is no income to take a percentage of
    pub fn compute(income: Money, contribution: Money, goal: SavingsGoal) -> Option<Self> {
        if !income.is_positive() {
            return None;
        }
        let target = Money::from_cents(income.cents() * i64::from(goal.percentage) / 100);
        let percent = if target.is_zero() {
            100.0
        } else {
            contribution.as_f64() / target.as_f64() * 100.0
        };
        Some(Self { target, percent })
    }

    pub fn is_met(&self) -> bool {
        self.percent >= 100.0
    }
}

/// Dashboard figures for a period
#[derive(Debug, Clone)]
pub struct MonthlySummary {
    pub period: Period,
    pub total_income: Money,
    pub total_regular_expenses: Money,
    pub savings_contribution: Money,
    /// Income minus regular spending
    pub balance: Money,
    pub income_count: usize,
    pub expense_count: usize,
    pub cumulative_savings: CumulativeSavings,
    pub goal: SavingsGoal,
    pub goal_progress: Option<GoalProgress>,
}

impl MonthlySummary {
    /// Compute from in-memory records; `incomes` and `expenses` may hold
    /// records from any date
    pub fn compute(
        incomes: &[Income],
        expenses: &[Expense],
        period: &Period,
        goal: SavingsGoal,
    ) -> Self {
        let period_incomes = filter_period(incomes, period);
        let period_expenses = filter_period(expenses, period);

        let total_income = total_income(&period_incomes);
        let total_regular_expenses = total_regular_expenses(&period_expenses);
        let savings_contribution = savings_contribution(&period_expenses);

        Self {
            period: period.clone(),
            total_income,
            total_regular_expenses,
            savings_contribution,
            balance: total_income - total_regular_expenses,
            income_count: period_incomes.len(),
            expense_count: period_expenses.len(),
            cumulative_savings: CumulativeSavings::compute(expenses),
            goal,
            goal_progress: GoalProgress::compute(total_income, savings_contribution, goal),
        }
    }

    /// Load everything from storage and compute
    pub fn generate(storage: &Storage, period: &Period) -> FinanceResult<Self> {
        let store = storage.store();
        let goal = store.savings_goal()?.unwrap_or_default();
        Ok(Self::compute(
            &store.list_incomes()?,
            &store.list_expenses()?,
            period,
            goal,
        ))
    }

    /// No income or expense in the period
    pub fn is_empty(&self) -> bool {
        self.income_count == 0 && self.expense_count == 0
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Resumen: {}\n", self.period.friendly()));
        output.push_str(&separator(50));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No hay movimientos en este período.\n");
        }

        output.push_str(&format!("{:<30} {:>18}\n", "Ingresos", self.total_income));
        output.push_str(&format!(
            "{:<30} {:>18}\n",
            "Gastos", self.total_regular_expenses
        ));
        output.push_str(&format!(
            "{:<30} {:>18}\n",
            "Aporte a ahorros", self.savings_contribution
        ));
        output.push_str(&separator(50));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>18}\n", "Balance", self.balance));
        output.push_str(&format!(
            "{:<30} {:>18}\n",
            "Ahorro acumulado",
            self.cumulative_savings.total()
        ));

        output.push('\n');
        match &self.goal_progress {
            Some(progress) => {
                output.push_str(&format!(
                    "Meta de ahorro ({}% de ingresos): {} de {} ({})\n",
                    self.goal.percentage,
                    self.savings_contribution,
                    progress.target,
                    format_percentage(progress.percent)
                ));
            }
            None => {
                output.push_str(&format!(
                    "Meta de ahorro: {}% (sin ingresos en el período)\n",
                    self.goal.percentage
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march() -> Period {
        Period::month(2024, 3).unwrap()
    }

    fn cash(amount: i64, on: NaiveDate) -> Expense {
        Expense::new("Gasto", Money::from_units(amount), on, PaymentMethod::Cash)
    }

    #[test]
    fn test_period_beyond_calendar_is_empty() {
        let incomes = vec![Income::new(
            "Sueldo",
            Money::from_units(2500),
            date(2024, 3, 5),
            "Galicia",
        )];
        let far = Period::Year { year: 999_999 };

        let summary = MonthlySummary::compute(&incomes, &[], &far, SavingsGoal::default());
        assert!(summary.is_empty());
    }

    #[test]
    fn test_march_dashboard() {
        let incomes = vec![Income::new(
            "Sueldo",
            Money::from_units(2500),
            date(2024, 3, 5),
            "Galicia",
        )];
        let expenses = vec![cash(150, date(2024, 3, 10))];

        let summary = MonthlySummary::compute(&incomes, &expenses, &march(), SavingsGoal::default());

        assert_eq!(summary.total_income, Money::from_units(2500));
        assert_eq!(summary.total_regular_expenses, Money::from_units(150));
        assert_eq!(summary.balance, Money::from_units(2350));
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_savings_excluded_from_regular_spending() {
        let incomes = vec![Income::new(
            "Sueldo",
            Money::from_units(1000),
            date(2024, 3, 1),
            "Galicia",
        )];
        let expenses = vec![
            cash(100, date(2024, 3, 2)),
            cash(200, date(2024, 3, 3)).saving(),
            cash(999, date(2024, 4, 1)),
        ];

        let summary = MonthlySummary::compute(&incomes, &expenses, &march(), SavingsGoal::default());

        assert_eq!(summary.total_regular_expenses, Money::from_units(100));
        assert_eq!(summary.savings_contribution, Money::from_units(200));
        assert_eq!(summary.balance, Money::from_units(900));

        let progress = summary.goal_progress.unwrap();
        assert_eq!(progress.target, Money::from_units(200));
        assert!(progress.is_met());
    }

    #[test]
    fn test_cumulative_savings_ignores_period() {
        let withdrawal = Expense::new(
            "Retiro",
            Money::from_units(50),
            date(2023, 6, 1),
            PaymentMethod::Debit {
                bank: SAVINGS_BANK_NAME.into(),
            },
        );
        let expenses = vec![
            cash(300, date(2023, 1, 1)).saving(),
            cash(100, date(2024, 3, 3)).saving(),
            withdrawal,
        ];

        let summary = MonthlySummary::compute(&[], &expenses, &march(), SavingsGoal::default());

        assert_eq!(summary.cumulative_savings.contributions, Money::from_units(400));
        assert_eq!(summary.cumulative_savings.withdrawals, Money::from_units(50));
        assert_eq!(summary.cumulative_savings.total(), Money::from_units(350));
    }

    #[test]
    fn test_empty_period_is_not_an_error() {
        let summary = MonthlySummary::compute(&[], &[], &march(), SavingsGoal::default());

        assert!(summary.is_empty());
        assert_eq!(summary.balance, Money::zero());
        assert!(summary.goal_progress.is_none());
        assert!(summary.format_terminal().contains("No hay movimientos"));
    }

    #[test]
    fn test_generate_from_storage() {
        let (_temp_dir, storage) = crate::storage::test_support::create_test_storage();
        storage
            .store()
            .save_income(&Income::new(
                "Sueldo",
                Money::from_units(2500),
                date(2024, 3, 5),
                "Galicia",
            ))
            .unwrap();

        let summary = MonthlySummary::generate(&storage, &march()).unwrap();
        assert_eq!(summary.total_income, Money::from_units(2500));
        assert_eq!(summary.goal.percentage, 20);
    }
}
