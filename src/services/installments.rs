//! Installment expansion
//!
//! A credit purchase paid in N installments is stored as N expenses, one per
//! month, each carrying its share of the amount and a "(Cuota i/N)" suffix.

use chrono::{Months, NaiveDate};

use crate::models::{Expense, ExpenseId, PaymentMethod};

/// Add calendar months, clamping the day to the end of the target month
/// (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Description of installment `index` (zero-based) out of `total`
pub fn installment_description(description: &str, index: u32, total: u32) -> String {
    format!("{} (Cuota {}/{})", description, index + 1, total)
}

/// Expand a submitted expense into the records to store.
///
/// Only credit payments with more than one installment expand. Record `i`
/// is dated `i` months after the purchase and gets a fresh id; amounts are
/// split in whole cents with the remainder on the last installment. Every
/// other field is copied. Anything else comes back as a single, unmodified
/// record.
pub fn expand_installments(expense: &Expense) -> Vec<Expense> {
    let total = match &expense.payment {
        PaymentMethod::Credit { installments, .. } if *installments > 1 => *installments,
        _ => return vec![expense.clone()],
    };

    expense
        .amount
        .split_even(total)
        .into_iter()
        .zip(0..total)
        .map(|(amount, index)| Expense {
            id: ExpenseId::new(),
            description: installment_description(&expense.description, index, total),
            amount,
            date: add_months(expense.date, index),
            payment: expense.payment.clone(),
            is_saving: expense.is_saving,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::collections::HashSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit(amount: Money, on: NaiveDate, installments: u32) -> Expense {
        Expense::new(
            "Heladera",
            amount,
            on,
            PaymentMethod::Credit {
                card: "Visa".into(),
                installments,
            },
        )
    }

    #[test]
    fn test_three_installments_from_january() {
        let purchase = credit(Money::from_units(300), date(2024, 1, 15), 3);
        let records = expand_installments(&purchase);

        assert_eq!(records.len(), 3);
        let dates: Vec<_> = records.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 15), date(2024, 2, 15), date(2024, 3, 15)]
        );
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.amount, Money::from_units(100));
            assert_eq!(
                record.description,
                format!("Heladera (Cuota {}/3)", i + 1)
            );
            assert_eq!(record.payment, purchase.payment);
        }
    }

    #[test]
    fn test_amounts_sum_exactly() {
        let purchase = credit(Money::from_units(100), date(2024, 5, 2), 3);
        let records = expand_installments(&purchase);

        let amounts: Vec<i64> = records.iter().map(|e| e.amount.cents()).collect();
        assert_eq!(amounts, vec![3333, 3333, 3334]);
        let total: Money = records.iter().map(|e| e.amount).sum();
        assert_eq!(total, purchase.amount);
    }

    #[test]
    fn test_year_rollover_and_day_clamp() {
        let purchase = credit(Money::from_units(40), date(2023, 11, 30), 4);
        let dates: Vec<_> = expand_installments(&purchase)
            .iter()
            .map(|e| e.date)
            .collect();
        assert_eq!(
            dates,
            vec![
                date(2023, 11, 30),
                date(2023, 12, 30),
                date(2024, 1, 30),
                date(2024, 2, 29)
            ]
        );
    }

    #[test]
    fn test_fresh_ids_and_copied_flags() {
        let purchase = credit(Money::from_units(90), date(2024, 1, 31), 3).saving();
        let records = expand_installments(&purchase);

        let ids: HashSet<_> = records.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(records.iter().all(|e| e.is_saving));
        assert_eq!(records[1].date, date(2024, 2, 29));
    }

    #[test]
    fn test_single_installment_is_unchanged() {
        let purchase = credit(Money::from_units(50), date(2024, 1, 1), 1);
        assert_eq!(expand_installments(&purchase), vec![purchase.clone()]);
    }

    #[test]
    fn test_non_credit_is_unchanged() {
        let purchase = Expense::new(
            "Nafta",
            Money::from_units(50),
            date(2024, 1, 1),
            PaymentMethod::Debit {
                bank: "Galicia".into(),
            },
        );
        assert_eq!(expand_installments(&purchase), vec![purchase.clone()]);
    }
}
