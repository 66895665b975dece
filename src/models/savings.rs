//! Savings goal
//!
//! A singleton: the percentage of monthly income the user wants to save.

use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, FinanceResult};

/// Storage key of the single savings goal row
pub const SAVINGS_GOAL_ID: &str = "main";

pub const DEFAULT_SAVINGS_PERCENTAGE: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub percentage: u8,
}

impl SavingsGoal {
    pub fn new(percentage: u8) -> FinanceResult<Self> {
        let goal = Self { percentage };
        goal.validate()?;
        Ok(goal)
    }

    pub fn validate(&self) -> FinanceResult<()> {
        if self.percentage > 100 {
            return Err(FinanceError::invalid(
                "percentage",
                "must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

impl Default for SavingsGoal {
    fn default() -> Self {
        Self {
            percentage: DEFAULT_SAVINGS_PERCENTAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_twenty_percent() {
        assert_eq!(SavingsGoal::default().percentage, 20);
    }

    #[test]
    fn test_bounds() {
        assert!(SavingsGoal::new(0).is_ok());
        assert!(SavingsGoal::new(100).is_ok());
        assert!(SavingsGoal::new(101).is_err());
    }
}
