//! Savings goal service

use crate::audit::EntityType;
use crate::error::FinanceResult;
use crate::models::savings::SAVINGS_GOAL_ID;
use crate::models::SavingsGoal;
use crate::storage::Storage;

pub struct SavingsService<'a> {
    storage: &'a Storage,
}

impl<'a> SavingsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The stored goal, or the default when none was set
    pub fn goal(&self) -> FinanceResult<SavingsGoal> {
        Ok(self.storage.store().savings_goal()?.unwrap_or_default())
    }

    /// Set the goal percentage (0-100)
    pub fn set_goal(&self, percentage: u8) -> FinanceResult<SavingsGoal> {
        let goal = SavingsGoal::new(percentage)?;
        let before = self.storage.store().savings_goal()?;

        self.storage.store().set_savings_goal(goal)?;

        match before {
            Some(before) => self.storage.log_update(
                EntityType::SavingsGoal,
                SAVINGS_GOAL_ID,
                None,
                &before,
                &goal,
                Some(format!(
                    "percentage: {}% -> {}%",
                    before.percentage, goal.percentage
                )),
            ),
            None => self
                .storage
                .log_create(EntityType::SavingsGoal, SAVINGS_GOAL_ID, None, &goal),
        }

        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::create_test_storage;

    #[test]
    fn test_default_goal() {
        let (_temp_dir, storage) = create_test_storage();
        assert_eq!(SavingsService::new(&storage).goal().unwrap().percentage, 20);
    }

    #[test]
    fn test_set_goal() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SavingsService::new(&storage);

        service.set_goal(35).unwrap();
        assert_eq!(service.goal().unwrap().percentage, 35);
    }

    #[test]
    fn test_goal_over_100_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SavingsService::new(&storage);

        assert!(service.set_goal(101).unwrap_err().is_validation());
        assert_eq!(service.goal().unwrap().percentage, 20);
    }
}
