//! Storage initialization
//!
//! Seeds the data every installation needs: the protected savings bank and
//! the default savings goal. Safe to call on every start.

use crate::audit::EntityType;
use crate::error::FinanceResult;
use crate::models::{Bank, SavingsGoal};

use super::Storage;

/// Create default records that are missing. Returns true if anything was
/// created.
pub fn initialize_storage(storage: &Storage) -> FinanceResult<bool> {
    let store = storage.store();
    let mut created = false;

    let banks = store.list_banks()?;
    if !banks.iter().any(Bank::is_savings) {
        let savings = Bank::savings();
        store.save_bank(&savings)?;
        storage.log_create(
            EntityType::Bank,
            savings.id.to_string(),
            Some(savings.name.clone()),
            &savings,
        );
        tracing::info!(bank = %savings.name, "created savings bank");
        created = true;
    }

    if store.savings_goal()?.is_none() {
        let goal = SavingsGoal::default();
        store.set_savings_goal(goal)?;
        storage.log_create(EntityType::SavingsGoal, "main", None, &goal);
        created = true;
    }

    Ok(created)
}

/// Check if storage still needs seeding
pub fn needs_initialization(storage: &Storage) -> FinanceResult<bool> {
    let store = storage.store();
    Ok(!store.list_banks()?.iter().any(Bank::is_savings) || store.savings_goal()?.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FinancePaths;
    use crate::config::settings::StorageBackend;
    use crate::models::SAVINGS_BANK_NAME;
    use tempfile::TempDir;

    #[test]
    fn test_seeds_savings_bank_and_goal_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, StorageBackend::Json).unwrap();

        assert!(needs_initialization(&storage).unwrap());
        assert!(initialize_storage(&storage).unwrap());
        assert!(!initialize_storage(&storage).unwrap());
        assert!(!needs_initialization(&storage).unwrap());

        let banks = storage.store().list_banks().unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].name, SAVINGS_BANK_NAME);
        assert!(!banks[0].is_deletable);
        assert_eq!(
            storage.store().savings_goal().unwrap(),
            Some(SavingsGoal { percentage: 20 })
        );
    }
}
