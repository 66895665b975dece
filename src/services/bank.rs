//! Bank service
//!
//! Banks own their accounts, so account operations go through the bank and
//! persist the whole bank. The savings bank can hold accounts but can be
//! neither renamed nor deleted.

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Account, AccountId, Bank, BankId, Currency};
use crate::storage::Storage;

/// Changes to apply to an existing account; `None` keeps the stored value.
/// `Some("")` clears the optional CBU or alias.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub currency: Option<Currency>,
    pub cbu: Option<String>,
    pub alias: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// Service for bank and account management
pub struct BankService<'a> {
    storage: &'a Storage,
}

impl<'a> BankService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str) -> FinanceResult<Bank> {
        let bank = Bank::new(name.trim());
        bank.validate()?;
        self.ensure_unique_name(&bank.name, None)?;

        self.storage.store().save_bank(&bank)?;

        self.storage.log_create(
            EntityType::Bank,
            bank.id.to_string(),
            Some(bank.name.clone()),
            &bank,
        );

        Ok(bank)
    }

    pub fn list(&self) -> FinanceResult<Vec<Bank>> {
        self.storage.store().list_banks()
    }

    pub fn get(&self, id: BankId) -> FinanceResult<Option<Bank>> {
        Ok(self.list()?.into_iter().find(|b| b.id == id))
    }

    /// Find a bank by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Bank>> {
        let identifier = identifier.trim();
        Ok(self.list()?.into_iter().find(|b| {
            b.name.eq_ignore_ascii_case(identifier)
                || b.id.to_string() == identifier
                || b.id.short() == identifier
        }))
    }

    /// Find a bank or fail with `NotFound`
    pub fn require(&self, identifier: &str) -> FinanceResult<Bank> {
        self.find(identifier)?
            .ok_or_else(|| FinanceError::not_found("Bank", identifier))
    }

    /// Names of banks that exist, for checking name references
    pub fn names(&self) -> FinanceResult<Vec<String>> {
        Ok(self.list()?.into_iter().map(|b| b.name).collect())
    }

    pub fn rename(&self, id: BankId, new_name: &str) -> FinanceResult<Bank> {
        let before = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Bank", id.short()))?;
        if !before.is_deletable {
            return Err(FinanceError::NotPermitted(format!(
                "el banco '{}' no se puede modificar",
                before.name
            )));
        }

        let mut bank = before.clone();
        bank.name = new_name.trim().to_string();
        bank.validate()?;
        self.ensure_unique_name(&bank.name, Some(id))?;

        self.storage.store().save_bank(&bank)?;

        self.storage.log_update(
            EntityType::Bank,
            bank.id.to_string(),
            Some(bank.name.clone()),
            &before,
            &bank,
            Some(format!("name: '{}' -> '{}'", before.name, bank.name)),
        );

        Ok(bank)
    }

    /// Delete a bank and its accounts. Refused for banks that are not
    /// deletable, before anything is written.
    pub fn delete(&self, id: BankId) -> FinanceResult<Bank> {
        let bank = self
            .get(id)?
            .ok_or_else(|| FinanceError::not_found("Bank", id.short()))?;
        if !bank.is_deletable {
            tracing::warn!(bank = %bank.name, "refused to delete protected bank");
            return Err(FinanceError::NotPermitted(format!(
                "el banco '{}' no se puede eliminar",
                bank.name
            )));
        }

        self.storage.store().delete_bank(id)?;

        self.storage.log_delete(
            EntityType::Bank,
            id.to_string(),
            Some(bank.name.clone()),
            &bank,
        );

        Ok(bank)
    }

    pub fn add_account(
        &self,
        bank_id: BankId,
        name: &str,
        currency: Currency,
        cbu: Option<String>,
        alias: Option<String>,
    ) -> FinanceResult<Account> {
        let mut bank = self
            .get(bank_id)?
            .ok_or_else(|| FinanceError::not_found("Bank", bank_id.short()))?;

        let mut account = Account::new(name.trim(), currency);
        account.cbu = cbu.and_then(non_empty);
        account.alias = alias.and_then(non_empty);
        account.validate()?;

        bank.upsert_account(account.clone());
        self.storage.store().save_bank(&bank)?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(format!("{} / {}", bank.name, account.name)),
            &account,
        );

        Ok(account)
    }

    pub fn update_account(
        &self,
        bank_id: BankId,
        account_id: AccountId,
        changes: AccountChanges,
    ) -> FinanceResult<Account> {
        let mut bank = self
            .get(bank_id)?
            .ok_or_else(|| FinanceError::not_found("Bank", bank_id.short()))?;
        let before = bank
            .account(account_id)
            .cloned()
            .ok_or_else(|| FinanceError::not_found("Account", account_id.short()))?;

        let mut account = before.clone();
        if let Some(name) = changes.name {
            account.name = name.trim().to_string();
        }
        if let Some(currency) = changes.currency {
            account.currency = currency;
        }
        if let Some(cbu) = changes.cbu {
            account.cbu = non_empty(cbu);
        }
        if let Some(alias) = changes.alias {
            account.alias = non_empty(alias);
        }
        account.validate()?;

        bank.upsert_account(account.clone());
        self.storage.store().save_bank(&bank)?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(format!("{} / {}", bank.name, account.name)),
            &before,
            &account,
            None,
        );

        Ok(account)
    }

    pub fn remove_account(&self, bank_id: BankId, account_id: AccountId) -> FinanceResult<Account> {
        let mut bank = self
            .get(bank_id)?
            .ok_or_else(|| FinanceError::not_found("Bank", bank_id.short()))?;
        let account = bank
            .remove_account(account_id)
            .ok_or_else(|| FinanceError::not_found("Account", account_id.short()))?;

        self.storage.store().save_bank(&bank)?;

        self.storage.log_delete(
            EntityType::Account,
            account.id.to_string(),
            Some(format!("{} / {}", bank.name, account.name)),
            &account,
        );

        Ok(account)
    }

    /// Find an account inside a bank by name (case-insensitive) or id
    pub fn find_account<'b>(&self, bank: &'b Bank, identifier: &str) -> Option<&'b Account> {
        let identifier = identifier.trim();
        bank.accounts.iter().find(|a| {
            a.name.eq_ignore_ascii_case(identifier)
                || a.id.to_string() == identifier
                || a.id.short() == identifier
        })
    }

    fn ensure_unique_name(&self, name: &str, exclude: Option<BankId>) -> FinanceResult<()> {
        let taken = self
            .list()?
            .iter()
            .any(|b| Some(b.id) != exclude && b.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(FinanceError::invalid(
                "name",
                format!("a bank named '{}' already exists", name),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SAVINGS_BANK_NAME;
    use crate::storage::test_support::{create_sqlite_test_storage, create_test_storage};

    fn savings_bank(service: &BankService) -> Bank {
        service.find(SAVINGS_BANK_NAME).unwrap().unwrap()
    }

    #[test]
    fn test_create_and_find_bank() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);

        let bank = service.create("Galicia").unwrap();
        assert!(bank.is_deletable);
        assert_eq!(service.find("galicia").unwrap(), Some(bank.clone()));
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_and_short_names_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);
        service.create("Galicia").unwrap();

        assert!(service.create("GALICIA").unwrap_err().is_validation());
        assert!(service.create("G").unwrap_err().is_validation());
    }

    #[test]
    fn test_savings_bank_cannot_be_deleted() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);
        let before = service.list().unwrap();
        let audit_before = storage.audit().read_all().unwrap().len();

        let err = service.delete(savings_bank(&service).id).unwrap_err();
        assert!(matches!(err, FinanceError::NotPermitted(_)));
        assert_eq!(service.list().unwrap(), before);
        assert_eq!(storage.audit().read_all().unwrap().len(), audit_before);
    }

    #[test]
    fn test_savings_bank_cannot_be_renamed() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);

        let err = service
            .rename(savings_bank(&service).id, "Reserva")
            .unwrap_err();
        assert!(matches!(err, FinanceError::NotPermitted(_)));
    }

    #[test]
    fn test_savings_bank_accepts_accounts() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);
        let bank = savings_bank(&service);

        service
            .add_account(bank.id, "Plazo fijo", Currency::Ars, None, None)
            .unwrap();
        assert_eq!(savings_bank(&service).accounts.len(), 1);
    }

    #[test]
    fn test_account_lifecycle() {
        let (_temp_dir, storage) = create_sqlite_test_storage();
        let service = BankService::new(&storage);
        let bank = service.create("Galicia").unwrap();

        let account = service
            .add_account(
                bank.id,
                "Caja de ahorro",
                Currency::Ars,
                Some("0070000000000000000001".into()),
                Some("  ".into()),
            )
            .unwrap();
        assert_eq!(account.alias, None);

        let updated = service
            .update_account(
                bank.id,
                account.id,
                AccountChanges {
                    currency: Some(Currency::Usd),
                    alias: Some("mi.alias".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.currency, Currency::Usd);

        let stored = service.get(bank.id).unwrap().unwrap();
        assert_eq!(stored.accounts, vec![updated.clone()]);
        assert_eq!(service.find_account(&stored, "caja de ahorro"), Some(&updated));

        service.remove_account(bank.id, account.id).unwrap();
        assert!(service.get(bank.id).unwrap().unwrap().accounts.is_empty());
    }

    #[test]
    fn test_delete_bank_cascades_accounts() {
        let (_temp_dir, storage) = create_sqlite_test_storage();
        let service = BankService::new(&storage);
        let bank = service.create("Nación").unwrap();
        service
            .add_account(bank.id, "Cuenta", Currency::Ars, None, None)
            .unwrap();

        service.delete(bank.id).unwrap();
        assert!(service.get(bank.id).unwrap().is_none());
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_rename_bank() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BankService::new(&storage);
        let bank = service.create("Galicia").unwrap();

        let renamed = service.rename(bank.id, "Banco Galicia").unwrap();
        assert_eq!(renamed.name, "Banco Galicia");
        assert!(service.find("Galicia").unwrap().is_none());
    }
}
