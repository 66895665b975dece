//! Credit card and digital wallet services

use crate::audit::EntityType;
use crate::error::{FinanceError, FinanceResult};
use crate::models::{Card, CardId, Wallet, WalletId};
use crate::storage::Storage;

/// A card together with whether its bank reference still resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    pub card: Card,
    pub bank_exists: bool,
}

/// Service for credit card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

impl<'a> CardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a card. The bank is a free name reference; it is not required
    /// to exist.
    pub fn create(&self, name: &str, bank: &str) -> FinanceResult<Card> {
        let card = Card::new(name.trim(), bank.trim());
        card.validate()?;

        self.storage.store().save_card(&card)?;

        self.storage.log_create(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        );

        Ok(card)
    }

    pub fn list(&self) -> FinanceResult<Vec<Card>> {
        self.storage.store().list_cards()
    }

    /// Cards with their bank references checked against current banks
    pub fn list_with_status(&self) -> FinanceResult<Vec<CardSummary>> {
        let banks = self.storage.store().list_banks()?;
        Ok(self
            .list()?
            .into_iter()
            .map(|card| {
                let bank_exists = banks.iter().any(|b| b.name.eq_ignore_ascii_case(&card.bank));
                CardSummary { card, bank_exists }
            })
            .collect())
    }

    /// Find a card by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Card>> {
        let identifier = identifier.trim();
        Ok(self.list()?.into_iter().find(|c| {
            c.name.eq_ignore_ascii_case(identifier)
                || c.id.to_string() == identifier
                || c.id.short() == identifier
        }))
    }

    pub fn update(&self, id: CardId, name: Option<&str>, bank: Option<&str>) -> FinanceResult<Card> {
        let before = self
            .list()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| FinanceError::not_found("Card", id.short()))?;

        let mut card = before.clone();
        if let Some(name) = name {
            card.name = name.trim().to_string();
        }
        if let Some(bank) = bank {
            card.bank = bank.trim().to_string();
        }
        card.validate()?;

        self.storage.store().save_card(&card)?;

        self.storage.log_update(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
            None,
        );

        Ok(card)
    }

    pub fn delete(&self, id: CardId) -> FinanceResult<Card> {
        let card = self
            .list()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| FinanceError::not_found("Card", id.short()))?;

        self.storage.store().delete_card(id)?;

        self.storage.log_delete(
            EntityType::Card,
            id.to_string(),
            Some(card.name.clone()),
            &card,
        );

        Ok(card)
    }
}

/// Service for digital wallet management
pub struct WalletService<'a> {
    storage: &'a Storage,
}

impl<'a> WalletService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, name: &str) -> FinanceResult<Wallet> {
        let wallet = Wallet::new(name.trim());
        wallet.validate()?;

        self.storage.store().save_wallet(&wallet)?;

        self.storage.log_create(
            EntityType::Wallet,
            wallet.id.to_string(),
            Some(wallet.name.clone()),
            &wallet,
        );

        Ok(wallet)
    }

    pub fn list(&self) -> FinanceResult<Vec<Wallet>> {
        self.storage.store().list_wallets()
    }

    /// Find a wallet by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> FinanceResult<Option<Wallet>> {
        let identifier = identifier.trim();
        Ok(self.list()?.into_iter().find(|w| {
            w.name.eq_ignore_ascii_case(identifier)
                || w.id.to_string() == identifier
                || w.id.short() == identifier
        }))
    }

    pub fn rename(&self, id: WalletId, new_name: &str) -> FinanceResult<Wallet> {
        let before = self
            .list()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| FinanceError::not_found("Wallet", id.short()))?;

        let mut wallet = before.clone();
        wallet.name = new_name.trim().to_string();
        wallet.validate()?;

        self.storage.store().save_wallet(&wallet)?;

        self.storage.log_update(
            EntityType::Wallet,
            wallet.id.to_string(),
            Some(wallet.name.clone()),
            &before,
            &wallet,
            Some(format!("name: '{}' -> '{}'", before.name, wallet.name)),
        );

        Ok(wallet)
    }

    pub fn delete(&self, id: WalletId) -> FinanceResult<Wallet> {
        let wallet = self
            .list()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| FinanceError::not_found("Wallet", id.short()))?;

        self.storage.store().delete_wallet(id)?;

        self.storage.log_delete(
            EntityType::Wallet,
            id.to_string(),
            Some(wallet.name.clone()),
            &wallet,
        );

        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::BankService;
    use crate::storage::test_support::create_test_storage;

    #[test]
    fn test_card_bank_reference_not_enforced() {
        let (_temp_dir, storage) = create_test_storage();
        BankService::new(&storage).create("Galicia").unwrap();
        let service = CardService::new(&storage);

        service.create("Visa", "Galicia").unwrap();
        service.create("Master", "Santander").unwrap();

        let cards = service.list_with_status().unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards[0].bank_exists);
        assert!(!cards[1].bank_exists);
    }

    #[test]
    fn test_card_survives_bank_deletion() {
        let (_temp_dir, storage) = create_test_storage();
        let banks = BankService::new(&storage);
        let bank = banks.create("Galicia").unwrap();
        let service = CardService::new(&storage);
        let card = service.create("Visa", "Galicia").unwrap();

        banks.delete(bank.id).unwrap();

        let cards = service.list_with_status().unwrap();
        assert_eq!(cards[0].card, card);
        assert!(!cards[0].bank_exists);
    }

    #[test]
    fn test_card_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CardService::new(&storage);
        let card = service.create("Visa", "Galicia").unwrap();

        let updated = service.update(card.id, Some("Visa Gold"), None).unwrap();
        assert_eq!(updated.bank, "Galicia");
        assert_eq!(service.find("visa gold").unwrap(), Some(updated));

        service.delete(card.id).unwrap();
        assert!(service.list().unwrap().is_empty());
        assert!(service.delete(card.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_wallet_lifecycle() {
        let (_temp_dir, storage) = create_test_storage();
        let service = WalletService::new(&storage);

        assert!(service.create("M").unwrap_err().is_validation());
        let wallet = service.create("Mercado Pago").unwrap();
        let renamed = service.rename(wallet.id, "MP").unwrap();
        assert_eq!(service.find("mp").unwrap(), Some(renamed));

        service.delete(wallet.id).unwrap();
        assert!(service.list().unwrap().is_empty());
    }
}
