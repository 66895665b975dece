//! Behaviour every `RecordStore` backend must share

use chrono::NaiveDate;
use tempfile::TempDir;

use super::{JsonStore, RecordStore, SqliteStore};
use crate::config::paths::FinancePaths;
use crate::models::{
    Account, Bank, Card, Currency, Expense, Income, IncomeId, Money, PaymentMethod, SavingsGoal,
    Wallet,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn json_store() -> (TempDir, JsonStore) {
    let temp_dir = TempDir::new().unwrap();
    let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
    paths.ensure_directories().unwrap();
    let store = JsonStore::open(&paths).unwrap();
    (temp_dir, store)
}

fn upsert_updates_in_place(store: &dyn RecordStore) {
    let mut income = Income::new("Sueldo", Money::from_units(2500), date(2024, 3, 5), "Galicia");
    let other = Income::new("Venta", Money::from_units(100), date(2024, 3, 6), "Ualá");
    store.save_income(&income).unwrap();
    store.save_income(&other).unwrap();

    income.amount = Money::from_units(2600);
    store.save_income(&income).unwrap();

    let incomes = store.list_incomes().unwrap();
    assert_eq!(incomes.len(), 2);
    assert_eq!(incomes[0], income);
    assert_eq!(incomes[1], other);
}

fn delete_reports_existence(store: &dyn RecordStore) {
    let wallet = Wallet::new("Mercado Pago");
    store.save_wallet(&wallet).unwrap();

    assert!(store.delete_wallet(wallet.id).unwrap());
    assert!(!store.delete_wallet(wallet.id).unwrap());
    assert!(store.list_wallets().unwrap().is_empty());
    assert!(!store.delete_income(IncomeId::new()).unwrap());
}

fn batch_save_keeps_order(store: &dyn RecordStore) {
    let expenses: Vec<Expense> = (1..=3)
        .map(|i| {
            Expense::new(
                format!("Heladera (Cuota {}/3)", i),
                Money::from_units(100),
                date(2024, i, 15),
                PaymentMethod::Credit {
                    card: "Visa".into(),
                    installments: 3,
                },
            )
        })
        .collect();
    store.save_expenses(&expenses).unwrap();

    let saving = Expense::new(
        "Plazo fijo",
        Money::from_units(50),
        date(2024, 3, 1),
        PaymentMethod::Transfer {
            bank: "Ahorros".into(),
        },
    )
    .saving();
    store.save_expense(&saving).unwrap();

    let loaded = store.list_expenses().unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(&loaded[..3], &expenses[..]);
    assert!(loaded[3].is_saving);
    assert_eq!(loaded[3].bank(), Some("Ahorros"));
}

fn bank_accounts_round_trip_and_cascade(store: &dyn RecordStore) {
    let mut bank = Bank::new("Galicia");
    let mut usd = Account::new("Cuenta USD", Currency::Usd);
    usd.cbu = Some("0070000000000000000001".into());
    usd.alias = Some("mi.alias.usd".into());
    bank.upsert_account(Account::new("Caja de ahorro", Currency::Ars));
    bank.upsert_account(usd);
    store.save_bank(&bank).unwrap();

    let loaded = store.list_banks().unwrap();
    assert_eq!(loaded, vec![bank.clone()]);

    let removed = bank.accounts[0].id;
    bank.remove_account(removed);
    store.save_bank(&bank).unwrap();
    assert_eq!(store.list_banks().unwrap()[0].accounts.len(), 1);

    assert!(store.delete_bank(bank.id).unwrap());
    assert!(store.list_banks().unwrap().is_empty());
}

fn cards_and_goal(store: &dyn RecordStore) {
    let card = Card::new("Visa", "Galicia");
    store.save_card(&card).unwrap();
    assert_eq!(store.list_cards().unwrap(), vec![card]);

    assert_eq!(store.savings_goal().unwrap(), None);
    store.set_savings_goal(SavingsGoal { percentage: 35 }).unwrap();
    store.set_savings_goal(SavingsGoal { percentage: 40 }).unwrap();
    assert_eq!(
        store.savings_goal().unwrap(),
        Some(SavingsGoal { percentage: 40 })
    );
}

fn run_contract(store: &dyn RecordStore) {
    upsert_updates_in_place(store);
    delete_reports_existence(store);
    batch_save_keeps_order(store);
    bank_accounts_round_trip_and_cascade(store);
    cards_and_goal(store);
}

#[test]
fn test_json_store_contract() {
    let (_temp_dir, store) = json_store();
    run_contract(&store);
}

#[test]
fn test_sqlite_store_contract() {
    let store = SqliteStore::in_memory().unwrap();
    run_contract(&store);
}
