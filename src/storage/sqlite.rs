//! SQLite backend
//!
//! Relational tables with amounts in integer cents and dates as
//! `YYYY-MM-DD` text. Multi-row writes run inside a transaction.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::RecordStore;
use crate::error::{FinanceError, FinanceResult};
use crate::models::savings::SAVINGS_GOAL_ID;
use crate::models::{
    Account, Bank, BankId, Card, CardId, Currency, Expense, ExpenseId, Income, IncomeId, Money,
    PaymentMethod, SavingsGoal, Wallet, WalletId,
};

/// Record store backed by a SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and run migrations
    pub fn open(path: &Path) -> FinanceResult<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database (for testing)
    pub fn in_memory() -> FinanceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> FinanceResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn conn(&self) -> FinanceResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| FinanceError::Storage(format!("Failed to acquire database lock: {}", e)))
    }

    fn run_migrations(&self) -> FinanceResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS Banks (
                Id TEXT PRIMARY KEY,
                Name TEXT NOT NULL,
                IsDeletable INTEGER NOT NULL DEFAULT 1,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS Accounts (
                Id TEXT PRIMARY KEY,
                Name TEXT NOT NULL,
                Currency TEXT NOT NULL DEFAULT 'ARS',
                Cbu TEXT,
                Alias TEXT,
                BankId TEXT NOT NULL REFERENCES Banks(Id) ON DELETE CASCADE,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS CreditCards (
                Id TEXT PRIMARY KEY,
                Name TEXT NOT NULL,
                Bank TEXT NOT NULL,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS DigitalWallets (
                Id TEXT PRIMARY KEY,
                Name TEXT NOT NULL,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS Incomes (
                Id TEXT PRIMARY KEY,
                Description TEXT NOT NULL,
                Amount INTEGER NOT NULL,
                Date TEXT NOT NULL,
                Source TEXT NOT NULL,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS Expenses (
                Id TEXT PRIMARY KEY,
                Description TEXT NOT NULL,
                Amount INTEGER NOT NULL,
                Date TEXT NOT NULL,
                PaymentMethod TEXT NOT NULL,
                Bank TEXT,
                Card TEXT,
                Installments INTEGER NOT NULL DEFAULT 1,
                IsSaving INTEGER NOT NULL DEFAULT 0,
                Position INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS SavingsGoals (
                Id TEXT PRIMARY KEY,
                Percentage INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_incomes_date ON Incomes(Date);
            CREATE INDEX IF NOT EXISTS idx_expenses_date ON Expenses(Date);
            CREATE INDEX IF NOT EXISTS idx_accounts_bank ON Accounts(BankId);
            "#,
        )?;
        debug!("sqlite migrations applied");
        Ok(())
    }
}

/// Parse an id column, surfacing failures as conversion errors
fn id_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Next insertion position for append-ordered tables
fn next_position(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        &format!("SELECT COALESCE(MAX(Position), -1) + 1 FROM {}", table),
        [],
        |row| row.get(0),
    )
}

fn delete_by_id(conn: &Connection, table: &str, id: String) -> FinanceResult<bool> {
    let removed = conn.execute(&format!("DELETE FROM {} WHERE Id = ?1", table), params![id])?;
    Ok(removed > 0)
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let label: String = row.get(4)?;
    let bank: Option<String> = row.get(5)?;
    let card: Option<String> = row.get(6)?;
    let installments: i64 = row.get(7)?;
    let installments = u32::try_from(installments).unwrap_or(1);

    let payment = PaymentMethod::from_parts(&label, bank.clone(), card, Some(installments))
        .unwrap_or(PaymentMethod::Other { label, bank });

    Ok(Expense {
        id: id_column(row, 0)?,
        description: row.get(1)?,
        amount: Money::from_cents(row.get(2)?),
        date: row.get(3)?,
        payment,
        is_saving: row.get(8)?,
    })
}

impl RecordStore for SqliteStore {
    fn list_incomes(&self) -> FinanceResult<Vec<Income>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT Id, Description, Amount, Date, Source FROM Incomes ORDER BY Position",
        )?;
        let incomes = stmt
            .query_map([], |row| {
                Ok(Income {
                    id: id_column(row, 0)?,
                    description: row.get(1)?,
                    amount: Money::from_cents(row.get(2)?),
                    date: row.get(3)?,
                    source: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(incomes)
    }

    fn save_incomes(&self, incomes: &[Income]) -> FinanceResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for income in incomes {
            let position = next_position(&tx, "Incomes")?;
            tx.execute(
                "INSERT INTO Incomes (Id, Description, Amount, Date, Source, Position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(Id) DO UPDATE SET
                    Description = excluded.Description,
                    Amount = excluded.Amount,
                    Date = excluded.Date,
                    Source = excluded.Source",
                params![
                    income.id.to_storage_string(),
                    income.description,
                    income.amount.cents(),
                    income.date,
                    income.source,
                    position
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_income(&self, id: IncomeId) -> FinanceResult<bool> {
        let conn = self.conn()?;
        delete_by_id(&conn, "Incomes", id.to_storage_string())
    }

    fn list_expenses(&self) -> FinanceResult<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT Id, Description, Amount, Date, PaymentMethod, Bank, Card, Installments, IsSaving
             FROM Expenses ORDER BY Position",
        )?;
        let expenses = stmt
            .query_map([], expense_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    fn save_expenses(&self, expenses: &[Expense]) -> FinanceResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        for expense in expenses {
            let position = next_position(&tx, "Expenses")?;
            tx.execute(
                "INSERT INTO Expenses
                    (Id, Description, Amount, Date, PaymentMethod, Bank, Card, Installments, IsSaving, Position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(Id) DO UPDATE SET
                    Description = excluded.Description,
                    Amount = excluded.Amount,
                    Date = excluded.Date,
                    PaymentMethod = excluded.PaymentMethod,
                    Bank = excluded.Bank,
                    Card = excluded.Card,
                    Installments = excluded.Installments,
                    IsSaving = excluded.IsSaving",
                params![
                    expense.id.to_storage_string(),
                    expense.description,
                    expense.amount.cents(),
                    expense.date,
                    expense.payment.label(),
                    expense.bank(),
                    expense.card(),
                    i64::from(expense.installments()),
                    expense.is_saving,
                    position
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_expense(&self, id: ExpenseId) -> FinanceResult<bool> {
        let conn = self.conn()?;
        delete_by_id(&conn, "Expenses", id.to_storage_string())
    }

    fn list_banks(&self) -> FinanceResult<Vec<Bank>> {
        let conn = self.conn()?;

        let mut bank_stmt =
            conn.prepare("SELECT Id, Name, IsDeletable FROM Banks ORDER BY Position")?;
        let mut banks = bank_stmt
            .query_map([], |row| {
                Ok(Bank {
                    id: id_column(row, 0)?,
                    name: row.get(1)?,
                    is_deletable: row.get(2)?,
                    accounts: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut account_stmt = conn.prepare(
            "SELECT Id, Name, Currency, Cbu, Alias FROM Accounts WHERE BankId = ?1 ORDER BY Position",
        )?;
        for bank in &mut banks {
            bank.accounts = account_stmt
                .query_map(params![bank.id.to_storage_string()], |row| {
                    let currency: String = row.get(2)?;
                    Ok(Account {
                        id: id_column(row, 0)?,
                        name: row.get(1)?,
                        currency: Currency::parse(&currency).unwrap_or_default(),
                        cbu: row.get(3)?,
                        alias: row.get(4)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(banks)
    }

    fn save_bank(&self, bank: &Bank) -> FinanceResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let bank_id = bank.id.to_storage_string();

        let position = next_position(&tx, "Banks")?;
        tx.execute(
            "INSERT INTO Banks (Id, Name, IsDeletable, Position) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(Id) DO UPDATE SET Name = excluded.Name, IsDeletable = excluded.IsDeletable",
            params![bank_id, bank.name, bank.is_deletable, position],
        )?;

        // The account list is replaced wholesale
        tx.execute("DELETE FROM Accounts WHERE BankId = ?1", params![bank_id])?;
        for (index, account) in bank.accounts.iter().enumerate() {
            tx.execute(
                "INSERT INTO Accounts (Id, Name, Currency, Cbu, Alias, BankId, Position)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    account.id.to_storage_string(),
                    account.name,
                    account.currency.code(),
                    account.cbu,
                    account.alias,
                    bank_id,
                    index as i64
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn delete_bank(&self, id: BankId) -> FinanceResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let bank_id = id.to_storage_string();

        tx.execute("DELETE FROM Accounts WHERE BankId = ?1", params![bank_id])?;
        let removed = tx.execute("DELETE FROM Banks WHERE Id = ?1", params![bank_id])?;

        tx.commit()?;
        Ok(removed > 0)
    }

    fn list_cards(&self) -> FinanceResult<Vec<Card>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT Id, Name, Bank FROM CreditCards ORDER BY Position")?;
        let cards = stmt
            .query_map([], |row| {
                Ok(Card {
                    id: id_column(row, 0)?,
                    name: row.get(1)?,
                    bank: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }

    fn save_card(&self, card: &Card) -> FinanceResult<()> {
        let conn = self.conn()?;
        let position = next_position(&conn, "CreditCards")?;
        conn.execute(
            "INSERT INTO CreditCards (Id, Name, Bank, Position) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(Id) DO UPDATE SET Name = excluded.Name, Bank = excluded.Bank",
            params![card.id.to_storage_string(), card.name, card.bank, position],
        )?;
        Ok(())
    }

    fn delete_card(&self, id: CardId) -> FinanceResult<bool> {
        let conn = self.conn()?;
        delete_by_id(&conn, "CreditCards", id.to_storage_string())
    }

    fn list_wallets(&self) -> FinanceResult<Vec<Wallet>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT Id, Name FROM DigitalWallets ORDER BY Position")?;
        let wallets = stmt
            .query_map([], |row| {
                Ok(Wallet {
                    id: id_column(row, 0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(wallets)
    }

    fn save_wallet(&self, wallet: &Wallet) -> FinanceResult<()> {
        let conn = self.conn()?;
        let position = next_position(&conn, "DigitalWallets")?;
        conn.execute(
            "INSERT INTO DigitalWallets (Id, Name, Position) VALUES (?1, ?2, ?3)
             ON CONFLICT(Id) DO UPDATE SET Name = excluded.Name",
            params![wallet.id.to_storage_string(), wallet.name, position],
        )?;
        Ok(())
    }

    fn delete_wallet(&self, id: WalletId) -> FinanceResult<bool> {
        let conn = self.conn()?;
        delete_by_id(&conn, "DigitalWallets", id.to_storage_string())
    }

    fn savings_goal(&self) -> FinanceResult<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let percentage: Option<i64> = conn
            .query_row(
                "SELECT Percentage FROM SavingsGoals WHERE Id = ?1",
                params![SAVINGS_GOAL_ID],
                |row| row.get(0),
            )
            .optional()?;

        Ok(percentage.map(|p| SavingsGoal {
            percentage: u8::try_from(p.clamp(0, 100)).unwrap_or(0),
        }))
    }

    fn set_savings_goal(&self, goal: SavingsGoal) -> FinanceResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO SavingsGoals (Id, Percentage) VALUES (?1, ?2)
             ON CONFLICT(Id) DO UPDATE SET Percentage = excluded.Percentage",
            params![SAVINGS_GOAL_ID, i64::from(goal.percentage)],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        SqliteStore::open(&path).unwrap();
        let store = SqliteStore::open(&path).unwrap();
        assert!(store.list_banks().unwrap().is_empty());
    }

    #[test]
    fn test_expense_row_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let expense = Expense::new(
            "Heladera (Cuota 1/3)",
            Money::from_units(100),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            PaymentMethod::Credit {
                card: "Visa".into(),
                installments: 3,
            },
        );
        store.save_expense(&expense).unwrap();

        let loaded = store.list_expenses().unwrap();
        assert_eq!(loaded, vec![expense]);
    }

    #[test]
    fn test_dates_stored_as_iso_text() {
        let store = SqliteStore::in_memory().unwrap();
        let income = Income::new(
            "Sueldo",
            Money::from_units(2500),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            "Galicia",
        );
        store.save_income(&income).unwrap();

        let conn = store.conn().unwrap();
        let raw: String = conn
            .query_row("SELECT Date FROM Incomes", [], |row| row.get(0))
            .unwrap();
        let cents: i64 = conn
            .query_row("SELECT Amount FROM Incomes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2024-03-05");
        assert_eq!(cents, 250000);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = SqliteStore::in_memory().unwrap();
        let good = Income::new(
            "Sueldo",
            Money::from_units(10),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Galicia",
        );
        store
            .conn()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON Incomes
                 WHEN NEW.Description = 'boom'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();
        let mut bad = good.clone();
        bad.id = IncomeId::new();
        bad.description = "boom".into();

        assert!(store.save_incomes(&[good, bad]).is_err());
        assert!(store.list_incomes().unwrap().is_empty());
    }
}
