//! # Transaction Repository
//!
//! Database operations for checkout transactions and their quantity lines.
//!
//! ## Dependent-Insert Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              insert_with_items: one unit of work                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   SINGLE TRANSACTION                            │   │
//! │  │                                                                 │   │
//! │  │  1. INSERT INTO transactions (…)        ← parent row first     │   │
//! │  │  2. INSERT INTO transaction_items (…)   ← lines get parent id  │   │
//! │  │  3. INSERT INTO transaction_items (…)                          │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ← all rows land, or the guard rolls everything back            │
//! │                                                                         │
//! │  A line referencing an unknown product fails its FOREIGN KEY check,    │
//! │  the guard drops un-committed, and no half-written checkout survives.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::{Transaction, TransactionItem};

use crate::error::{DbError, DbResult};
use crate::record::{Record, Repo, SqliteQuery};

impl Record for Transaction {
    const TABLE: &'static str = "transactions";
    const COLUMNS: &'static [&'static str] = &["employee_id", "transaction_date", "note"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.employee_id)
            .bind(self.transaction_date)
            .bind(self.note.clone())
    }
}

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    repo: Repo<Transaction>,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached transaction without lines.
    pub async fn insert(&self, transaction: &mut Transaction) -> DbResult<()> {
        self.repo.insert(transaction).await
    }

    /// Inserts a transaction and its lines as one atomic unit of work.
    ///
    /// The parent row goes in first and its fresh id is stamped onto every
    /// line. If any line fails (unknown product, duplicate product on the
    /// same checkout), the whole unit rolls back.
    ///
    /// ## Returns
    /// * `Ok(lines)` - persisted lines with `transaction_id` filled in
    /// * `Err(DbError::ForeignKeyViolation)` - a parent is missing
    /// * `Err(DbError::UniqueViolation)` - a product appears twice
    pub async fn insert_with_items(
        &self,
        transaction: &mut Transaction,
        lines: &[TransactionItem],
    ) -> DbResult<Vec<TransactionItem>> {
        debug!(
            employee_id = transaction.employee_id,
            lines = lines.len(),
            "Inserting transaction with lines"
        );

        let mut tx = self.repo.pool().begin().await?;

        let result = sqlx::query(
            "INSERT INTO transactions (employee_id, transaction_date, note) VALUES (?1, ?2, ?3)",
        )
        .bind(transaction.employee_id)
        .bind(transaction.transaction_date)
        .bind(transaction.note.clone())
        .execute(&mut *tx)
        .await?;
        let transaction_id = result.last_insert_rowid();

        let mut persisted = Vec::with_capacity(lines.len());
        for line in lines {
            sqlx::query(
                "INSERT INTO transaction_items (transaction_id, product_id, quantity) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(transaction_id)
            .bind(line.product_id)
            .bind(line.quantity())
            .execute(&mut *tx)
            .await?;

            let mut line = line.clone();
            line.transaction_id = transaction_id;
            persisted.push(line);
        }

        tx.commit().await?;
        transaction.set_id(transaction_id);

        Ok(persisted)
    }

    /// Gets a transaction by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Transaction>> {
        self.repo.fetch(id).await
    }

    /// Lists all transactions.
    pub async fn list(&self) -> DbResult<Vec<Transaction>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored transaction with the given one, matched by id.
    pub async fn update(&self, transaction: &Transaction) -> DbResult<()> {
        self.repo.update(transaction).await
    }

    /// Adds one line to an existing transaction.
    ///
    /// Both parents must already be persisted (dependent-insert ordering).
    pub async fn add_item(&self, transaction_id: i64, line: &TransactionItem) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO transaction_items (transaction_id, product_id, quantity) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(line.quantity())
        .execute(self.repo.pool())
        .await?;

        Ok(())
    }

    /// The quantity lines of one transaction.
    pub async fn items(&self, transaction_id: i64) -> DbResult<Vec<TransactionItem>> {
        let items = sqlx::query_as::<_, TransactionItem>(
            "SELECT transaction_id, product_id, quantity FROM transaction_items \
             WHERE transaction_id = ?1 ORDER BY product_id",
        )
        .bind(transaction_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(items)
    }

    /// Removes one line, keyed by the (transaction, product) pair.
    pub async fn remove_item(&self, transaction_id: i64, product_id: i64) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM transaction_items WHERE transaction_id = ?1 AND product_id = ?2",
        )
        .bind(transaction_id)
        .bind(product_id)
        .execute(self.repo.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "transaction_items",
                format!("({transaction_id}, {product_id})"),
            ));
        }

        Ok(())
    }

    /// Transactions dated inside `[from, to]`, inclusive on both ends.
    pub async fn between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            "SELECT id, employee_id, transaction_date, note FROM transactions \
             WHERE transaction_date >= ?1 AND transaction_date <= ?2 \
             ORDER BY transaction_date, id",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(transactions)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{date, memory_db, persisted_employee, persisted_product};

    #[tokio::test]
    async fn test_insert_with_items_persists_parent_and_lines() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let cola = persisted_product(&db, "Cola 330ml").await;
        let water = persisted_product(&db, "Mineral Water").await;

        let mut checkout = Transaction::new(employee.id, date(2025, 7, 1));
        let lines = vec![
            TransactionItem::new(cola.id, 2).unwrap(),
            TransactionItem::new(water.id, 6).unwrap(),
        ];

        let persisted = db
            .transactions()
            .insert_with_items(&mut checkout, &lines)
            .await
            .unwrap();

        assert!(checkout.id > 0);
        assert!(persisted.iter().all(|l| l.transaction_id == checkout.id));

        let read = db.transactions().items(checkout.id).await.unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read, persisted);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_the_whole_checkout() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let cola = persisted_product(&db, "Cola 330ml").await;

        let mut checkout = Transaction::new(employee.id, date(2025, 7, 1));
        let lines = vec![
            TransactionItem::new(cola.id, 2).unwrap(),
            TransactionItem::new(4242, 1).unwrap(), // never persisted
        ];

        let err = db
            .transactions()
            .insert_with_items(&mut checkout, &lines)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // no half-written checkout: parent row rolled back too
        assert!(db.transactions().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_line_requires_persisted_transaction() {
        let db = memory_db().await;
        let cola = persisted_product(&db, "Cola 330ml").await;

        let line = TransactionItem::new(cola.id, 1).unwrap();
        let err = db.transactions().add_item(4242, &line).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_same_product_twice_is_unique_violation() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let cola = persisted_product(&db, "Cola 330ml").await;

        let mut checkout = Transaction::new(employee.id, date(2025, 7, 1));
        db.transactions().insert(&mut checkout).await.unwrap();

        let line = TransactionItem::new(cola.id, 1).unwrap();
        db.transactions().add_item(checkout.id, &line).await.unwrap();

        let err = db
            .transactions()
            .add_item(checkout.id, &line)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_between_is_inclusive() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;

        for day in [date(2025, 7, 1), date(2025, 7, 31), date(2025, 8, 1)] {
            let mut checkout = Transaction::new(employee.id, day);
            db.transactions().insert(&mut checkout).await.unwrap();
        }

        let hits = db
            .transactions()
            .between(date(2025, 7, 1), date(2025, 7, 31))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }
}
