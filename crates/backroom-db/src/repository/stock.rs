//! # Warehouse Stock Repository
//!
//! Database operations for per-location stock levels.
//!
//! ## Delta Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Stock Update Strategy                            │
//! │                                                                     │
//! │  ❌ Absolute update (races with concurrent sales):                 │
//! │     UPDATE stock_levels SET quantity = 7 WHERE id = ?              │
//! │                                                                     │
//! │  ✅ Delta update:                                                  │
//! │     UPDATE stock_levels SET quantity = quantity - 3                │
//! │                                                                     │
//! │  The schema's CHECK (quantity >= 0) turns an over-draining delta   │
//! │  into DbError::CheckViolation instead of negative stock.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::StockLevel;

use crate::error::{DbError, DbResult};
use crate::record::{Record, Repo, SqliteQuery};

impl Record for StockLevel {
    const TABLE: &'static str = "stock_levels";
    const COLUMNS: &'static [&'static str] = &["product_id", "quantity", "location"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.product_id)
            .bind(self.quantity())
            .bind(self.location.clone())
    }
}

/// Repository for warehouse stock operations.
#[derive(Debug, Clone)]
pub struct StockRepository {
    repo: Repo<StockLevel>,
}

impl StockRepository {
    /// Creates a new StockRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached stock row; the product must already be persisted.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - unknown product
    pub async fn insert(&self, stock: &mut StockLevel) -> DbResult<()> {
        self.repo.insert(stock).await
    }

    /// Gets a stock row by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<StockLevel>> {
        self.repo.fetch(id).await
    }

    /// Lists all stock rows.
    pub async fn list(&self) -> DbResult<Vec<StockLevel>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored stock row with the given one, matched by id.
    pub async fn update(&self, stock: &StockLevel) -> DbResult<()> {
        self.repo.update(stock).await
    }

    /// Physically deletes a stock row.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// All stock rows holding a given product, across locations.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Vec<StockLevel>> {
        let rows = sqlx::query_as::<_, StockLevel>(
            "SELECT id, product_id, quantity, location FROM stock_levels \
             WHERE product_id = ?1 ORDER BY location",
        )
        .bind(product_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(rows)
    }

    /// Adjusts a stock row by a delta (negative for issue, positive for
    /// restock).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no such row
    /// * `Err(DbError::CheckViolation)` - delta would drive quantity below 0
    pub async fn adjust(&self, id: i64, delta: i64) -> DbResult<()> {
        debug!(id = id, delta = delta, "Adjusting stock");

        let result = sqlx::query(
            "UPDATE stock_levels SET quantity = quantity + ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .execute(self.repo.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("stock_levels", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{memory_db, persisted_product};

    #[tokio::test]
    async fn test_stock_requires_persisted_product() {
        let db = memory_db().await;

        let mut orphan = StockLevel::new(4242, 10, "A-12").unwrap();
        let err = db.stock().insert(&mut orphan).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_adjust_applies_delta() {
        let db = memory_db().await;
        let product = persisted_product(&db, "Cola 330ml").await;

        let mut stock = StockLevel::new(product.id, 10, "A-12").unwrap();
        db.stock().insert(&mut stock).await.unwrap();

        db.stock().adjust(stock.id, -3).await.unwrap();
        db.stock().adjust(stock.id, 1).await.unwrap();

        let read = db.stock().get(stock.id).await.unwrap().unwrap();
        assert_eq!(read.quantity(), 8);
    }

    #[tokio::test]
    async fn test_adjust_below_zero_is_check_violation() {
        let db = memory_db().await;
        let product = persisted_product(&db, "Cola 330ml").await;

        let mut stock = StockLevel::new(product.id, 2, "A-12").unwrap();
        db.stock().insert(&mut stock).await.unwrap();

        let err = db.stock().adjust(stock.id, -5).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));

        // failed delta left the quantity untouched
        let read = db.stock().get(stock.id).await.unwrap().unwrap();
        assert_eq!(read.quantity(), 2);
    }

    #[tokio::test]
    async fn test_for_product_lists_every_location() {
        let db = memory_db().await;
        let product = persisted_product(&db, "Cola 330ml").await;

        for (qty, loc) in [(5, "A-01"), (7, "B-02")] {
            let mut stock = StockLevel::new(product.id, qty, loc).unwrap();
            db.stock().insert(&mut stock).await.unwrap();
        }

        let rows = db.stock().for_product(product.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "A-01");
    }
}
