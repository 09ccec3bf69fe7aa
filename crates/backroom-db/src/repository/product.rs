//! # Product Repository
//!
//! Database operations for the product catalogue.
//!
//! Products are soft-deleted: historical orders and transaction lines keep
//! referencing them, so `remove`-style hard deletion is not offered here at
//! all — callers get `soft_delete`/`restore` instead.

use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::Product;

use crate::error::DbResult;
use crate::record::{Record, Repo, SoftDelete, SqliteQuery};

impl Record for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &["name", "sku", "price_cents", "is_active"];
    const ACTIVE_PREDICATE: &'static str = "is_active = 1";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.clone())
            .bind(self.sku.clone())
            .bind(self.price_cents())
            .bind(self.is_active)
    }
}

impl SoftDelete for Product {}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// // Search the active catalogue
/// let results = repo.search("cola").await?;
///
/// // Hide a discontinued product, keep its history
/// repo.soft_delete(product.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    repo: Repo<Product>,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached product; the store assigns the id.
    pub async fn insert(&self, product: &mut Product) -> DbResult<()> {
        self.repo.insert(product).await
    }

    /// Gets an active product by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        self.repo.fetch(id).await
    }

    /// Gets a product by id regardless of its soft-delete flag.
    pub async fn get_any(&self, id: i64) -> DbResult<Option<Product>> {
        self.repo.fetch_any(id).await
    }

    /// Lists active products.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        self.repo.fetch_all().await
    }

    /// Lists soft-deleted products.
    pub async fn list_deleted(&self) -> DbResult<Vec<Product>> {
        self.repo.fetch_deleted().await
    }

    /// Overwrites the stored product with the given one, matched by id.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        self.repo.update(product).await
    }

    /// Hides a product from default listings, keeping the row.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        self.repo.soft_delete(id).await
    }

    /// Returns a soft-deleted product to the active catalogue.
    pub async fn restore(&self, id: i64) -> DbResult<()> {
        self.repo.restore(id).await
    }

    /// Case-insensitive substring search over active products' names and
    /// SKUs. An empty query returns the whole active catalogue.
    pub async fn search(&self, query: &str) -> DbResult<Vec<Product>> {
        debug!(query = %query, "Searching products");

        let pattern = format!("%{}%", query.trim().to_lowercase());
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, sku, price_cents, is_active FROM products \
             WHERE is_active = 1 \
             AND (lower(name) LIKE ?1 OR lower(coalesce(sku, '')) LIKE ?1) \
             ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(products)
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        self.repo.count().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use backroom_core::Money;

    use crate::repository::testing::{memory_db, persisted_product};

    #[tokio::test]
    async fn test_search_matches_name_and_sku_case_insensitively() {
        let db = memory_db().await;
        let repo = db.products();

        let mut cola = Product::new(
            "Cola 330ml",
            Some("COKE-330".into()),
            Money::from_cents(299),
        )
        .unwrap();
        repo.insert(&mut cola).await.unwrap();
        persisted_product(&db, "Mineral Water").await;

        assert_eq!(repo.search("COLA").await.unwrap().len(), 1);
        assert_eq!(repo.search("coke-3").await.unwrap().len(), 1);
        assert!(repo.search("pepsi").await.unwrap().is_empty());
        // empty query falls back to the full active catalogue
        assert_eq!(repo.search("").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_then_restore_brings_back() {
        let db = memory_db().await;
        let repo = db.products();
        let product = persisted_product(&db, "Cola 330ml").await;

        repo.soft_delete(product.id).await.unwrap();

        // gone from the default listing, the default lookup and search…
        assert!(repo.list().await.unwrap().is_empty());
        assert!(repo.get(product.id).await.unwrap().is_none());
        assert!(repo.search("cola").await.unwrap().is_empty());

        // …but still addressable, and listed as deleted
        assert!(repo.get_any(product.id).await.unwrap().is_some());
        let deleted = repo.list_deleted().await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].name, "Cola 330ml");

        repo.restore(product.id).await.unwrap();
        let back = repo.get(product.id).await.unwrap().unwrap();
        assert_eq!(back.name, product.name);
        assert_eq!(back.price_cents(), product.price_cents());
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
