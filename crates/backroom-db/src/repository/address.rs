//! Address repository: the thinnest wrapper over the generic core, and the
//! reference example for wiring a [`Record`] implementation.

use sqlx::SqlitePool;

use backroom_core::Address;

use crate::error::DbResult;
use crate::record::{Record, Repo, SqliteQuery};

impl Record for Address {
    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &["street", "city", "postal_code", "country"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.street.clone())
            .bind(self.city.clone())
            .bind(self.postal_code.clone())
            .bind(self.country.clone())
    }
}

/// Repository for address database operations.
#[derive(Debug, Clone)]
pub struct AddressRepository {
    repo: Repo<Address>,
}

impl AddressRepository {
    /// Creates a new AddressRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddressRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached address; its id is assigned by the store.
    pub async fn insert(&self, address: &mut Address) -> DbResult<()> {
        self.repo.insert(address).await
    }

    /// Gets an address by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Address>> {
        self.repo.fetch(id).await
    }

    /// Lists all addresses.
    pub async fn list(&self) -> DbResult<Vec<Address>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored address with the given one, matched by id.
    pub async fn update(&self, address: &Address) -> DbResult<()> {
        self.repo.update(address).await
    }

    /// Physically deletes an address.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::testing::memory_db;

    // These tests double as the contract tests for the generic Repo<T>
    // CRUD, since AddressRepository adds nothing on top of it.

    #[tokio::test]
    async fn test_insert_assigns_positive_id_and_roundtrips() {
        let db = memory_db().await;
        let repo = db.addresses();

        let mut address = Address::new("Polna 1", "Warszawa", "00-001", "PL");
        assert_eq!(address.id, 0);

        repo.insert(&mut address).await.unwrap();
        assert!(address.id > 0);

        let found = repo.get(address.id).await.unwrap().unwrap();
        assert_eq!(found, address);
    }

    #[tokio::test]
    async fn test_get_missing_is_none_not_error() {
        let db = memory_db().await;
        assert!(db.addresses().get(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let db = memory_db().await;
        let repo = db.addresses();

        let mut address = Address::new("Polna 1", "Warszawa", "00-001", "PL");
        repo.insert(&mut address).await.unwrap();

        address.city = "Kraków".to_string();
        repo.update(&address).await.unwrap();

        let found = repo.get(address.id).await.unwrap().unwrap();
        assert_eq!(found.city, "Kraków");
        // unchanged fields intact
        assert_eq!(found.street, "Polna 1");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = memory_db().await;

        let mut ghost = Address::new("Polna 1", "Warszawa", "00-001", "PL");
        ghost.id = 1234;
        let err = db.addresses().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove_then_get_is_none() {
        let db = memory_db().await;
        let repo = db.addresses();

        let mut address = Address::new("Polna 1", "Warszawa", "00-001", "PL");
        repo.insert(&mut address).await.unwrap();

        repo.remove(address.id).await.unwrap();
        assert!(repo.get(address.id).await.unwrap().is_none());

        // removing again reports not-found instead of silently succeeding
        let err = repo.remove(address.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_returns_all_in_id_order() {
        let db = memory_db().await;
        let repo = db.addresses();

        for city in ["Warszawa", "Kraków", "Gdańsk"] {
            let mut address = Address::new("Polna 1", city, "00-001", "PL");
            repo.insert(&mut address).await.unwrap();
        }

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));
    }
}
