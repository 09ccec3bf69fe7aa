//! # Generic Record Core
//!
//! One type-parameterized repository component instead of a copy-pasted
//! repository class per entity.
//!
//! ## How It Fits Together
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Generic Repository Core                             │
//! │                                                                         │
//! │  impl Record for Employee        ┌──────────────────────────────┐      │
//! │  ├── TABLE = "employees"         │          Repo<T>             │      │
//! │  ├── COLUMNS = [...]       ────► │  insert / fetch / fetch_all  │      │
//! │  ├── id() / set_id()             │  update / delete / count     │      │
//! │  └── bind_columns()              └──────────────┬───────────────┘      │
//! │                                                 │                      │
//! │  impl SoftDelete for Task                       ▼                      │
//! │  └── unlocks soft_delete /        EmployeeRepository, TaskRepository…  │
//! │      restore / fetch_deleted      wrap Repo<T> and add domain finders  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Delete, Centralized
//! Default listings apply [`Record::ACTIVE_PREDICATE`] uniformly. Entities
//! without a soft-delete flag keep the `1 = 1` default; soft-deletable ones
//! override it with `is_active = 1` and additionally implement
//! [`SoftDelete`], which unlocks the deleted-listing/restore operations on
//! their `Repo<T>`. No per-query predicate repetition.

use std::marker::PhantomData;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A ready-to-bind SQLite query, as produced by `sqlx::query`.
pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Record Trait
// =============================================================================

/// Maps an entity type onto its table.
///
/// Implemented once per entity, next to that entity's repository. The three
/// associated items plus the two bind hooks are everything `Repo<T>` needs
/// to run the uniform CRUD contract.
///
/// ## Example
/// ```rust,ignore
/// impl Record for Address {
///     const TABLE: &'static str = "addresses";
///     const COLUMNS: &'static [&'static str] =
///         &["street", "city", "postal_code", "country"];
///
///     fn id(&self) -> i64 { self.id }
///     fn set_id(&mut self, id: i64) { self.id = id; }
///
///     fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
///         query
///             .bind(self.street.clone())
///             .bind(self.city.clone())
///             .bind(self.postal_code.clone())
///             .bind(self.country.clone())
///     }
/// }
/// ```
pub trait Record: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin {
    /// Table name.
    const TABLE: &'static str;

    /// Data columns, in declaration order. The surrogate `id` column is
    /// implicit and always excluded: the store assigns it.
    const COLUMNS: &'static [&'static str];

    /// Predicate applied to default listings. Soft-deletable entities
    /// override this with `is_active = 1`.
    const ACTIVE_PREDICATE: &'static str = "1 = 1";

    /// Current surrogate id (0 while detached).
    fn id(&self) -> i64;

    /// Records the store-assigned id after a successful insert.
    fn set_id(&mut self, id: i64);

    /// Binds every data column in `COLUMNS` order.
    ///
    /// Used for both INSERT values and UPDATE assignments, so the order must
    /// match `COLUMNS` exactly.
    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

/// Marker for entities removed by flipping a flag instead of deleting rows.
///
/// Implementing this unlocks `soft_delete`, `restore` and `fetch_deleted`
/// on the entity's `Repo<T>`. Implementors must also override
/// [`Record::ACTIVE_PREDICATE`] so default listings exclude deleted rows.
pub trait SoftDelete: Record {
    /// The flag column; 1 = active, 0 = deleted.
    const FLAG_COLUMN: &'static str = "is_active";
}

// =============================================================================
// Generic Repository
// =============================================================================

/// Generic CRUD over one [`Record`] type.
///
/// Entity repositories wrap this and add their domain finders; the uniform
/// add/find/list/update/remove contract lives here exactly once.
#[derive(Debug, Clone)]
pub struct Repo<T> {
    pool: SqlitePool,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> Repo<T> {
    /// Creates a repository bound to a pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repo {
            pool,
            _entity: PhantomData,
        }
    }

    /// The underlying pool, for entity-specific finders.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// `"id, col1, col2, …"` — the full SELECT list.
    fn select_list() -> String {
        let mut columns = Vec::with_capacity(T::COLUMNS.len() + 1);
        columns.push("id");
        columns.extend_from_slice(T::COLUMNS);
        columns.join(", ")
    }

    /// `"?1, ?2, …"` — one placeholder per data column.
    fn placeholders() -> String {
        (1..=T::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Inserts a detached entity and records its store-assigned id.
    ///
    /// ## Returns
    /// * `Ok(())` - entity persisted, `entity.id()` now positive
    /// * `Err(DbError::UniqueViolation)` - a unique column collided
    /// * `Err(DbError::ForeignKeyViolation)` - a referenced parent is missing
    pub async fn insert(&self, entity: &mut T) -> DbResult<()> {
        debug!(table = T::TABLE, "Inserting record");

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            Self::placeholders()
        );

        let result = entity
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await?;

        entity.set_id(result.last_insert_rowid());
        Ok(())
    }

    /// Looks an entity up by its surrogate id.
    ///
    /// Applies the active-predicate, so a soft-deleted row reads as
    /// not-found here; use [`Repo::fetch_any`] when a restore flow needs to
    /// address it regardless.
    ///
    /// ## Returns
    /// * `Ok(Some(entity))` - found
    /// * `Ok(None)` - no such row (not an error)
    pub async fn fetch(&self, id: i64) -> DbResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1 AND {}",
            Self::select_list(),
            T::TABLE,
            T::ACTIVE_PREDICATE
        );

        let entity = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity)
    }

    /// Looks an entity up by id regardless of its soft-delete flag.
    ///
    /// Soft-deleted rows remain addressable by identity through this method
    /// so they can be inspected and restored.
    pub async fn fetch_any(&self, id: i64) -> DbResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            Self::select_list(),
            T::TABLE
        );

        let entity = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entity)
    }

    /// Default listing: all rows passing the active-predicate, by id.
    pub async fn fetch_all(&self) -> DbResult<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY id",
            Self::select_list(),
            T::TABLE,
            T::ACTIVE_PREDICATE
        );

        let entities = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(entities)
    }

    /// Overwrite-by-identity merge: every data column on the stored row is
    /// replaced by the incoming entity's fields.
    ///
    /// ## Returns
    /// * `Ok(())` - row updated
    /// * `Err(DbError::NotFound)` - no row with this id
    pub async fn update(&self, entity: &T) -> DbResult<()> {
        debug!(table = T::TABLE, id = entity.id(), "Updating record");

        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments,
            T::COLUMNS.len() + 1
        );

        let result = entity
            .bind_columns(sqlx::query(&sql))
            .bind(entity.id())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(T::TABLE, entity.id()));
        }

        Ok(())
    }

    /// Physically deletes a row.
    ///
    /// ## Returns
    /// * `Ok(())` - row deleted
    /// * `Err(DbError::NotFound)` - no row with this id
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(table = T::TABLE, id = id, "Deleting record");

        let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(T::TABLE, id));
        }

        Ok(())
    }

    /// Counts rows passing the active-predicate (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            T::TABLE,
            T::ACTIVE_PREDICATE
        );
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

// =============================================================================
// Soft-Delete Operations
// =============================================================================

impl<T: SoftDelete> Repo<T> {
    /// Hides a row from default listings by clearing its flag.
    ///
    /// The row and its associations survive; [`Repo::fetch_any`] still finds
    /// it and [`Repo::restore`] brings it back with fields intact.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(table = T::TABLE, id = id, "Soft-deleting record");
        self.set_flag(id, 0).await
    }

    /// Returns a soft-deleted row to the default listing.
    pub async fn restore(&self, id: i64) -> DbResult<()> {
        debug!(table = T::TABLE, id = id, "Restoring record");
        self.set_flag(id, 1).await
    }

    /// The deleted listing: rows hidden from `fetch_all`, by id.
    pub async fn fetch_deleted(&self) -> DbResult<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = 0 ORDER BY id",
            Self::select_list(),
            T::TABLE,
            T::FLAG_COLUMN
        );

        let entities = sqlx::query_as::<_, T>(&sql).fetch_all(self.pool()).await?;
        Ok(entities)
    }

    async fn set_flag(&self, id: i64, value: i64) -> DbResult<()> {
        let sql = format!(
            "UPDATE {} SET {} = ?2 WHERE id = ?1",
            T::TABLE,
            T::FLAG_COLUMN
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(value)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(T::TABLE, id));
        }

        Ok(())
    }
}
