//! # backroom-db: Database Layer for Backroom
//!
//! This crate provides database access for the Backroom staff-management
//! system. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Backroom Data Flow                               │
//! │                                                                         │
//! │  Caller (UI action, seed tool, test)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    backroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (employee.rs) │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ EmployeeRepo  │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ ProductRepo   │    │              │  │   │
//! │  │   │ Management    │    │ TaskRepo …    │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                               │ generic core                   │   │
//! │  │                        ┌──────▼───────┐                        │   │
//! │  │                        │  Repo<T> +   │                        │   │
//! │  │                        │ Record trait │  (record.rs)           │   │
//! │  │                        └──────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  ./backroom.db (configurable)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration, repository access
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`record`] - The generic `Repo<T>` CRUD core and `Record` trait
//! - [`repository`] - Per-entity repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backroom_db::{Database, DbConfig};
//!
//! let config = DbConfig::load_or_init("./")?;
//! let db = Database::new(config).await?;
//!
//! let mut employee = Employee::new(
//!     "Jan", "Kowalski", "jan@example.com", "Cashier",
//!     Money::from_cents(400_000), hired_on,
//! )?;
//! db.employees().insert(&mut employee).await?;
//!
//! let overloaded = db.employees().workload(from, to).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod record;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use record::{Record, Repo, SoftDelete};

// Repository re-exports for convenience
pub use repository::absence::AbsenceRepository;
pub use repository::address::AddressRepository;
pub use repository::employee::EmployeeRepository;
pub use repository::issue::IssueRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::stock::StockRepository;
pub use repository::task::TaskRepository;
pub use repository::token::TokenRepository;
pub use repository::transaction::TransactionRepository;
