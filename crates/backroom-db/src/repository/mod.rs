//! # Repository Module
//!
//! Database repository implementations for Backroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern, Generically                      │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.absences().overlapping(from, to)                           │
//! │       ▼                                                                 │
//! │  AbsenceRepository            ── domain finders live here              │
//! │       │ wraps                                                           │
//! │       ▼                                                                 │
//! │  Repo<AbsenceRequest>         ── uniform CRUD lives here, once         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • add/find/list/update/remove written exactly once                    │
//! │  • SQL isolated in one crate                                           │
//! │  • soft-delete filtering applied uniformly, not per query              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`address::AddressRepository`] - plain CRUD (thinnest wrapper)
//! - [`employee::EmployeeRepository`] - staff, search, workload aggregation
//! - [`product::ProductRepository`] - catalogue with soft delete
//! - [`stock::StockRepository`] - warehouse quantities, delta adjustments
//! - [`order::OrderRepository`] - restocking orders
//! - [`transaction::TransactionRepository`] - checkouts + quantity lines
//! - [`absence::AbsenceRepository`] - leave requests, range/overlap finders
//! - [`task::TaskRepository`] - tasks, assignments, soft delete
//! - [`issue::IssueRepository`] - technical issues
//! - [`report::ReportRepository`] - generated report records
//! - [`token::TokenRepository`] - password-reset tokens

pub mod absence;
pub mod address;
pub mod employee;
pub mod issue;
pub mod order;
pub mod product;
pub mod report;
pub mod stock;
pub mod task;
pub mod token;
pub mod transaction;

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for repository tests.

    use backroom_core::{Employee, Money, Product};
    use chrono::NaiveDate;

    use crate::pool::{Database, DbConfig};

    /// A fresh, fully migrated in-memory database.
    pub(crate) async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Inserts and returns a persisted employee.
    pub(crate) async fn persisted_employee(db: &Database, email: &str) -> Employee {
        let mut employee = Employee::new(
            "Jan",
            "Kowalski",
            email,
            "Cashier",
            Money::from_cents(400_000),
            date(2024, 1, 15),
        )
        .unwrap();
        db.employees().insert(&mut employee).await.unwrap();
        employee
    }

    /// Inserts and returns a persisted product.
    pub(crate) async fn persisted_product(db: &Database, name: &str) -> Product {
        let mut product = Product::new(name, None, Money::from_cents(299)).unwrap();
        db.products().insert(&mut product).await.unwrap();
        product
    }
}
