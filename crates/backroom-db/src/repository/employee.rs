//! # Employee Repository
//!
//! Database operations for staff records.
//!
//! ## Key Operations
//! - CRUD via the generic core
//! - Case-insensitive name search, email lookup
//! - Workload aggregation across task assignments
//!
//! ## Workload Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How workload(from, to) Works                            │
//! │                                                                         │
//! │  tasks                     task_assignments         employees          │
//! │  ┌──────────────────┐      ┌──────────────────┐     ┌─────────┐        │
//! │  │ id, task_date,   │◄─────│ task_id,         │────►│ id,     │        │
//! │  │ duration_minutes │      │ employee_id      │     │ name…   │        │
//! │  └──────────────────┘      └──────────────────┘     └─────────┘        │
//! │                                                                         │
//! │  1. keep tasks with from <= task_date <= to (inclusive)                │
//! │  2. SUM(duration_minutes) over each employee's assignments             │
//! │  3. convert to hours, ROUND(…, 2)                                      │
//! │                                                                         │
//! │  → one WorkloadEntry per employee with at least one assignment         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::{Employee, WorkloadEntry};

use crate::error::DbResult;
use crate::record::{Record, Repo, SqliteQuery};

impl Record for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone",
        "position",
        "salary_cents",
        "address_id",
        "hired_on",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.first_name.clone())
            .bind(self.last_name.clone())
            .bind(self.email.clone())
            .bind(self.phone.clone())
            .bind(self.position.clone())
            .bind(self.salary_cents())
            .bind(self.address_id)
            .bind(self.hired_on)
    }
}

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    repo: Repo<Employee>,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached employee; the store assigns the id.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - email already registered
    pub async fn insert(&self, employee: &mut Employee) -> DbResult<()> {
        self.repo.insert(employee).await
    }

    /// Gets an employee by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Employee>> {
        self.repo.fetch(id).await
    }

    /// Lists all employees.
    pub async fn list(&self) -> DbResult<Vec<Employee>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored employee with the given one, matched by id.
    pub async fn update(&self, employee: &Employee) -> DbResult<()> {
        self.repo.update(employee).await
    }

    /// Physically deletes an employee.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// Looks an employee up by their unique email.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, first_name, last_name, email, phone, position, salary_cents, \
             address_id, hired_on \
             FROM employees WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(self.repo.pool())
        .await?;

        Ok(employee)
    }

    /// Case-insensitive substring search over full names.
    ///
    /// An empty query returns everyone, like an unfiltered listing.
    pub async fn search_by_name(&self, query: &str) -> DbResult<Vec<Employee>> {
        debug!(query = %query, "Searching employees");

        let pattern = format!("%{}%", query.trim().to_lowercase());
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, first_name, last_name, email, phone, position, salary_cents, \
             address_id, hired_on \
             FROM employees \
             WHERE lower(first_name || ' ' || last_name) LIKE ?1 \
             ORDER BY last_name, first_name",
        )
        .bind(pattern)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(employees)
    }

    /// Per-employee workload inside an inclusive date range.
    ///
    /// Sums `duration_minutes` of every task assigned to the employee whose
    /// `task_date` lies within `[from, to]`, converted to hours rounded to
    /// two decimals. Employees without assignments in range don't appear.
    /// Soft-deleted tasks still count: the work was scheduled either way.
    pub async fn workload(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<WorkloadEntry>> {
        debug!(from = %from, to = %to, "Aggregating workload");

        let entries = sqlx::query_as::<_, WorkloadEntry>(
            "SELECT e.id AS employee_id, e.first_name, e.last_name, \
             ROUND(CAST(SUM(t.duration_minutes) AS REAL) / 60.0, 2) AS hours \
             FROM employees e \
             JOIN task_assignments ta ON ta.employee_id = e.id \
             JOIN tasks t ON t.id = ta.task_id \
             WHERE t.task_date >= ?1 AND t.task_date <= ?2 \
             GROUP BY e.id, e.first_name, e.last_name \
             ORDER BY hours DESC, e.id",
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use backroom_core::{Money, Task};

    use crate::error::DbError;
    use crate::repository::testing::{date, memory_db, persisted_employee};

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let db = memory_db().await;

        let employee = persisted_employee(&db, "jan@example.com").await;
        assert!(employee.id > 0);

        let found = db.employees().get(employee.id).await.unwrap().unwrap();
        assert_eq!(found, employee);
        assert_eq!(found.salary().cents(), 400_000);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let db = memory_db().await;

        persisted_employee(&db, "jan@example.com").await;

        let mut twin = Employee::new(
            "Janina",
            "Kowalska",
            "jan@example.com",
            "Manager",
            Money::from_cents(500_000),
            date(2024, 2, 1),
        )
        .unwrap();
        let err = db.employees().insert(&mut twin).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_preserves_untouched_fields() {
        let db = memory_db().await;
        let mut employee = persisted_employee(&db, "jan@example.com").await;

        employee.set_salary(Money::from_cents(450_000)).unwrap();
        employee.position = "Shift Lead".to_string();
        db.employees().update(&employee).await.unwrap();

        let found = db.employees().get(employee.id).await.unwrap().unwrap();
        assert_eq!(found.salary_cents(), 450_000);
        assert_eq!(found.position, "Shift Lead");
        assert_eq!(found.first_name, "Jan");
        assert_eq!(found.hired_on, date(2024, 1, 15));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;

        let found = db
            .employees()
            .find_by_email("jan@example.com")
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.id), Some(employee.id));

        assert!(db
            .employees()
            .find_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_search_by_name_is_case_insensitive() {
        let db = memory_db().await;
        persisted_employee(&db, "jan@example.com").await;

        let hits = db.employees().search_by_name("KOWAL").await.unwrap();
        assert_eq!(hits.len(), 1);

        let misses = db.employees().search_by_name("nowak").await.unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_workload_sums_groups_and_rounds() {
        let db = memory_db().await;
        let jan = persisted_employee(&db, "jan@example.com").await;
        let ala = persisted_employee(&db, "ala@example.com").await;

        let tasks = db.tasks();
        // 90 + 45 minutes in range for Jan, 45 for Ala, 600 out of range
        let specs = [
            ("Stocktake", date(2025, 7, 2), 90),
            ("Shelving", date(2025, 7, 3), 45),
            ("Inventory audit", date(2025, 8, 1), 600),
        ];
        let mut ids = Vec::new();
        for (name, day, minutes) in specs {
            let mut task = Task::new(name, None, day, minutes).unwrap();
            tasks.insert(&mut task).await.unwrap();
            ids.push(task.id);
        }
        tasks.assign(ids[0], jan.id).await.unwrap();
        tasks.assign(ids[1], jan.id).await.unwrap();
        tasks.assign(ids[1], ala.id).await.unwrap();
        tasks.assign(ids[2], jan.id).await.unwrap();

        let entries = db
            .employees()
            .workload(date(2025, 7, 1), date(2025, 7, 31))
            .await
            .unwrap();

        assert_eq!(entries.len(), 2);
        // Jan: (90 + 45) / 60 = 2.25 hours, sorted first
        assert_eq!(entries[0].employee_id, jan.id);
        assert_eq!(entries[0].hours, 2.25);
        // Ala: 45 / 60 = 0.75 hours
        assert_eq!(entries[1].employee_id, ala.id);
        assert_eq!(entries[1].hours, 0.75);
    }

    #[tokio::test]
    async fn test_workload_empty_range_is_empty_vec() {
        let db = memory_db().await;
        persisted_employee(&db, "jan@example.com").await;

        let entries = db
            .employees()
            .workload(date(2030, 1, 1), date(2030, 1, 31))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
