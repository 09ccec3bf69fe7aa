//! # Task Repository
//!
//! Database operations for tasks and their employee assignments.
//!
//! ## Soft Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Task Lifecycle (is_active flag)                      │
//! │                                                                         │
//! │   insert ──► ACTIVE ◄──────────── restore ──────────── DELETED         │
//! │               │  ▲                                        ▲             │
//! │               │  └── get / list / for_employee see only ──┘ (hidden)    │
//! │               │                                                         │
//! │               └────────── soft_delete ────────────────────►            │
//! │                                                                         │
//! │   The row never leaves the table; assignments and workload history      │
//! │   stay intact while the task disappears from everyday listings.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::{Task, TaskAssignment, TaskStatus};

use crate::error::{DbError, DbResult};
use crate::record::{Record, Repo, SoftDelete, SqliteQuery};

const SELECT: &str =
    "SELECT id, name, description, status, task_date, duration_minutes, is_active FROM tasks";

impl Record for Task {
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "description",
        "status",
        "task_date",
        "duration_minutes",
        "is_active",
    ];
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
            .bind(self.description.clone())
            .bind(self.status)
            .bind(self.task_date)
            .bind(self.duration_minutes)
            .bind(self.is_active)
    }
}

impl SoftDelete for Task {}

/// Repository for task database operations.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    repo: Repo<Task>,
}

impl TaskRepository {
    /// Creates a new TaskRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TaskRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached task and assigns its id.
    pub async fn insert(&self, task: &mut Task) -> DbResult<()> {
        self.repo.insert(task).await
    }

    /// Gets an active task by id. Soft-deleted tasks come back as `None`.
    pub async fn get(&self, id: i64) -> DbResult<Option<Task>> {
        self.repo.fetch(id).await
    }

    /// Gets a task regardless of its soft-delete flag.
    pub async fn get_any(&self, id: i64) -> DbResult<Option<Task>> {
        self.repo.fetch_any(id).await
    }

    /// Lists active tasks.
    pub async fn list(&self) -> DbResult<Vec<Task>> {
        self.repo.fetch_all().await
    }

    /// Lists soft-deleted tasks.
    pub async fn list_deleted(&self) -> DbResult<Vec<Task>> {
        self.repo.fetch_deleted().await
    }

    /// Overwrites the stored task with the given one, matched by id.
    pub async fn update(&self, task: &Task) -> DbResult<()> {
        self.repo.update(task).await
    }

    /// Flags a task as deleted. It keeps its id, assignments and history,
    /// but vanishes from [`get`](Self::get) and [`list`](Self::list).
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        self.repo.soft_delete(id).await
    }

    /// Brings a soft-deleted task back into the active set.
    pub async fn restore(&self, id: i64) -> DbResult<()> {
        self.repo.restore(id).await
    }

    /// Active tasks in the given state.
    pub async fn with_status(&self, status: TaskStatus) -> DbResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "{SELECT} WHERE status = ?1 AND is_active = 1 ORDER BY task_date, id"
        ))
        .bind(status)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(tasks)
    }

    /// Active tasks dated inside `[from, to]`, inclusive on both ends.
    pub async fn between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "{SELECT} WHERE task_date >= ?1 AND task_date <= ?2 AND is_active = 1 \
             ORDER BY task_date, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(tasks)
    }

    /// Assigns an employee to a task.
    ///
    /// Both sides must already be persisted; assigning the same pair twice
    /// is a unique violation.
    pub async fn assign(&self, task_id: i64, employee_id: i64) -> DbResult<TaskAssignment> {
        debug!(task_id, employee_id, "Assigning employee to task");

        let assigned_at = Utc::now();
        sqlx::query(
            "INSERT INTO task_assignments (task_id, employee_id, assigned_at) VALUES (?1, ?2, ?3)",
        )
        .bind(task_id)
        .bind(employee_id)
        .bind(assigned_at)
        .execute(self.repo.pool())
        .await?;

        Ok(TaskAssignment {
            task_id,
            employee_id,
            assigned_at,
        })
    }

    /// Removes an assignment, keyed by the (task, employee) pair.
    pub async fn unassign(&self, task_id: i64, employee_id: i64) -> DbResult<()> {
        let result =
            sqlx::query("DELETE FROM task_assignments WHERE task_id = ?1 AND employee_id = ?2")
                .bind(task_id)
                .bind(employee_id)
                .execute(self.repo.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "task_assignments",
                format!("({task_id}, {employee_id})"),
            ));
        }

        Ok(())
    }

    /// The assignments attached to one task.
    pub async fn assignees(&self, task_id: i64) -> DbResult<Vec<TaskAssignment>> {
        let assignments = sqlx::query_as::<_, TaskAssignment>(
            "SELECT task_id, employee_id, assigned_at FROM task_assignments \
             WHERE task_id = ?1 ORDER BY employee_id",
        )
        .bind(task_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(assignments)
    }

    /// Active tasks assigned to one employee, soonest first.
    pub async fn for_employee(&self, employee_id: i64) -> DbResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT t.id, t.name, t.description, t.status, t.task_date, \
             t.duration_minutes, t.is_active \
             FROM tasks t \
             JOIN task_assignments ta ON ta.task_id = t.id \
             WHERE ta.employee_id = ?1 AND t.is_active = 1 \
             ORDER BY t.task_date, t.id",
        )
        .bind(employee_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(tasks)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{date, memory_db, persisted_employee};

    async fn persisted_task(db: &crate::pool::Database, name: &str, day: NaiveDate) -> Task {
        let mut task = Task::new(name, None, day, 60).unwrap();
        db.tasks().insert(&mut task).await.unwrap();
        task
    }

    #[tokio::test]
    async fn test_soft_delete_hides_then_restore_reveals() {
        let db = memory_db().await;
        let task = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        db.tasks().soft_delete(task.id).await.unwrap();

        // hidden from everyday reads, still addressable
        assert!(db.tasks().get(task.id).await.unwrap().is_none());
        assert!(db.tasks().list().await.unwrap().is_empty());
        let flagged = db.tasks().get_any(task.id).await.unwrap().unwrap();
        assert!(!flagged.is_active);
        assert_eq!(db.tasks().list_deleted().await.unwrap().len(), 1);

        db.tasks().restore(task.id).await.unwrap();
        assert!(db.tasks().get(task.id).await.unwrap().is_some());
        assert!(db.tasks().list_deleted().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_assignments() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let task = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        db.tasks().assign(task.id, employee.id).await.unwrap();
        db.tasks().soft_delete(task.id).await.unwrap();

        assert_eq!(db.tasks().assignees(task.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_assignment_is_unique_violation() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let task = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        db.tasks().assign(task.id, employee.id).await.unwrap();
        let err = db.tasks().assign(task.id, employee.id).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_assignment_requires_persisted_parents() {
        let db = memory_db().await;
        let task = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        let err = db.tasks().assign(task.id, 4242).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_for_employee_skips_soft_deleted_tasks() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;
        let keep = persisted_task(&db, "Shelving", date(2025, 7, 3)).await;
        let drop = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        db.tasks().assign(keep.id, employee.id).await.unwrap();
        db.tasks().assign(drop.id, employee.id).await.unwrap();
        db.tasks().soft_delete(drop.id).await.unwrap();

        let mine = db.tasks().for_employee(employee.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, keep.id);
    }

    #[tokio::test]
    async fn test_status_finder_tracks_updates() {
        let db = memory_db().await;
        let mut task = persisted_task(&db, "Stocktake", date(2025, 7, 2)).await;

        assert_eq!(db.tasks().with_status(TaskStatus::Open).await.unwrap().len(), 1);

        task.status = TaskStatus::Done;
        db.tasks().update(&task).await.unwrap();

        assert!(db.tasks().with_status(TaskStatus::Open).await.unwrap().is_empty());
        assert_eq!(db.tasks().with_status(TaskStatus::Done).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unassign_missing_pair_is_not_found() {
        let db = memory_db().await;
        let err = db.tasks().unassign(1, 2).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
