//! # Technical Issue Repository
//!
//! Database operations for reported technical issues: CRUD, a status
//! finder, and the resolve shortcut the support workflow uses.

use sqlx::SqlitePool;
use tracing::debug;

use backroom_core::{IssueStatus, TechnicalIssue};

use crate::error::{DbError, DbResult};
use crate::record::{Record, Repo, SqliteQuery};

const SELECT: &str =
    "SELECT id, employee_id, title, description, reported_at, status FROM technical_issues";

impl Record for TechnicalIssue {
    const TABLE: &'static str = "technical_issues";
    const COLUMNS: &'static [&'static str] =
        &["employee_id", "title", "description", "reported_at", "status"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.employee_id)
            .bind(self.title.clone())
            .bind(self.description.clone())
            .bind(self.reported_at)
            .bind(self.status)
    }
}

/// Repository for technical-issue database operations.
#[derive(Debug, Clone)]
pub struct IssueRepository {
    repo: Repo<TechnicalIssue>,
}

impl IssueRepository {
    /// Creates a new IssueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IssueRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached issue and assigns its id.
    pub async fn insert(&self, issue: &mut TechnicalIssue) -> DbResult<()> {
        self.repo.insert(issue).await
    }

    /// Gets an issue by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<TechnicalIssue>> {
        self.repo.fetch(id).await
    }

    /// Lists all issues.
    pub async fn list(&self) -> DbResult<Vec<TechnicalIssue>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored issue with the given one, matched by id.
    pub async fn update(&self, issue: &TechnicalIssue) -> DbResult<()> {
        self.repo.update(issue).await
    }

    /// Hard-deletes an issue by id.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// Issues reported by one employee.
    pub async fn for_employee(&self, employee_id: i64) -> DbResult<Vec<TechnicalIssue>> {
        let issues = sqlx::query_as::<_, TechnicalIssue>(&format!(
            "{SELECT} WHERE employee_id = ?1 ORDER BY reported_at, id"
        ))
        .bind(employee_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(issues)
    }

    /// Issues currently in the given handling state.
    pub async fn with_status(&self, status: IssueStatus) -> DbResult<Vec<TechnicalIssue>> {
        let issues = sqlx::query_as::<_, TechnicalIssue>(&format!(
            "{SELECT} WHERE status = ?1 ORDER BY reported_at, id"
        ))
        .bind(status)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(issues)
    }

    /// Moves an issue straight to `Resolved` without a load-modify-write
    /// round trip.
    pub async fn resolve(&self, id: i64) -> DbResult<()> {
        debug!(id, "Resolving issue");

        let result = sqlx::query("UPDATE technical_issues SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(IssueStatus::Resolved)
            .execute(self.repo.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("technical_issues", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
