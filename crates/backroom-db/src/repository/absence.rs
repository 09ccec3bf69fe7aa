//! # Absence Repository
//!
//! Database operations for absence requests: CRUD plus the status and
//! date-range finders the review workflow needs.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use backroom_core::{AbsenceRequest, RequestStatus};

use crate::error::DbResult;
use crate::record::{Record, Repo, SqliteQuery};

const SELECT: &str =
    "SELECT id, employee_id, start_date, end_date, status, reason FROM absence_requests";

impl Record for AbsenceRequest {
    const TABLE: &'static str = "absence_requests";
    const COLUMNS: &'static [&'static str] =
        &["employee_id", "start_date", "end_date", "status", "reason"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.employee_id)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.status)
            .bind(self.reason.clone())
    }
}

/// Repository for absence-request database operations.
#[derive(Debug, Clone)]
pub struct AbsenceRepository {
    repo: Repo<AbsenceRequest>,
}

impl AbsenceRepository {
    /// Creates a new AbsenceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AbsenceRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached request and assigns its id.
    pub async fn insert(&self, request: &mut AbsenceRequest) -> DbResult<()> {
        self.repo.insert(request).await
    }

    /// Gets a request by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<AbsenceRequest>> {
        self.repo.fetch(id).await
    }

    /// Lists all requests.
    pub async fn list(&self) -> DbResult<Vec<AbsenceRequest>> {
        self.repo.fetch_all().await
    }

    /// Overwrites the stored request with the given one, matched by id.
    ///
    /// The review workflow drives status changes through this: load, flip
    /// the status to `Accepted` or `Rejected`, write back.
    pub async fn update(&self, request: &AbsenceRequest) -> DbResult<()> {
        self.repo.update(request).await
    }

    /// Hard-deletes a request by id.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// All requests filed by one employee.
    pub async fn for_employee(&self, employee_id: i64) -> DbResult<Vec<AbsenceRequest>> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "{SELECT} WHERE employee_id = ?1 ORDER BY start_date, id"
        ))
        .bind(employee_id)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(requests)
    }

    /// Requests currently in the given review state.
    pub async fn with_status(&self, status: RequestStatus) -> DbResult<Vec<AbsenceRequest>> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "{SELECT} WHERE status = ?1 ORDER BY start_date, id"
        ))
        .bind(status)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(requests)
    }

    /// Requests starting inside `[from, to]`, inclusive on both ends.
    pub async fn between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<AbsenceRequest>> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "{SELECT} WHERE start_date >= ?1 AND start_date <= ?2 ORDER BY start_date, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(requests)
    }

    /// Requests whose interval intersects `[from, to]`, inclusive on both
    /// ends. Mirrors [`AbsenceRequest::overlaps`] in SQL.
    pub async fn overlapping(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<AbsenceRequest>> {
        let requests = sqlx::query_as::<_, AbsenceRequest>(&format!(
            "{SELECT} WHERE start_date <= ?2 AND end_date >= ?1 ORDER BY start_date, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(requests)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{date, memory_db, persisted_employee};

    async fn persisted_request(
        db: &crate::pool::Database,
        employee_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AbsenceRequest {
        let mut request = AbsenceRequest::new(employee_id, start, end, None).unwrap();
        db.absences().insert(&mut request).await.unwrap();
        request
    }

    #[tokio::test]
    async fn test_review_workflow_pending_to_accepted() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;

        let mut request = persisted_request(
            &db,
            employee.id,
            date(2025, 7, 1),
            date(2025, 7, 10),
        )
        .await;
        assert_eq!(request.status, RequestStatus::Pending);

        let pending = db.absences().with_status(RequestStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);

        request.status = RequestStatus::Accepted;
        db.absences().update(&request).await.unwrap();

        assert!(db
            .absences()
            .with_status(RequestStatus::Pending)
            .await
            .unwrap()
            .is_empty());
        let accepted = db.absences().with_status(RequestStatus::Accepted).await.unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].id, request.id);
    }

    #[tokio::test]
    async fn test_overlapping_matches_boundary_touches() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;

        let july = persisted_request(&db, employee.id, date(2025, 7, 1), date(2025, 7, 10)).await;
        persisted_request(&db, employee.id, date(2025, 8, 1), date(2025, 8, 5)).await;

        // window ends exactly on the request's first day
        let hits = db
            .absences()
            .overlapping(date(2025, 6, 20), date(2025, 7, 1))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, july.id);

        // disjoint window between the two requests
        assert!(db
            .absences()
            .overlapping(date(2025, 7, 11), date(2025, 7, 31))
            .await
            .unwrap()
            .is_empty());

        // window spanning both
        let both = db
            .absences()
            .overlapping(date(2025, 7, 5), date(2025, 8, 2))
            .await
            .unwrap();
        assert_eq!(both.len(), 2);
    }

    #[tokio::test]
    async fn test_between_is_inclusive_on_start_date() {
        let db = memory_db().await;
        let employee = persisted_employee(&db, "jan@example.com").await;

        for start in [date(2025, 7, 1), date(2025, 7, 31), date(2025, 8, 1)] {
            persisted_request(&db, employee.id, start, start).await;
        }

        let hits = db
            .absences()
            .between(date(2025, 7, 1), date(2025, 7, 31))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_for_employee_filters_by_owner() {
        let db = memory_db().await;
        let jan = persisted_employee(&db, "jan@example.com").await;
        let anna = persisted_employee(&db, "anna@example.com").await;

        persisted_request(&db, jan.id, date(2025, 7, 1), date(2025, 7, 2)).await;
        persisted_request(&db, anna.id, date(2025, 7, 3), date(2025, 7, 4)).await;

        let mine = db.absences().for_employee(jan.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].employee_id, jan.id);
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let db = memory_db().await;
        let err = db.absences().remove(4242).await.unwrap_err();
        assert!(matches!(err, crate::error::DbError::NotFound { .. }));
    }
}
