//! # Report Repository
//!
//! Database operations for generated-report records. Rendering the files
//! is a collaborator's job; this table is the audit trail of what was
//! generated, when, and by whom.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use backroom_core::Report;

use crate::error::DbResult;
use crate::record::{Record, Repo, SqliteQuery};

const SELECT: &str = "SELECT id, report_type, generated_at, file_name, author_id FROM reports";

impl Record for Report {
    const TABLE: &'static str = "reports";
    const COLUMNS: &'static [&'static str] =
        &["report_type", "generated_at", "file_name", "author_id"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.report_type.clone())
            .bind(self.generated_at)
            .bind(self.file_name.clone())
            .bind(self.author_id)
    }
}

/// Repository for report-record database operations.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    repo: Repo<Report>,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository {
            repo: Repo::new(pool),
        }
    }

    /// Inserts a detached report record and assigns its id.
    pub async fn insert(&self, report: &mut Report) -> DbResult<()> {
        self.repo.insert(report).await
    }

    /// Gets a report record by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Report>> {
        self.repo.fetch(id).await
    }

    /// Lists all report records.
    pub async fn list(&self) -> DbResult<Vec<Report>> {
        self.repo.fetch_all().await
    }

    /// Hard-deletes a report record by id.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        self.repo.delete(id).await
    }

    /// Records of one report kind, newest first.
    pub async fn with_type(&self, report_type: &str) -> DbResult<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "{SELECT} WHERE report_type = ?1 ORDER BY generated_at DESC, id DESC"
        ))
        .bind(report_type)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(reports)
    }

    /// Records whose generation day lies inside `[from, to]`, inclusive.
    ///
    /// `generated_at` is a full timestamp; `date(...)` reduces it to the
    /// calendar day so both boundary days count.
    pub async fn between(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "{SELECT} WHERE date(generated_at) >= ?1 AND date(generated_at) <= ?2 \
             ORDER BY generated_at, id"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(self.repo.pool())
        .await?;

        Ok(reports)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::{date, memory_db, persisted_employee};
    use chrono::{DateTime, Utc};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_roundtrip_keeps_derived_file_name() {
        let db = memory_db().await;
        let author = persisted_employee(&db, "jan@example.com").await;

        let mut report =
            Report::new("Monthly Sales", at("2026-08-30T14:15:00Z"), Some(author.id)).unwrap();
        db.reports().insert(&mut report).await.unwrap();

        let stored = db.reports().get(report.id).await.unwrap().unwrap();
        assert_eq!(stored.file_name, "monthly_sales_20260830_141500.pdf");
        assert_eq!(stored.author_id, Some(author.id));
    }

    #[tokio::test]
    async fn test_between_covers_boundary_days() {
        let db = memory_db().await;

        // end-of-day timestamps on the boundary days must still count
        let stamps = [
            at("2026-07-01T00:00:01Z"),
            at("2026-07-31T23:59:59Z"),
            at("2026-08-01T00:00:00Z"),
        ];
        for stamp in stamps {
            let mut report = Report::new("daily", stamp, None).unwrap();
            db.reports().insert(&mut report).await.unwrap();
        }

        let hits = db
            .reports()
            .between(date(2026, 7, 1), date(2026, 7, 31))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_with_type_newest_first() {
        let db = memory_db().await;

        for stamp in [at("2026-07-01T10:00:00Z"), at("2026-07-02T10:00:00Z")] {
            let mut report = Report::new("daily", stamp, None).unwrap();
            db.reports().insert(&mut report).await.unwrap();
        }
        let mut other = Report::new("audit", at("2026-07-03T10:00:00Z"), None).unwrap();
        db.reports().insert(&mut other).await.unwrap();

        let daily = db.reports().with_type("daily").await.unwrap();
        assert_eq!(daily.len(), 2);
        assert!(daily[0].generated_at > daily[1].generated_at);
    }
}
