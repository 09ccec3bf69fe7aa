//! # Password Reset Token Repository
//!
//! Issues and redeems one-time password-reset tokens. Token values are
//! random v4 UUIDs; validity is "unused and unexpired" at redemption time.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use backroom_core::PasswordResetToken;

use crate::error::{DbError, DbResult};
use crate::record::{Record, Repo, SqliteQuery};

const SELECT: &str = "SELECT id, employee_id, token, created_at, expires_at, used \
                      FROM password_reset_tokens";

impl Record for PasswordResetToken {
    const TABLE: &'static str = "password_reset_tokens";
    const COLUMNS: &'static [&'static str] =
        &["employee_id", "token", "created_at", "expires_at", "used"];

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn bind_columns<'q>(&self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.employee_id)
            .bind(self.token.clone())
            .bind(self.created_at)
            .bind(self.expires_at)
            .bind(self.used)
    }
}

/// Repository for password-reset-token database operations.
#[derive(Debug, Clone)]
pub struct TokenRepository {
    repo: Repo<PasswordResetToken>,
}

impl TokenRepository {
    /// Creates a new TokenRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TokenRepository {
            repo: Repo::new(pool),
        }
    }

    /// Issues a fresh token for an employee, valid for the standard TTL
    /// from `now`. The token value is a random v4 UUID.
    pub async fn issue(&self, employee_id: i64, now: DateTime<Utc>) -> DbResult<PasswordResetToken> {
        let mut token = PasswordResetToken::new(employee_id, Uuid::new_v4().to_string(), now);
        self.repo.insert(&mut token).await?;

        debug!(employee_id, token_id = token.id, "Issued password reset token");
        Ok(token)
    }

    /// Gets a token by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<PasswordResetToken>> {
        self.repo.fetch(id).await
    }

    /// Looks up a token by its value, returning it only while it is still
    /// redeemable (unused and unexpired at `now`).
    pub async fn find_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<PasswordResetToken>> {
        let found = sqlx::query_as::<_, PasswordResetToken>(&format!(
            "{SELECT} WHERE token = ?1 AND used = 0 AND expires_at > ?2"
        ))
        .bind(token)
        .bind(now)
        .fetch_optional(self.repo.pool())
        .await?;

        Ok(found)
    }

    /// Redeems a token. Redeeming twice fails with `NotFound`: the second
    /// attempt no longer matches an unused row.
    pub async fn mark_used(&self, id: i64) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE id = ?1 AND used = 0")
                .bind(id)
                .execute(self.repo.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("password_reset_tokens", id));
        }

        Ok(())
    }

    /// Deletes tokens that expired before `now`. Returns how many went.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= ?1")
            .bind(now)
            .execute(self.repo.pool())
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            debug!(purged, "Purged expired reset tokens");
        }
        Ok(purged)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
