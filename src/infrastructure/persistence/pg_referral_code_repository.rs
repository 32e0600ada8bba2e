//! PostgreSQL implementation of the referral code repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewReferralCode, ReferralCode};
use crate::domain::repositories::{DEFAULT_TOP_LIMIT, ReferralCodeRepository};
use crate::error::AppError;
use serde_json::json;

const COLUMNS: &str = "id, code, owner_name, is_active, usage_count, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ReferralCodeRow {
    id: i64,
    code: String,
    owner_name: String,
    is_active: bool,
    usage_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReferralCodeRow> for ReferralCode {
    fn from(r: ReferralCodeRow) -> Self {
        ReferralCode::new(
            r.id,
            r.code,
            r.owner_name,
            r.is_active,
            r.usage_count,
            r.created_at,
            r.updated_at,
        )
    }
}

/// PostgreSQL repository for referral codes.
///
/// The `referral_codes` table has a UNIQUE constraint on `code`, so a create
/// racing past the service-level existence check fails with
/// [`AppError::Conflict`] instead of storing a duplicate.
pub struct PgReferralCodeRepository {
    pool: Arc<PgPool>,
    top_limit: usize,
}

impl PgReferralCodeRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    /// Sets how many records `find_top_by_usage` returns.
    pub fn with_top_limit(mut self, top_limit: usize) -> Self {
        self.top_limit = top_limit;
        self
    }

    async fn fetch_list(&self, sql: &str) -> Result<Vec<ReferralCode>, AppError> {
        let rows = sqlx::query_as::<_, ReferralCodeRow>(sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ReferralCode::from).collect())
    }
}

/// Escapes `LIKE` wildcards so the input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ReferralCodeRepository for PgReferralCodeRepository {
    async fn insert(&self, new_code: NewReferralCode) -> Result<ReferralCode, AppError> {
        let row = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            r#"
            INSERT INTO referral_codes (code, owner_name, is_active, usage_count)
            VALUES ($1, $2, TRUE, 0)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_code.code)
        .bind(&new_code.owner_name)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn save(&self, referral_code: &ReferralCode) -> Result<ReferralCode, AppError> {
        let row = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            r#"
            UPDATE referral_codes SET
                code        = $2,
                owner_name  = $3,
                is_active   = $4,
                usage_count = $5,
                updated_at  = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(referral_code.id)
        .bind(&referral_code.code)
        .bind(&referral_code.owner_name)
        .bind(referral_code.is_active)
        .bind(referral_code.usage_count)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(ReferralCode::from).ok_or_else(|| {
            AppError::not_found("Referral code not found", json!({ "id": referral_code.id }))
        })
    }

    async fn find_all(&self) -> Result<Vec<ReferralCode>, AppError> {
        self.fetch_list(&format!("SELECT {COLUMNS} FROM referral_codes ORDER BY id"))
            .await
    }

    async fn find_active(&self) -> Result<Vec<ReferralCode>, AppError> {
        self.fetch_list(&format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE is_active = TRUE ORDER BY id"
        ))
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ReferralCode>, AppError> {
        let row = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ReferralCode::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ReferralCode>, AppError> {
        let row = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ReferralCode::from))
    }

    async fn find_by_code_and_active(
        &self,
        code: &str,
    ) -> Result<Option<ReferralCode>, AppError> {
        let row = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE code = $1 AND is_active = TRUE"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ReferralCode::from))
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM referral_codes WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM referral_codes WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM referral_codes WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn find_by_owner_name_containing_ignore_case(
        &self,
        owner_name: &str,
    ) -> Result<Vec<ReferralCode>, AppError> {
        let rows = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            r#"
            SELECT {COLUMNS} FROM referral_codes
            WHERE owner_name ILIKE '%' || $1 || '%'
            ORDER BY id
            "#
        ))
        .bind(escape_like(owner_name))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ReferralCode::from).collect())
    }

    async fn find_top_by_usage(&self) -> Result<Vec<ReferralCode>, AppError> {
        let limit = i64::try_from(self.top_limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            r#"
            SELECT {COLUMNS} FROM referral_codes
            ORDER BY usage_count DESC, id ASC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ReferralCode::from).collect())
    }

    async fn find_by_usage_count_greater_than_or_equal(
        &self,
        min_usage: i32,
    ) -> Result<Vec<ReferralCode>, AppError> {
        let rows = sqlx::query_as::<_, ReferralCodeRow>(&format!(
            "SELECT {COLUMNS} FROM referral_codes WHERE usage_count >= $1 ORDER BY id"
        ))
        .bind(min_usage)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ReferralCode::from).collect())
    }

    async fn sum_usage_count(&self) -> Result<Option<i64>, AppError> {
        // SUM over INTEGER yields BIGINT, NULL on an empty table.
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(usage_count) FROM referral_codes")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total)
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM referral_codes")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM referral_codes WHERE is_active = TRUE")
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("alice"), "alice");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
