//! Repository trait for referral code storage.

use crate::domain::entities::{NewReferralCode, ReferralCode};
use crate::error::AppError;
use async_trait::async_trait;

/// Number of records returned by [`ReferralCodeRepository::find_top_by_usage`]
/// unless the store is configured otherwise.
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// Repository interface for referral codes.
///
/// The repository stores records and answers queries. It does not enforce
/// business rules: uniqueness checks, status transitions and usage
/// bookkeeping belong to
/// [`crate::application::services::ReferralCodeService`].
///
/// `find_all` and every other list query return records in ascending `id`
/// order unless documented otherwise.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReferralCodeRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryReferralCodeRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferralCodeRepository: Send + Sync {
    /// Inserts a new active record with a zero usage count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the store itself rejects a duplicate code.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_code: NewReferralCode) -> Result<ReferralCode, AppError>;

    /// Overwrites the mutable fields of an existing record and refreshes
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Conflict`] if the new code collides at store level.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save(&self, referral_code: &ReferralCode) -> Result<ReferralCode, AppError>;

    async fn find_all(&self) -> Result<Vec<ReferralCode>, AppError>;

    async fn find_active(&self) -> Result<Vec<ReferralCode>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ReferralCode>, AppError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ReferralCode>, AppError>;

    /// Finds a record by exact code, only if it is active.
    async fn find_by_code_and_active(&self, code: &str)
    -> Result<Option<ReferralCode>, AppError>;

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Removes a record entirely. Deleting a missing id is a no-op.
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;

    /// Case-insensitive substring match on `owner_name`.
    async fn find_by_owner_name_containing_ignore_case(
        &self,
        owner_name: &str,
    ) -> Result<Vec<ReferralCode>, AppError>;

    /// Records ordered by `usage_count` descending, ties broken by ascending
    /// `id`, truncated to the store's configured limit.
    async fn find_top_by_usage(&self) -> Result<Vec<ReferralCode>, AppError>;

    async fn find_by_usage_count_greater_than_or_equal(
        &self,
        min_usage: i32,
    ) -> Result<Vec<ReferralCode>, AppError>;

    /// Sum of `usage_count` over all records, `None` when the store has no
    /// rows to aggregate.
    async fn sum_usage_count(&self) -> Result<Option<i64>, AppError>;

    async fn count_all(&self) -> Result<i64, AppError>;

    async fn count_active(&self) -> Result<i64, AppError>;
}
