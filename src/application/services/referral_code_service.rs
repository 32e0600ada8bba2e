//! Referral code management service.

use std::sync::Arc;

use crate::domain::entities::{NewReferralCode, ReferralCode, ReferralCodeStats};
use crate::domain::repositories::ReferralCodeRepository;
use crate::error::AppError;
use serde_json::json;

/// Codes created by [`ReferralCodeService::seed_defaults`], as `(code, owner)`.
pub const DEFAULT_REFERRAL_CODES: [(&str, &str); 7] = [
    ("riddhima226100", "Riddhima"),
    ("pawan226100", "Pawan"),
    ("aayushmaan226100", "Aayushmaan"),
    ("priya226100", "Priya"),
    ("rahul226100", "Rahul"),
    ("neha226100", "Neha"),
    ("vikram226100", "Vikram"),
];

/// Service owning all business rules for referral codes.
///
/// Enforces:
/// - Global uniqueness of `code` (checked before insert and before a
///   code-changing update)
/// - Active/inactive transitions
/// - Usage count bookkeeping
///
/// The uniqueness check and the write are separate store calls. Two
/// concurrent creates of the same code can both pass the check; the
/// PostgreSQL store closes that gap with a unique constraint.
pub struct ReferralCodeService<R: ReferralCodeRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ReferralCodeRepository + ?Sized> ReferralCodeService<R> {
    /// Creates a new referral code service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a new active referral code with zero usage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create_referral_code(
        &self,
        new_code: NewReferralCode,
    ) -> Result<ReferralCode, AppError> {
        if self.repository.exists_by_code(&new_code.code).await? {
            return Err(already_exists(&new_code.code));
        }

        let created = self.repository.insert(new_code).await?;
        tracing::info!(id = created.id, code = %created.code, "Referral code created");

        Ok(created)
    }

    /// Lists every referral code in store order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all(&self) -> Result<Vec<ReferralCode>, AppError> {
        self.repository.find_all().await
    }

    /// Lists active referral codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_active(&self) -> Result<Vec<ReferralCode>, AppError> {
        self.repository.find_active().await
    }

    /// Retrieves a referral code by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_by_id(&self, id: i64) -> Result<ReferralCode, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))
    }

    /// Retrieves a referral code by its exact code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this code.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_by_code(&self, code: &str) -> Result<ReferralCode, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Referral code not found", json!({ "code": code })))
    }

    /// Returns `true` iff the code exists and is active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors only; absence is `false`.
    pub async fn is_valid(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.repository.find_by_code_and_active(code).await?.is_some())
    }

    /// Returns the record for `code` if it exists and is active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors only; absence is `None`.
    pub async fn get_active_entity_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ReferralCode>, AppError> {
        self.repository.find_by_code_and_active(code).await
    }

    /// Overwrites `code` and `owner_name` of an existing record.
    ///
    /// Status and usage count are left untouched. Keeping the current code is
    /// never a collision.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Conflict`] if the new code belongs to another record.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn update_referral_code(
        &self,
        id: i64,
        update: NewReferralCode,
    ) -> Result<ReferralCode, AppError> {
        let mut referral_code = self.get_by_id(id).await?;

        if referral_code.code != update.code
            && self.repository.exists_by_code(&update.code).await?
        {
            return Err(already_exists(&update.code));
        }

        referral_code.code = update.code;
        referral_code.owner_name = update.owner_name;

        let updated = self.repository.save(&referral_code).await?;
        tracing::info!(id, code = %updated.code, "Referral code updated");

        Ok(updated)
    }

    /// Removes a referral code permanently.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_referral_code(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.exists_by_id(id).await? {
            return Err(not_found_by_id(id));
        }

        self.repository.delete_by_id(id).await?;
        tracing::info!(id, "Referral code deleted");

        Ok(())
    }

    /// Marks a referral code inactive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn deactivate(&self, id: i64) -> Result<ReferralCode, AppError> {
        self.set_active(id, false).await
    }

    /// Marks a referral code active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn activate(&self, id: i64) -> Result<ReferralCode, AppError> {
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<ReferralCode, AppError> {
        let mut referral_code = self.get_by_id(id).await?;
        referral_code.is_active = is_active;

        let updated = self.repository.save(&referral_code).await?;
        tracing::info!(id, is_active, "Referral code status changed");

        Ok(updated)
    }

    /// Case-insensitive substring search on the owner name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn search_by_owner_name(
        &self,
        owner_name: &str,
    ) -> Result<Vec<ReferralCode>, AppError> {
        self.repository
            .find_by_owner_name_containing_ignore_case(owner_name)
            .await
    }

    /// Most used referral codes, as many as the store is configured to return.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn top_by_usage(&self) -> Result<Vec<ReferralCode>, AppError> {
        self.repository.find_top_by_usage().await
    }

    /// Referral codes used at least `min_usage` times. Negative values act as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn with_min_usage(&self, min_usage: i32) -> Result<Vec<ReferralCode>, AppError> {
        self.repository
            .find_by_usage_count_greater_than_or_equal(min_usage.max(0))
            .await
    }

    /// Sum of all usage counts, `0` for an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn total_usage_count(&self) -> Result<i64, AppError> {
        Ok(self.repository.sum_usage_count().await?.unwrap_or(0))
    }

    /// Records one use of `code`. Unknown codes are ignored.
    ///
    /// Inactive codes are counted as well; validity is checked separately
    /// through [`Self::is_valid`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors only.
    pub async fn increment_usage(&self, code: &str) -> Result<(), AppError> {
        let Some(mut referral_code) = self.repository.find_by_code(code).await? else {
            tracing::debug!(code, "Usage increment for unknown referral code ignored");
            return Ok(());
        };

        referral_code.increment_usage();
        self.repository.save(&referral_code).await?;
        tracing::debug!(
            code,
            usage_count = referral_code.usage_count,
            "Referral code usage incremented"
        );

        Ok(())
    }

    /// Aggregate counts over all referral codes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn statistics(&self) -> Result<ReferralCodeStats, AppError> {
        let total_codes = self.repository.count_all().await?;
        let active_codes = self.repository.count_active().await?;
        let total_usage = self.total_usage_count().await?;

        Ok(ReferralCodeStats {
            total_codes,
            active_codes,
            inactive_codes: (total_codes - active_codes).max(0),
            total_usage,
        })
    }

    /// Creates each of [`DEFAULT_REFERRAL_CODES`] that does not exist yet.
    ///
    /// Existing codes are left untouched, so running this repeatedly is safe.
    /// Returns the number of records created.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn seed_defaults(&self) -> Result<usize, AppError> {
        let mut created = 0;

        for (code, owner_name) in DEFAULT_REFERRAL_CODES {
            if self.repository.exists_by_code(code).await? {
                continue;
            }

            self.create_referral_code(NewReferralCode::new(code, owner_name))
                .await?;
            created += 1;
        }

        tracing::info!(
            created,
            total = DEFAULT_REFERRAL_CODES.len(),
            "Default referral codes seeded"
        );

        Ok(created)
    }
}

fn not_found_by_id(id: i64) -> AppError {
    AppError::not_found("Referral code not found", json!({ "id": id }))
}

fn already_exists(code: &str) -> AppError {
    AppError::conflict("Referral code already exists", json!({ "code": code }))
}
