//! Process-local implementation of the referral code repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::entities::{NewReferralCode, ReferralCode};
use crate::domain::repositories::{DEFAULT_TOP_LIMIT, ReferralCodeRepository};
use crate::error::AppError;

struct Inner {
    next_id: i64,
    records: BTreeMap<i64, ReferralCode>,
}

/// In-memory repository used when no database is configured, and by tests.
///
/// Records are keyed by id in a `BTreeMap`, so list queries come back in
/// ascending id order like the PostgreSQL store. Ids start at 1 and are never
/// reused. Data is lost when the process exits.
pub struct InMemoryReferralCodeRepository {
    inner: RwLock<Inner>,
    top_limit: usize,
}

impl InMemoryReferralCodeRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                records: BTreeMap::new(),
            }),
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    /// Sets how many records `find_top_by_usage` returns.
    pub fn with_top_limit(mut self, top_limit: usize) -> Self {
        self.top_limit = top_limit;
        self
    }

    async fn filtered<F>(&self, predicate: F) -> Vec<ReferralCode>
    where
        F: Fn(&ReferralCode) -> bool,
    {
        self.inner
            .read()
            .await
            .records
            .values()
            .filter(|rc| predicate(rc))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryReferralCodeRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_code(code: &str) -> AppError {
    AppError::conflict(
        "Unique constraint violation",
        json!({ "constraint": "referral_codes_code_key", "code": code }),
    )
}

#[async_trait]
impl ReferralCodeRepository for InMemoryReferralCodeRepository {
    async fn insert(&self, new_code: NewReferralCode) -> Result<ReferralCode, AppError> {
        let mut inner = self.inner.write().await;

        if inner.records.values().any(|rc| rc.code == new_code.code) {
            return Err(duplicate_code(&new_code.code));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let now = Utc::now();
        let record = ReferralCode::new(id, new_code.code, new_code.owner_name, true, 0, now, now);
        inner.records.insert(id, record.clone());

        Ok(record)
    }

    async fn save(&self, referral_code: &ReferralCode) -> Result<ReferralCode, AppError> {
        let mut inner = self.inner.write().await;

        if inner
            .records
            .values()
            .any(|rc| rc.id != referral_code.id && rc.code == referral_code.code)
        {
            return Err(duplicate_code(&referral_code.code));
        }

        let stored = inner.records.get_mut(&referral_code.id).ok_or_else(|| {
            AppError::not_found("Referral code not found", json!({ "id": referral_code.id }))
        })?;

        stored.code = referral_code.code.clone();
        stored.owner_name = referral_code.owner_name.clone();
        stored.is_active = referral_code.is_active;
        stored.usage_count = referral_code.usage_count;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn find_all(&self) -> Result<Vec<ReferralCode>, AppError> {
        Ok(self.filtered(|_| true).await)
    }

    async fn find_active(&self) -> Result<Vec<ReferralCode>, AppError> {
        Ok(self.filtered(|rc| rc.is_active).await)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ReferralCode>, AppError> {
        Ok(self.inner.read().await.records.get(&id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ReferralCode>, AppError> {
        Ok(self.filtered(|rc| rc.code == code).await.into_iter().next())
    }

    async fn find_by_code_and_active(
        &self,
        code: &str,
    ) -> Result<Option<ReferralCode>, AppError> {
        Ok(self
            .filtered(|rc| rc.is_active && rc.code == code)
            .await
            .into_iter()
            .next())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .values()
            .any(|rc| rc.code == code))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.inner.read().await.records.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.inner.write().await.records.remove(&id);
        Ok(())
    }

    async fn find_by_owner_name_containing_ignore_case(
        &self,
        owner_name: &str,
    ) -> Result<Vec<ReferralCode>, AppError> {
        let needle = owner_name.to_lowercase();
        Ok(self
            .filtered(|rc| rc.owner_name.to_lowercase().contains(&needle))
            .await)
    }

    async fn find_top_by_usage(&self) -> Result<Vec<ReferralCode>, AppError> {
        let mut records = self.filtered(|_| true).await;
        // Stable sort keeps ascending id order among equal counts.
        records.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        records.truncate(self.top_limit);
        Ok(records)
    }

    async fn find_by_usage_count_greater_than_or_equal(
        &self,
        min_usage: i32,
    ) -> Result<Vec<ReferralCode>, AppError> {
        Ok(self.filtered(|rc| rc.usage_count >= min_usage).await)
    }

    async fn sum_usage_count(&self) -> Result<Option<i64>, AppError> {
        let inner = self.inner.read().await;
        if inner.records.is_empty() {
            return Ok(None);
        }

        Ok(Some(
            inner
                .records
                .values()
                .map(|rc| i64::from(rc.usage_count))
                .sum(),
        ))
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        Ok(self.inner.read().await.records.len() as i64)
    }

    async fn count_active(&self) -> Result<i64, AppError> {
        Ok(self.filtered(|rc| rc.is_active).await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> InMemoryReferralCodeRepository {
        let repo = InMemoryReferralCodeRepository::new().with_top_limit(2);
        for (code, owner) in [("alpha1", "Alice"), ("beta2", "Bob"), ("gamma3", "alicia")] {
            repo.insert(NewReferralCode::new(code, owner)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = seeded().await;

        let all = repo.find_all().await.unwrap();

        let ids: Vec<i64> = all.iter().map(|rc| rc.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(all.iter().all(|rc| rc.is_active && rc.usage_count == 0));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_code() {
        let repo = seeded().await;

        let result = repo.insert(NewReferralCode::new("alpha1", "Other")).await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let repo = seeded().await;

        repo.delete_by_id(3).await.unwrap();
        let created = repo
            .insert(NewReferralCode::new("delta4", "Dan"))
            .await
            .unwrap();

        assert_eq!(created.id, 4);
        assert!(!repo.exists_by_id(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_missing_id() {
        let repo = seeded().await;
        let mut ghost = repo.find_by_id(1).await.unwrap().unwrap();
        ghost.id = 99;

        let result = repo.save(&ghost).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_owner_search_ignores_case() {
        let repo = seeded().await;

        let found = repo
            .find_by_owner_name_containing_ignore_case("ALI")
            .await
            .unwrap();

        let codes: Vec<&str> = found.iter().map(|rc| rc.code.as_str()).collect();
        assert_eq!(codes, vec!["alpha1", "gamma3"]);
    }

    #[tokio::test]
    async fn test_top_by_usage_orders_and_truncates() {
        let repo = seeded().await;

        let mut beta = repo.find_by_code("beta2").await.unwrap().unwrap();
        beta.usage_count = 5;
        repo.save(&beta).await.unwrap();

        let top = repo.find_top_by_usage().await.unwrap();

        let codes: Vec<&str> = top.iter().map(|rc| rc.code.as_str()).collect();
        assert_eq!(codes, vec!["beta2", "alpha1"]);
    }

    #[tokio::test]
    async fn test_sum_usage_count_empty_is_none() {
        let repo = InMemoryReferralCodeRepository::new();

        assert_eq!(repo.sum_usage_count().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_code_and_active() {
        let repo = seeded().await;

        let mut alpha = repo.find_by_code("alpha1").await.unwrap().unwrap();
        alpha.is_active = false;
        repo.save(&alpha).await.unwrap();

        assert!(repo.find_by_code_and_active("alpha1").await.unwrap().is_none());
        assert!(repo.find_by_code_and_active("beta2").await.unwrap().is_some());
        assert_eq!(repo.count_active().await.unwrap(), 2);
    }
}
