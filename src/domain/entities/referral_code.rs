//! Domain entity representing a referral code.

use chrono::{DateTime, Utc};

/// A referral code owned by a person.
///
/// `code` is unique across all records. `usage_count` only ever grows and is
/// bumped each time the code is applied. Inactive codes still exist but are
/// not valid for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralCode {
    pub id: i64,
    pub code: String,
    pub owner_name: String,
    pub is_active: bool,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReferralCode {
    /// Creates a new ReferralCode instance.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let code = ReferralCode::new(
    ///     1,
    ///     "alpha1".to_string(),
    ///     "Alice".to_string(),
    ///     true,
    ///     0,
    ///     Utc::now(),
    ///     Utc::now(),
    /// );
    /// ```
    pub fn new(
        id: i64,
        code: String,
        owner_name: String,
        is_active: bool,
        usage_count: i32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            owner_name,
            is_active,
            usage_count,
            created_at,
            updated_at,
        }
    }

    /// Records one more use of this code. Saturates at `i32::MAX`.
    pub fn increment_usage(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
    }
}

/// Input data for creating or rewriting a referral code.
///
/// Both fields are expected to be non-blank; the HTTP layer validates that
/// before the service sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReferralCode {
    pub code: String,
    pub owner_name: String,
}

impl NewReferralCode {
    pub fn new(code: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            owner_name: owner_name.into(),
        }
    }
}

/// Aggregate figures over all referral codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReferralCodeStats {
    pub total_codes: i64,
    pub active_codes: i64,
    pub inactive_codes: i64,
    pub total_usage: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferralCode {
        let now = Utc::now();
        ReferralCode::new(
            1,
            "alpha1".to_string(),
            "Alice".to_string(),
            true,
            0,
            now,
            now,
        )
    }

    #[test]
    fn test_referral_code_creation() {
        let code = sample();

        assert_eq!(code.id, 1);
        assert_eq!(code.code, "alpha1");
        assert_eq!(code.owner_name, "Alice");
        assert!(code.is_active);
        assert_eq!(code.usage_count, 0);
    }

    #[test]
    fn test_increment_usage() {
        let mut code = sample();

        code.increment_usage();
        code.increment_usage();

        assert_eq!(code.usage_count, 2);
    }

    #[test]
    fn test_increment_usage_saturates() {
        let mut code = sample();
        code.usage_count = i32::MAX;

        code.increment_usage();

        assert_eq!(code.usage_count, i32::MAX);
    }

    #[test]
    fn test_new_referral_code() {
        let new_code = NewReferralCode::new("pawan226100", "Pawan");

        assert_eq!(new_code.code, "pawan226100");
        assert_eq!(new_code.owner_name, "Pawan");
    }
}
