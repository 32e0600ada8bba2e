//! DTOs for referral code endpoints.
//!
//! JSON field names are camelCase (`ownerName`, `isActive`, `usageCount`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::{NewReferralCode, ReferralCode, ReferralCodeStats};
use crate::error::AppError;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Request body for creating or updating a referral code.
///
/// Missing fields deserialize as empty strings so they surface as
/// validation errors rather than body rejections.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCodeRequest {
    #[serde(default)]
    #[validate(
        length(max = 100, message = "Referral code is too long"),
        custom(function = "not_blank", message = "Referral code is required")
    )]
    pub code: String,

    #[serde(default, alias = "owner_name")]
    #[validate(
        length(max = 100, message = "Owner name is too long"),
        custom(function = "not_blank", message = "Owner name is required")
    )]
    pub owner_name: String,
}

impl ReferralCodeRequest {
    pub fn new(code: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            owner_name: owner_name.into(),
        }
    }

    /// Validates the request and converts it into a trimmed [`NewReferralCode`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is blank or too long.
    pub fn into_new_referral_code(self) -> Result<NewReferralCode, AppError> {
        self.validate()?;
        Ok(self.into())
    }
}

impl From<ReferralCodeRequest> for NewReferralCode {
    fn from(req: ReferralCodeRequest) -> Self {
        NewReferralCode {
            code: req.code.trim().to_string(),
            owner_name: req.owner_name.trim().to_string(),
        }
    }
}

/// Query string for owner search.
#[derive(Debug, Deserialize)]
pub struct OwnerSearchQuery {
    #[serde(rename = "ownerName", alias = "owner_name", default)]
    pub owner_name: String,
}

/// Individual referral code as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralCodeResponse {
    pub id: i64,
    pub code: String,
    pub owner_name: String,
    pub is_active: bool,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReferralCode> for ReferralCodeResponse {
    fn from(rc: ReferralCode) -> Self {
        Self {
            id: rc.id,
            code: rc.code,
            owner_name: rc.owner_name,
            is_active: rc.is_active,
            usage_count: rc.usage_count,
            created_at: rc.created_at,
            updated_at: rc.updated_at,
        }
    }
}

/// Response containing a list of referral codes.
#[derive(Debug, Serialize)]
pub struct ReferralCodeListResponse {
    pub items: Vec<ReferralCodeResponse>,
}

impl From<Vec<ReferralCode>> for ReferralCodeListResponse {
    fn from(codes: Vec<ReferralCode>) -> Self {
        Self {
            items: codes.into_iter().map(ReferralCodeResponse::from).collect(),
        }
    }
}

/// Result of a validity check.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub code: String,
    pub valid: bool,
}

/// Aggregate figures over all referral codes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_codes: i64,
    pub active_codes: i64,
    pub inactive_codes: i64,
    pub total_usage: i64,
}

impl From<ReferralCodeStats> for StatisticsResponse {
    fn from(s: ReferralCodeStats) -> Self {
        Self {
            total_codes: s.total_codes,
            active_codes: s.active_codes,
            inactive_codes: s.inactive_codes,
            total_usage: s.total_usage,
        }
    }
}

/// Outcome of re-running default seeding.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub created: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_camel_case_and_snake_case() {
        let camel: ReferralCodeRequest =
            serde_json::from_str(r#"{"code":"alpha1","ownerName":"Alice"}"#).unwrap();
        let snake: ReferralCodeRequest =
            serde_json::from_str(r#"{"code":"alpha1","owner_name":"Alice"}"#).unwrap();

        assert_eq!(camel.owner_name, "Alice");
        assert_eq!(snake.owner_name, "Alice");
        assert!(camel.validate().is_ok());
    }

    #[test]
    fn test_request_rejects_blank_fields() {
        let req: ReferralCodeRequest =
            serde_json::from_str(r#"{"code":"   ","ownerName":""}"#).unwrap();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("code"));
        assert!(fields.contains_key("owner_name"));
    }

    #[test]
    fn test_request_missing_field_is_invalid() {
        let req: ReferralCodeRequest = serde_json::from_str(r#"{"code":"alpha1"}"#).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_trims_into_new_referral_code() {
        let req: ReferralCodeRequest =
            serde_json::from_str(r#"{"code":" alpha1 ","ownerName":" Alice "}"#).unwrap();

        let new_code = NewReferralCode::from(req);

        assert_eq!(new_code, NewReferralCode::new("alpha1", "Alice"));
    }

    #[test]
    fn test_into_new_referral_code_rejects_blank() {
        let err = ReferralCodeRequest::new("   ", "")
            .into_new_referral_code()
            .unwrap_err();

        match err {
            AppError::Validation { details, .. } => {
                assert!(details.get("code").is_some());
                assert!(details.get("owner_name").is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_into_new_referral_code_rejects_too_long() {
        let result = ReferralCodeRequest::new("x".repeat(101), "Alice").into_new_referral_code();

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_into_new_referral_code_trims() {
        let new_code = ReferralCodeRequest::new(" alpha1 ", "Alice ")
            .into_new_referral_code()
            .unwrap();

        assert_eq!(new_code, NewReferralCode::new("alpha1", "Alice"));
    }

    #[test]
    fn test_response_uses_camel_case() {
        let now = Utc::now();
        let rc = ReferralCode::new(1, "alpha1".into(), "Alice".into(), true, 2, now, now);

        let json = serde_json::to_value(ReferralCodeResponse::from(rc)).unwrap();

        assert_eq!(json["ownerName"], "Alice");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["usageCount"], 2);
        assert!(json.get("createdAt").is_some());
    }
}
