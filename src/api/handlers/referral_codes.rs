//! Handlers for referral code endpoints.
//!
//! All routes live under `/api/referral-codes`; see
//! [`crate::api::routes::referral_code_routes`].

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use crate::api::dto::referral_code::{
    OwnerSearchQuery, ReferralCodeListResponse, ReferralCodeRequest, ReferralCodeResponse,
    SeedResponse, StatisticsResponse, ValidateResponse,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a referral code.
///
/// # Endpoint
///
/// `POST /api/referral-codes`
///
/// # Request Body
///
/// ```json
/// { "code": "alpha1", "ownerName": "Alice" }
/// ```
///
/// # Errors
///
/// Returns 400 if a field is blank or too long.
/// Returns 409 if the code already exists.
pub async fn create_referral_code_handler(
    State(state): State<AppState>,
    Json(payload): Json<ReferralCodeRequest>,
) -> Result<(StatusCode, Json<ReferralCodeResponse>), AppError> {
    let new_code = payload.into_new_referral_code()?;

    let created = state
        .referral_code_service
        .create_referral_code(new_code)
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists every referral code.
///
/// # Endpoint
///
/// `GET /api/referral-codes`
pub async fn list_referral_codes_handler(
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeListResponse>, AppError> {
    let codes = state.referral_code_service.list_all().await?;
    Ok(Json(codes.into()))
}

/// Lists active referral codes.
///
/// # Endpoint
///
/// `GET /api/referral-codes/active`
pub async fn list_active_referral_codes_handler(
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeListResponse>, AppError> {
    let codes = state.referral_code_service.list_active().await?;
    Ok(Json(codes.into()))
}

/// `GET /api/referral-codes/{id}`
///
/// # Errors
///
/// Returns 404 if no referral code has this id.
pub async fn get_referral_code_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let code = state.referral_code_service.get_by_id(id).await?;
    Ok(Json(code.into()))
}

/// `GET /api/referral-codes/code/{code}`
///
/// # Errors
///
/// Returns 404 if the code does not exist.
pub async fn get_referral_code_by_code_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let referral_code = state.referral_code_service.get_by_code(&code).await?;
    Ok(Json(referral_code.into()))
}

/// Replaces the code and owner name of a referral code.
///
/// # Endpoint
///
/// `PUT /api/referral-codes/{id}`
///
/// Status and usage count are preserved.
///
/// # Errors
///
/// Returns 400 if a field is blank or too long.
/// Returns 404 if no referral code has this id.
/// Returns 409 if the new code belongs to another referral code.
pub async fn update_referral_code_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<ReferralCodeRequest>,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let new_code = payload.into_new_referral_code()?;

    let updated = state
        .referral_code_service
        .update_referral_code(id, new_code)
        .await?;

    Ok(Json(updated.into()))
}

/// Permanently deletes a referral code.
///
/// # Endpoint
///
/// `DELETE /api/referral-codes/{id}`
///
/// # Errors
///
/// Returns 404 if no referral code has this id.
pub async fn delete_referral_code_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.referral_code_service.delete_referral_code(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/referral-codes/{id}/activate`
///
/// # Errors
///
/// Returns 404 if no referral code has this id.
pub async fn activate_referral_code_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let code = state.referral_code_service.activate(id).await?;
    Ok(Json(code.into()))
}

/// `PUT /api/referral-codes/{id}/deactivate`
///
/// # Errors
///
/// Returns 404 if no referral code has this id.
pub async fn deactivate_referral_code_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeResponse>, AppError> {
    let code = state.referral_code_service.deactivate(id).await?;
    Ok(Json(code.into()))
}

/// Case-insensitive search by owner name.
///
/// # Endpoint
///
/// `GET /api/referral-codes/search/owner?ownerName=ali`
pub async fn search_by_owner_handler(
    Query(query): Query<OwnerSearchQuery>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeListResponse>, AppError> {
    let codes = state
        .referral_code_service
        .search_by_owner_name(&query.owner_name)
        .await?;
    Ok(Json(codes.into()))
}

/// Most used referral codes.
///
/// # Endpoint
///
/// `GET /api/referral-codes/top`
pub async fn top_referral_codes_handler(
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeListResponse>, AppError> {
    let codes = state.referral_code_service.top_by_usage().await?;
    Ok(Json(codes.into()))
}

/// Referral codes used at least `min_usage` times.
///
/// # Endpoint
///
/// `GET /api/referral-codes/usage/{min_usage}`
pub async fn min_usage_handler(
    Path(min_usage): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ReferralCodeListResponse>, AppError> {
    let codes = state.referral_code_service.with_min_usage(min_usage).await?;
    Ok(Json(codes.into()))
}

/// Totals across all referral codes.
///
/// # Endpoint
///
/// `GET /api/referral-codes/statistics`
///
/// # Response
///
/// ```json
/// { "totalCodes": 7, "activeCodes": 6, "inactiveCodes": 1, "totalUsage": 42 }
/// ```
pub async fn statistics_handler(
    State(state): State<AppState>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let stats = state.referral_code_service.statistics().await?;
    Ok(Json(stats.into()))
}

/// Reports whether a code exists and is active. Never 404s.
///
/// # Endpoint
///
/// `GET /api/referral-codes/validate/{code}`
pub async fn validate_referral_code_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ValidateResponse>, AppError> {
    let valid = state.referral_code_service.is_valid(&code).await?;
    Ok(Json(ValidateResponse { code, valid }))
}

/// Records one use of a referral code.
///
/// # Endpoint
///
/// `POST /api/referral-codes/code/{code}/use`
///
/// Unknown codes are ignored and still answer 204.
pub async fn use_referral_code_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.referral_code_service.increment_usage(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Re-runs default seeding; existing codes are left as they are.
///
/// # Endpoint
///
/// `POST /api/referral-codes/initialize`
pub async fn initialize_defaults_handler(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, AppError> {
    let created = state.referral_code_service.seed_defaults().await?;
    Ok(Json(SeedResponse { created }))
}
