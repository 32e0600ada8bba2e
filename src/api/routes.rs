//! API route configuration.

use crate::api::handlers::{
    activate_referral_code_handler, create_referral_code_handler,
    deactivate_referral_code_handler, delete_referral_code_handler,
    get_referral_code_by_code_handler, get_referral_code_handler, initialize_defaults_handler,
    list_active_referral_codes_handler, list_referral_codes_handler, min_usage_handler,
    search_by_owner_handler, statistics_handler, top_referral_codes_handler,
    update_referral_code_handler, use_referral_code_handler, validate_referral_code_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Referral code routes, mounted under `/api/referral-codes`.
///
/// # Endpoints
///
/// - `GET    /`                      - List all referral codes
/// - `POST   /`                      - Create a referral code
/// - `GET    /active`                - List active referral codes
/// - `GET    /statistics`            - Totals (codes, active, usage)
/// - `GET    /top`                   - Most used referral codes
/// - `POST   /initialize`            - Seed the default referral codes
/// - `GET    /search/owner`          - Search by owner name (`?ownerName=`)
/// - `GET    /usage/{min_usage}`     - Codes used at least `min_usage` times
/// - `GET    /validate/{code}`       - Whether a code exists and is active
/// - `GET    /code/{code}`           - Fetch by code
/// - `POST   /code/{code}/use`       - Record one use of a code
/// - `GET    /{id}`                  - Fetch by id
/// - `PUT    /{id}`                  - Replace code and owner name
/// - `DELETE /{id}`                  - Delete permanently
/// - `PUT    /{id}/activate`         - Mark active
/// - `PUT    /{id}/deactivate`       - Mark inactive
pub fn referral_code_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_referral_codes_handler).post(create_referral_code_handler),
        )
        .route("/active", get(list_active_referral_codes_handler))
        .route("/statistics", get(statistics_handler))
        .route("/top", get(top_referral_codes_handler))
        .route("/initialize", post(initialize_defaults_handler))
        .route("/search/owner", get(search_by_owner_handler))
        .route("/usage/{min_usage}", get(min_usage_handler))
        .route("/validate/{code}", get(validate_referral_code_handler))
        .route("/code/{code}", get(get_referral_code_by_code_handler))
        .route("/code/{code}/use", post(use_referral_code_handler))
        .route(
            "/{id}",
            get(get_referral_code_handler)
                .put(update_referral_code_handler)
                .delete(delete_referral_code_handler),
        )
        .route("/{id}/activate", put(activate_referral_code_handler))
        .route("/{id}/deactivate", put(deactivate_referral_code_handler))
}
