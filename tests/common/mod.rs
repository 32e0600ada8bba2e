#![allow(dead_code)]

use axum::{Router, routing::get};
use axum_test::TestServer;
use referral_codes::api::handlers::health_handler;
use referral_codes::api::routes::referral_code_routes;
use referral_codes::domain::repositories::ReferralCodeRepository;
use referral_codes::infrastructure::persistence::InMemoryReferralCodeRepository;
use referral_codes::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;

pub fn create_test_state() -> AppState {
    create_test_state_with_limit(10)
}

pub fn create_test_state_with_limit(top_limit: usize) -> AppState {
    let repository: Arc<dyn ReferralCodeRepository> =
        Arc::new(InMemoryReferralCodeRepository::new().with_top_limit(top_limit));
    AppState::new(repository, "memory")
}

pub fn make_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/referral-codes", referral_code_routes())
        .with_state(state);
    TestServer::new(app).unwrap()
}

/// Creates a referral code through the API and returns the response body.
pub async fn create_code(server: &TestServer, code: &str, owner: &str) -> Value {
    let response = server
        .post("/api/referral-codes")
        .json(&json!({ "code": code, "ownerName": owner }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub async fn use_code(server: &TestServer, code: &str, times: usize) {
    for _ in 0..times {
        server
            .post(&format!("/api/referral-codes/code/{code}/use"))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);
    }
}
