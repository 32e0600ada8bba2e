mod common;

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = common::make_server(common::create_test_state());

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = common::make_server(common::create_test_state());
    common::create_code(&server, "alpha1", "Alice").await;

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert_eq!(
        json["checks"]["storage"]["message"],
        "memory, 1 referral codes"
    );
}
