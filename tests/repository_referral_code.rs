//! PostgreSQL repository tests.

use referral_codes::domain::entities::NewReferralCode;
use referral_codes::domain::repositories::ReferralCodeRepository;
use referral_codes::error::AppError;
use referral_codes::infrastructure::persistence::PgReferralCodeRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
async fn test_insert_and_find(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    let created = repo
        .insert(NewReferralCode::new("alpha1", "Alice"))
        .await
        .unwrap();

    assert!(created.is_active);
    assert_eq!(created.usage_count, 0);

    let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
    let by_code = repo.find_by_code("alpha1").await.unwrap().unwrap();

    assert_eq!(by_id, created);
    assert_eq!(by_code, created);
    assert!(repo.exists_by_code("alpha1").await.unwrap());
    assert!(repo.exists_by_id(created.id).await.unwrap());
}

#[sqlx::test]
async fn test_unique_constraint_maps_to_conflict(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    repo.insert(NewReferralCode::new("dup1", "Alice"))
        .await
        .unwrap();
    let result = repo.insert(NewReferralCode::new("dup1", "Bob")).await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
}

#[sqlx::test]
async fn test_blank_code_rejected_by_check_constraint(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    let blank_code = repo.insert(NewReferralCode::new("   ", "Alice")).await;
    let blank_owner = repo.insert(NewReferralCode::new("alpha1", "")).await;

    assert!(matches!(blank_code.unwrap_err(), AppError::Validation { .. }));
    assert!(matches!(blank_owner.unwrap_err(), AppError::Validation { .. }));
    assert_eq!(repo.count_all().await.unwrap(), 0);
}

#[sqlx::test]
async fn test_save_and_active_filter(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    let mut code = repo
        .insert(NewReferralCode::new("alpha1", "Alice"))
        .await
        .unwrap();
    code.is_active = false;
    code.usage_count = 3;

    let saved = repo.save(&code).await.unwrap();

    assert!(!saved.is_active);
    assert_eq!(saved.usage_count, 3);
    assert!(saved.updated_at >= saved.created_at);
    assert!(repo.find_by_code_and_active("alpha1").await.unwrap().is_none());
    assert!(repo.find_active().await.unwrap().is_empty());
    assert_eq!(repo.count_all().await.unwrap(), 1);
    assert_eq!(repo.count_active().await.unwrap(), 0);
}

#[sqlx::test]
async fn test_owner_search_escapes_wildcards(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    repo.insert(NewReferralCode::new("alpha1", "Alice"))
        .await
        .unwrap();
    repo.insert(NewReferralCode::new("promo1", "100% Club"))
        .await
        .unwrap();

    let by_case = repo
        .find_by_owner_name_containing_ignore_case("ALI")
        .await
        .unwrap();
    let by_percent = repo
        .find_by_owner_name_containing_ignore_case("%")
        .await
        .unwrap();

    assert_eq!(by_case.len(), 1);
    assert_eq!(by_case[0].code, "alpha1");
    assert_eq!(by_percent.len(), 1);
    assert_eq!(by_percent[0].code, "promo1");
}

#[sqlx::test]
async fn test_usage_queries(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool)).with_top_limit(2);

    assert_eq!(repo.sum_usage_count().await.unwrap(), None);

    for (code, owner, uses) in [("a1", "A", 1), ("b2", "B", 5), ("c3", "C", 5)] {
        let mut rc = repo.insert(NewReferralCode::new(code, owner)).await.unwrap();
        rc.usage_count = uses;
        repo.save(&rc).await.unwrap();
    }

    let top: Vec<String> = repo
        .find_top_by_usage()
        .await
        .unwrap()
        .into_iter()
        .map(|rc| rc.code)
        .collect();
    assert_eq!(top, vec!["b2", "c3"]);

    let min_five = repo
        .find_by_usage_count_greater_than_or_equal(5)
        .await
        .unwrap();
    assert_eq!(min_five.len(), 2);

    assert_eq!(repo.sum_usage_count().await.unwrap(), Some(11));
}

#[sqlx::test]
async fn test_delete_by_id(pool: PgPool) {
    let repo = PgReferralCodeRepository::new(Arc::new(pool));

    let created = repo
        .insert(NewReferralCode::new("alpha1", "Alice"))
        .await
        .unwrap();

    repo.delete_by_id(created.id).await.unwrap();

    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    assert!(!repo.exists_by_id(created.id).await.unwrap());
}
