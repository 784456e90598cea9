//! Gateway tests over the real database-backed license directory.

use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;

use posgate::directory::{DbLicenseDirectory, LicenseDirectory};
use posgate::gateway::{AccessGateway, AuthError};
use posgate::partition::PartitionId;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::setup_test_db;

#[tokio::test]
async fn unknown_key_fails_with_invalid_key() -> Result<()> {
    let db = setup_test_db().await?;
    let gateway = AccessGateway::new(Arc::new(DbLicenseDirectory::new(db)));

    let result = gateway.authorize("NOT-REGISTERED").await;

    assert!(matches!(result, Err(AuthError::InvalidKey)));
    Ok(())
}

#[tokio::test]
async fn active_key_resolves_stable_partition() -> Result<()> {
    let db = setup_test_db().await?;
    let directory = DbLicenseDirectory::new(db.clone());
    directory
        .register("SHOP-001", None, Some("owner@shop.example".to_string()))
        .await?;
    let gateway = AccessGateway::new(Arc::new(directory));

    let first = gateway.authorize("SHOP-001").await?;
    let second = gateway.authorize("SHOP-001").await?;

    assert_eq!(first, second);
    assert_eq!(first, PartitionId::resolve("SHOP-001"));
    Ok(())
}

#[tokio::test]
async fn expired_key_is_denied_and_deactivated_in_registry() -> Result<()> {
    let db = setup_test_db().await?;
    let directory = Arc::new(DbLicenseDirectory::new(db.clone()));
    directory
        .register("SHOP-002", Some(Utc::now() - Duration::days(1)), None)
        .await?;
    let gateway = AccessGateway::new(directory.clone());

    let result = gateway.authorize("SHOP-002").await;
    assert!(matches!(result, Err(AuthError::Expired)));

    // The expiry check left a persistent mark: the registry record is now
    // inactive, so the next attempt is denied as deactivated.
    let record = directory.find_by_key("SHOP-002").await?.unwrap();
    assert!(!record.active);

    let result = gateway.authorize("SHOP-002").await;
    assert!(matches!(result, Err(AuthError::Deactivated)));
    Ok(())
}

#[tokio::test]
async fn deactivate_is_idempotent() -> Result<()> {
    let db = setup_test_db().await?;
    let directory = DbLicenseDirectory::new(db.clone());
    directory.register("SHOP-003", None, None).await?;

    directory.deactivate("SHOP-003").await?;
    directory.deactivate("SHOP-003").await?;
    directory.deactivate("NEVER-REGISTERED").await?;

    let record = directory.find_by_key("SHOP-003").await?.unwrap();
    assert!(!record.active);
    Ok(())
}

#[tokio::test]
async fn future_expiry_still_authorizes() -> Result<()> {
    let db = setup_test_db().await?;
    let directory = DbLicenseDirectory::new(db.clone());
    directory
        .register("SHOP-004", Some(Utc::now() + Duration::days(30)), None)
        .await?;
    let gateway = AccessGateway::new(Arc::new(directory));

    assert!(gateway.authorize("SHOP-004").await.is_ok());
    Ok(())
}
