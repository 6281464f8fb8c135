//! Unit tests for the expired token sweeper

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::token::{Token, TokenScope};
use crate::repositories::{MockTokenRepository, TokenRepository};
use crate::services::clock::FixedClock;
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

async fn seeded_repository(now: chrono::DateTime<Utc>) -> MockTokenRepository {
    let repo = MockTokenRepository::new();
    let tokens = [
        Token::issued("EXPIRED1".into(), 1, now - Duration::hours(3), TokenScope::Authentication),
        Token::issued("EXPIRED2".into(), 2, now - Duration::seconds(1), TokenScope::Deployment),
        Token::issued("LIVE".into(), 1, now + Duration::days(2), TokenScope::Refresh),
    ];
    for token in &tokens {
        repo.insert(token).await.unwrap();
    }
    repo
}

fn service(
    repo: &MockTokenRepository,
    config: TokenCleanupConfig,
    now: chrono::DateTime<Utc>,
) -> TokenCleanupService<MockTokenRepository> {
    TokenCleanupService::with_clock(
        Arc::new(repo.clone()),
        config,
        Arc::new(FixedClock::new(now)),
    )
}

#[tokio::test]
async fn test_run_cleanup_deletes_expired_tokens() {
    let now = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let repo = seeded_repository(now).await;

    let result = service(&repo, TokenCleanupConfig::default(), now)
        .run_cleanup()
        .await;

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 2);
    assert_eq!(repo.all().await.len(), 1);
}

#[tokio::test]
async fn test_disabled_cleanup_is_a_no_op() {
    let now = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let repo = seeded_repository(now).await;
    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };

    let cleanup = Arc::new(service(&repo, config, now));
    let result = cleanup.run_cleanup().await;

    assert_eq!(result.expired_tokens_deleted, 0);
    assert_eq!(repo.all().await.len(), 3);
    assert!(cleanup.start_background_task().is_none());
}

#[tokio::test]
async fn test_storage_failure_is_recorded() {
    let now = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let repo = seeded_repository(now).await;
    repo.set_unavailable(true);

    let result = service(&repo, TokenCleanupConfig::default(), now)
        .run_cleanup()
        .await;

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_on_first_tick() {
    let now = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let repo = seeded_repository(now).await;

    let cleanup = Arc::new(service(&repo, TokenCleanupConfig::default(), now));
    let handle = cleanup.start_background_task().unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;

    assert_eq!(repo.all().await.len(), 1);
    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn test_background_task_survives_failed_sweep() {
    let now = Utc.with_ymd_and_hms(2030, 2, 1, 0, 0, 0).unwrap();
    let repo = seeded_repository(now).await;
    repo.set_unavailable(true);

    let config = TokenCleanupConfig {
        interval_seconds: 60,
        ..TokenCleanupConfig::default()
    };
    let cleanup = Arc::new(service(&repo, config, now));
    let handle = cleanup.start_background_task().unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    assert_eq!(repo.all().await.len(), 3);

    repo.set_unavailable(false);
    tokio::time::sleep(std::time::Duration::from_secs(60)).await;

    assert_eq!(repo.all().await.len(), 1);
    assert!(!handle.is_finished());
    handle.abort();
}
