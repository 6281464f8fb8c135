//! Integration tests for the MySQL repositories
//!
//! These need a reachable MySQL server in `DATABASE_URL` and are ignored by
//! default: `cargo test -p sy_infra -- --ignored`.

use chrono::{Duration, DurationRound, Utc};

use sy_core::domain::entities::password::Password;
use sy_core::domain::entities::token::{Token, TokenHash, TokenScope};
use sy_core::domain::entities::user::User;
use sy_core::errors::{AuthError, DomainError, TokenError};
use sy_core::repositories::{TokenRepository, UserRepository};
use sy_infra::database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use sy_infra::ShipyardServices;
use sy_shared::{AppConfig, DatabaseConfig, Pagination};

async fn connect() -> anyhow::Result<DatabasePool> {
    let pool = DatabasePool::new(DatabaseConfig::from_env().with_max_connections(4)).await?;
    pool.run_migrations().await?;
    Ok(pool)
}

fn unique_name(prefix: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}_{}", prefix, nanos % 1_000_000_000_000)
}

/// A user row ready to insert, timestamps truncated to what DATETIME(6) keeps
fn new_user(username: &str) -> anyhow::Result<User> {
    let mut password = Password::default();
    password.set_with_cost("Valid1Pass", 4)?;
    let now = Utc::now().duration_trunc(Duration::microseconds(1))?;
    Ok(User::new(username, password, now))
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_user_repository_operations() -> anyhow::Result<()> {
    let pool = connect().await?;
    let repo = MySqlUserRepository::new(pool.get_pool().clone());
    let username = unique_name("it_user");

    let created = repo.create(&new_user(&username)?).await?;
    assert!(created.id > 0);

    let duplicate = repo.create(&new_user(&username)?).await;
    assert!(matches!(
        duplicate,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));

    let found = repo.find_by_username(&username).await?.expect("user stored");
    assert_eq!(found.id, created.id);
    assert_eq!(found.created_at, created.created_at);
    assert!(found.password.matches("Valid1Pass")?);
    assert!(!found.is_approved());

    let approved_at = Utc::now().duration_trunc(Duration::microseconds(1))?;
    assert_eq!(repo.approve(created.id, created.id, approved_at).await?, 1);

    let mut approved = repo.find_by_id(created.id).await?.expect("user stored");
    assert_eq!(approved.approved_at, Some(approved_at));
    assert_eq!(approved.approved_by, Some(created.id));

    approved.status = "suspended".to_string();
    approved.password.set_with_cost("Other1Pass", 4)?;
    repo.update(&approved).await?;
    // Writing identical values is still a successful update
    repo.update(&approved).await?;

    let updated = repo.find_by_id(created.id).await?.expect("user stored");
    assert_eq!(updated.status, "suspended");
    assert!(updated.password.matches("Other1Pass")?);

    let pending = repo.list_pending(Pagination::new(100, 0)).await?;
    assert!(pending.iter().all(|u| u.id != created.id));

    let mut ghost = updated.clone();
    ghost.id = i64::MAX;
    ghost.username = unique_name("it_ghost");
    assert!(matches!(
        repo.update(&ghost).await,
        Err(DomainError::Auth(AuthError::UserNotFound))
    ));

    assert_eq!(repo.delete_by_username(&username).await?, 1);
    assert_eq!(repo.delete_by_username(&username).await?, 0);
    assert!(repo.find_by_id(created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_token_repository_operations() -> anyhow::Result<()> {
    let pool = connect().await?;
    let users = MySqlUserRepository::new(pool.get_pool().clone());
    let tokens = MySqlTokenRepository::new(pool.get_pool().clone());
    let username = unique_name("it_tokens");
    let owner = users.create(&new_user(&username)?).await?;

    let now = Utc::now().duration_trunc(Duration::microseconds(1))?;
    let plaintext = unique_name("LIVETOKEN");
    let live = Token::issued(plaintext.clone(), owner.id, now + Duration::hours(1), TokenScope::Deployment);
    let stale = Token::issued(
        unique_name("STALETOKEN"),
        owner.id,
        now - Duration::hours(1),
        TokenScope::Deployment,
    );

    tokens.insert(&live).await?;
    tokens.insert(&stale).await?;
    assert!(matches!(
        tokens.insert(&live).await,
        Err(DomainError::Token(TokenError::Conflict))
    ));

    let stored = tokens
        .get_by_hash(&TokenHash::from_plaintext(&plaintext))
        .await?
        .expect("token stored");
    assert_eq!(stored.user_id, owner.id);
    assert_eq!(stored.scope, TokenScope::Deployment);
    assert_eq!(stored.expiry, live.expiry);
    assert!(stored.plaintext.is_none());

    assert_eq!(tokens.count_for_user(owner.id, TokenScope::Deployment).await?, 2);

    let resolved = users
        .find_by_token(TokenScope::Deployment, &live.hash, now)
        .await?;
    assert_eq!(resolved.map(|u| u.id), Some(owner.id));
    assert!(users
        .find_by_token(TokenScope::Authentication, &live.hash, now)
        .await?
        .is_none());
    assert!(users
        .find_by_token(TokenScope::Deployment, &stale.hash, now)
        .await?
        .is_none());

    assert!(tokens.delete_expired(now).await? >= 1);
    assert!(tokens.get_by_hash(&stale.hash).await?.is_none());

    // Deleting the owner cascades to its tokens
    users.delete_by_username(&username).await?;
    assert!(tokens.get_by_hash(&live.hash).await?.is_none());

    Ok(())
}

#[tokio::test]
#[ignore] // Requires actual database
async fn test_services_end_to_end() -> anyhow::Result<()> {
    let pool = connect().await?;
    let mut config = AppConfig::default();
    config.auth.password.bcrypt_cost = 4;
    let services = ShipyardServices::new(pool, &config);
    let username = unique_name("it_flow");

    let user = services.users.create_user(&username, "Valid1Pass").await?;
    let pair = services.tokens.create_auth_token_with_refresh(user.id).await?;
    let auth_plaintext = pair.auth_token.plaintext.clone().expect("plaintext issued");

    let owner = services
        .users
        .get_user_for_token(TokenScope::Authentication, &auth_plaintext)
        .await?;
    assert_eq!(owner.id, user.id);

    let refreshed = services
        .tokens
        .refresh_auth_token(pair.refresh_token.plaintext.as_deref().expect("plaintext issued"))
        .await?;
    assert_eq!(refreshed.user_id, user.id);
    assert!(matches!(
        services
            .tokens
            .validate_token(&auth_plaintext, TokenScope::Authentication)
            .await,
        Err(DomainError::Token(TokenError::NotFound))
    ));

    services.users.delete_user(&username).await?;
    services.shutdown().await;
    Ok(())
}
