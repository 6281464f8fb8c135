//! Unit tests for mock user repository

use chrono::{Duration, TimeZone, Utc};
use sy_shared::Pagination;

use crate::domain::entities::password::Password;
use crate::domain::entities::token::{Token, TokenScope};
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::token::{MockTokenRepository, TokenRepository};
use crate::repositories::user::{MockUserRepository, UserRepository};

fn user(username: &str, minutes_ago: i64) -> User {
    let base = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    User::new(username, Password::default(), base - Duration::minutes(minutes_ago))
}

#[tokio::test]
async fn test_create_assigns_ids_and_finds() {
    let repo = MockUserRepository::new();

    let alice = repo.create(&user("alice", 0)).await.unwrap();
    let bob = repo.create(&user("bob", 0)).await.unwrap();
    assert!(alice.id > 0);
    assert_ne!(alice.id, bob.id);

    let found = repo.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(found.username, "alice");

    let found = repo.find_by_username("bob").await.unwrap().unwrap();
    assert_eq!(found.id, bob.id);

    assert!(repo.find_by_username("carol").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_duplicate_username() {
    let repo = MockUserRepository::new();
    repo.create(&user("alice", 0)).await.unwrap();

    let result = repo.create(&user("alice", 0)).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
}

#[tokio::test]
async fn test_update_missing_user() {
    let repo = MockUserRepository::new();
    let mut ghost = user("ghost", 0);
    ghost.id = 404;

    let result = repo.update(&ghost).await;
    assert!(matches!(result, Err(DomainError::Auth(AuthError::UserNotFound))));
}

#[tokio::test]
async fn test_delete_by_username() {
    let repo = MockUserRepository::new();
    repo.create(&user("alice", 0)).await.unwrap();

    assert_eq!(repo.delete_by_username("alice").await.unwrap(), 1);
    assert_eq!(repo.delete_by_username("alice").await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_orders_newest_first_and_filters_pending() {
    let repo = MockUserRepository::new();
    let oldest = repo.create(&user("oldest", 30)).await.unwrap();
    let middle = repo.create(&user("middle", 20)).await.unwrap();
    repo.create(&user("newest", 10)).await.unwrap();

    repo.approve(middle.id, oldest.id, Utc::now()).await.unwrap();

    let all = repo.list(Pagination::new(10, 0)).await.unwrap();
    let names: Vec<_> = all.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["newest", "middle", "oldest"]);

    let page = repo.list(Pagination::new(1, 1)).await.unwrap();
    assert_eq!(page[0].username, "middle");

    let pending = repo.list_pending(Pagination::new(10, 0)).await.unwrap();
    let names: Vec<_> = pending.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["newest", "oldest"]);
}

#[tokio::test]
async fn test_find_by_token_checks_scope_and_expiry() {
    let tokens = MockTokenRepository::new();
    let repo = MockUserRepository::new().with_tokens(tokens.clone());
    let alice = repo.create(&user("alice", 0)).await.unwrap();

    let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
    let live = Token::issued("LIVE".into(), alice.id, now + Duration::hours(1), TokenScope::Authentication);
    let dead = Token::issued("DEAD".into(), alice.id, now - Duration::hours(1), TokenScope::Authentication);
    tokens.insert(&live).await.unwrap();
    tokens.insert(&dead).await.unwrap();

    let found = repo
        .find_by_token(TokenScope::Authentication, &live.hash, now)
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(alice.id));

    let wrong_scope = repo
        .find_by_token(TokenScope::Deployment, &live.hash, now)
        .await
        .unwrap();
    assert!(wrong_scope.is_none());

    let expired = repo
        .find_by_token(TokenScope::Authentication, &dead.hash, now)
        .await
        .unwrap();
    assert!(expired.is_none());
}

#[tokio::test]
async fn test_count_admins() {
    let repo = MockUserRepository::new();
    assert_eq!(repo.count_admins().await.unwrap(), 0);

    let mut admin = user("root", 0);
    admin.is_admin = true;
    repo.seed(admin).await;
    repo.create(&user("alice", 0)).await.unwrap();

    assert_eq!(repo.count_admins().await.unwrap(), 1);
}
