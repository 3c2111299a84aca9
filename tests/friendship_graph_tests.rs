//! Friendship graph behavior over the in-memory backend.
//!
//! Covers the request/accept/remove lifecycle: requests are pending in
//! both directions, acceptance makes the friendship visible from both
//! sides, and mutual-friend queries intersect accepted edges only.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinetrack::models::CreateUser;
use cinetrack::services::{EntityValidator, UserService};
use cinetrack::store::memory::MemoryStore;
use cinetrack::Error;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn user_service() -> UserService {
    init_tracing();
    let store = Arc::new(MemoryStore::with_reference_data());
    let validator = EntityValidator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    UserService::new(store.clone(), store, validator)
}

async fn register(service: &UserService, login: &str) -> i64 {
    service
        .register_user(CreateUser {
            email: format!("{login}@example.com"),
            login: login.to_string(),
            name: None,
            birthday: NaiveDate::from_ymd_opt(1990, 3, 14).unwrap(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn a_request_alone_makes_nobody_friends() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    service.send_friend_request(a, b).await.unwrap();

    assert!(service.friends_of(a).await.unwrap().is_empty());
    assert!(service.friends_of(b).await.unwrap().is_empty());
}

#[tokio::test]
async fn acceptance_makes_the_friendship_visible_from_both_sides() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    service.send_friend_request(a, b).await.unwrap();
    service.accept_friend_request(b, a).await.unwrap();

    let friends_of_a: Vec<i64> = service
        .friends_of(a)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    let friends_of_b: Vec<i64> = service
        .friends_of(b)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();

    assert_eq!(friends_of_a, vec![b]);
    assert_eq!(friends_of_b, vec![a]);
}

#[tokio::test]
async fn mutual_friends_is_the_intersection_of_accepted_edges() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;
    let c = register(&service, "carol").await;
    let d = register(&service, "dave").await;

    // A-C, B-C accepted; A-D accepted but not shared with B.
    for (x, y) in [(a, c), (b, c), (a, d)] {
        service.send_friend_request(x, y).await.unwrap();
        service.accept_friend_request(y, x).await.unwrap();
    }

    let mutual: Vec<i64> = service
        .mutual_friends(a, b)
        .await
        .unwrap()
        .iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(mutual, vec![c]);
}

#[tokio::test]
async fn duplicate_requests_are_rejected_in_either_direction() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    service.send_friend_request(a, b).await.unwrap();

    assert_matches!(
        service.send_friend_request(a, b).await,
        Err(Error::FriendRequestExists { .. })
    );
    assert_matches!(
        service.send_friend_request(b, a).await,
        Err(Error::FriendRequestExists { .. })
    );
}

#[tokio::test]
async fn self_requests_are_rejected() {
    let service = user_service();
    let a = register(&service, "alice").await;

    assert_matches!(
        service.send_friend_request(a, a).await,
        Err(Error::SelfFriendship { user_id }) if user_id == a
    );
}

#[tokio::test]
async fn accepting_without_a_pending_request_fails() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    assert_matches!(
        service.accept_friend_request(b, a).await,
        Err(Error::PendingRequestNotFound { .. })
    );

    // Accepting twice is also a failure: the pair is no longer pending.
    service.send_friend_request(a, b).await.unwrap();
    service.accept_friend_request(b, a).await.unwrap();
    assert_matches!(
        service.accept_friend_request(b, a).await,
        Err(Error::PendingRequestNotFound { .. })
    );
}

#[tokio::test]
async fn removal_deletes_both_directions() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    service.send_friend_request(a, b).await.unwrap();
    service.accept_friend_request(b, a).await.unwrap();
    service.remove_friend(a, b).await.unwrap();

    assert!(service.friends_of(a).await.unwrap().is_empty());
    assert!(service.friends_of(b).await.unwrap().is_empty());

    // A fresh request is possible again after removal.
    service.send_friend_request(b, a).await.unwrap();
}

#[tokio::test]
async fn removing_a_nonexistent_friendship_fails() {
    let service = user_service();
    let a = register(&service, "alice").await;
    let b = register(&service, "bob").await;

    assert_matches!(
        service.remove_friend(a, b).await,
        Err(Error::FriendshipNotFound { .. })
    );
}

#[tokio::test]
async fn requests_to_unknown_users_fail_with_not_found() {
    let service = user_service();
    let a = register(&service, "alice").await;

    assert_matches!(
        service.send_friend_request(a, 999).await,
        Err(Error::NotFound { id: 999, .. })
    );
    assert_matches!(
        service.send_friend_request(999, a).await,
        Err(Error::NotFound { id: 999, .. })
    );
}
