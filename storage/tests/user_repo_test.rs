//! Integration tests for [`storage::UserRepository`].

use chrono::{Duration, TimeZone, Utc};
use storage::{SqlitePoolManager, StorageError, UserProfile, UserRepository};

async fn repo() -> UserRepository {
    let pool_manager = SqlitePoolManager::open("sqlite::memory:")
        .await
        .expect("Failed to open database");
    UserRepository::new(pool_manager)
}

fn profile(id: i64, username: &str) -> UserProfile {
    UserProfile {
        id,
        username: Some(username.to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
        language_code: Some("ru".to_string()),
        is_bot: false,
    }
}

/// **Test: a new user is stored with reminders enabled.**
#[tokio::test]
async fn test_upsert_creates_user() {
    let repo = repo().await;
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();

    let user = repo.upsert(&profile(42, "alice"), now).await.unwrap();

    assert_eq!(user.id, 42);
    assert_eq!(user.username.as_deref(), Some("alice"));
    assert!(user.notifications_enabled);
    assert_eq!(user.created_at, now);
    assert_eq!(user.updated_at, now);
}

/// **Test: upserting again refreshes the profile but keeps the opt-in flag and created_at.**
#[tokio::test]
async fn test_upsert_preserves_flag_and_created_at() {
    let repo = repo().await;
    let first = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let later = first + Duration::days(3);

    repo.upsert(&profile(42, "alice"), first).await.unwrap();
    assert!(repo.set_notifications(42, false).await.unwrap());
    let user = repo.upsert(&profile(42, "alice_renamed"), later).await.unwrap();

    assert_eq!(user.username.as_deref(), Some("alice_renamed"));
    assert!(!user.notifications_enabled);
    assert_eq!(user.created_at, first);
    assert_eq!(user.updated_at, later);
}

/// **Test: toggle flips the flag each time and reports the new value.**
#[tokio::test]
async fn test_toggle_notifications() {
    let repo = repo().await;
    repo.upsert(&profile(7, "bob"), Utc::now()).await.unwrap();

    assert!(!repo.toggle_notifications(7).await.unwrap());
    assert!(repo.toggle_notifications(7).await.unwrap());
    assert!(repo.get(7).await.unwrap().unwrap().notifications_enabled);
}

/// **Test: toggling an unknown user is NotFound and setting the flag reports false.**
#[tokio::test]
async fn test_unknown_user() {
    let repo = repo().await;

    let err = repo.toggle_notifications(999).await.unwrap_err();

    assert!(matches!(err, StorageError::NotFound(_)));
    assert!(!repo.set_notifications(999, true).await.unwrap());
    assert!(repo.get(999).await.unwrap().is_none());
}

/// **Test: only opted-in users are listed, ordered by id.**
#[tokio::test]
async fn test_list_with_notifications_enabled() {
    let repo = repo().await;
    let now = Utc::now();
    for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
        repo.upsert(&profile(id, name), now).await.unwrap();
    }
    repo.set_notifications(2, false).await.unwrap();

    let ids: Vec<i64> = repo
        .list_with_notifications_enabled()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();

    assert_eq!(ids, vec![1, 3]);
}
