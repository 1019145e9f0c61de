// Copyright 2025 Chirp Team.
//
// Comprehensive tests for FollowManager

use chirp_store::{connect, FollowManager, NewUser, StoreConfig, StoreError, UserDirectory};
use tempfile::NamedTempFile;

async fn create_test_managers(path: &NamedTempFile) -> (FollowManager, UserDirectory) {
    let db = connect(&StoreConfig {
        db_path: path.path().to_path_buf(),
    })
    .await
    .expect("Failed to open database");

    (FollowManager::new(db.clone()), UserDirectory::new(db))
}

async fn register(users: &UserDirectory, username: &str) -> String {
    users
        .upsert_user(NewUser {
            username: username.to_string(),
            fullname: format!("{} Example", username),
            email: format!("{}@example.com", username),
            bio: None,
            image: String::new(),
            auth_subject: format!("idp|{}", username),
        })
        .await
        .expect("Failed to register user")
}

async fn counters(users: &UserDirectory, id: &str) -> (i32, i32) {
    let user = users.get(id).await.unwrap().unwrap();
    (user.followers, user.following)
}

#[tokio::test]
async fn test_follow_then_unfollow() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;
    let bob = register(&users, "bob").await;

    assert!(!follows.is_following(&alice, &bob).await.unwrap());

    assert!(follows.toggle_follow(&alice, &bob).await.unwrap());
    assert!(follows.is_following(&alice, &bob).await.unwrap());
    assert!(!follows.is_following(&bob, &alice).await.unwrap());
    assert_eq!(counters(&users, &alice).await, (0, 1));
    assert_eq!(counters(&users, &bob).await, (1, 0));

    assert!(!follows.toggle_follow(&alice, &bob).await.unwrap());
    assert!(!follows.is_following(&alice, &bob).await.unwrap());
    assert_eq!(counters(&users, &alice).await, (0, 0));
    assert_eq!(counters(&users, &bob).await, (0, 0));
}

#[tokio::test]
async fn test_cannot_follow_self() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;

    assert!(matches!(
        follows.toggle_follow(&alice, &alice).await,
        Err(StoreError::SelfFollow)
    ));
    assert_eq!(counters(&users, &alice).await, (0, 0));
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;

    assert!(matches!(
        follows.toggle_follow(&alice, "missing").await,
        Err(StoreError::NotFound(_))
    ));
    assert!(!follows.is_following(&alice, "missing").await.unwrap());
    assert_eq!(counters(&users, &alice).await, (0, 0));
}

#[tokio::test]
async fn test_follow_leaves_notification() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;
    let bob = register(&users, "bob").await;

    follows.toggle_follow(&alice, &bob).await.unwrap();
    // Unfollowing does not notify
    follows.toggle_follow(&alice, &bob).await.unwrap();

    let notifications = follows.notifications_for(&bob).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].sender_id, alice);
    assert_eq!(notifications[0].receiver_id, bob);
    assert_eq!(notifications[0].kind, "follow");

    assert!(follows.notifications_for(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_followers_and_following_lists() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;
    let bob = register(&users, "bob").await;
    let carol = register(&users, "carol").await;

    follows.toggle_follow(&alice, &carol).await.unwrap();
    follows.toggle_follow(&bob, &carol).await.unwrap();
    follows.toggle_follow(&carol, &alice).await.unwrap();

    let mut followers = follows.followers_of(&carol).await.unwrap();
    followers.sort();
    let mut expected = vec![alice.clone(), bob.clone()];
    expected.sort();
    assert_eq!(followers, expected);

    assert_eq!(follows.following_of(&carol).await.unwrap(), vec![alice.clone()]);
    assert_eq!(follows.following_of(&bob).await.unwrap(), vec![carol.clone()]);
    assert_eq!(counters(&users, &carol).await, (2, 1));
}

#[tokio::test]
async fn test_reregistering_keeps_counters() {
    let temp_file = NamedTempFile::new().unwrap();
    let (follows, users) = create_test_managers(&temp_file).await;
    let alice = register(&users, "alice").await;
    let bob = register(&users, "bob").await;
    follows.toggle_follow(&alice, &bob).await.unwrap();

    register(&users, "bob").await;

    assert_eq!(counters(&users, &bob).await, (1, 0));
}
