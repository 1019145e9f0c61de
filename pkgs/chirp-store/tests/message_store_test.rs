// Copyright 2025 Chirp Team.
//
// Comprehensive tests for MessageStore

use chirp_store::{
    connect, FileAttachment, Message, MessagePayload, MessageStore, StoreConfig,
};
use tempfile::NamedTempFile;

async fn create_test_store(path: &NamedTempFile) -> MessageStore {
    let db = connect(&StoreConfig {
        db_path: path.path().to_path_buf(),
    })
    .await
    .expect("Failed to open database");

    MessageStore::new(db)
}

fn message(id: &str, from: &str, to: &str, text: &str, sent_at: i64) -> Message {
    Message {
        id: id.to_string(),
        sender_id: from.to_string(),
        recipient_id: to.to_string(),
        payload: Some(MessagePayload::text(text)),
        sent_at,
        read_at: None,
        archived: false,
        muted: false,
        blocked: false,
    }
}

async fn seed(store: &MessageStore, messages: &[Message]) {
    for msg in messages {
        store.insert(msg).await.expect("Failed to insert message");
    }
}

#[tokio::test]
async fn test_send_and_get_message() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let payload = MessagePayload::File(FileAttachment {
        url: "https://cdn.example/report.pdf".to_string(),
        name: "report.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size: 2048,
    });

    let sent = store
        .send_message("alice", "bob", payload.clone())
        .await
        .expect("Failed to send message");

    let stored = store
        .get_message(&sent.id)
        .await
        .expect("Failed to get message")
        .expect("Message should exist");

    assert_eq!(stored, sent);
    assert_eq!(stored.payload, Some(payload));
    assert_eq!(stored.read_at, None);
    assert!(!stored.archived && !stored.muted && !stored.blocked);
}

#[tokio::test]
async fn test_get_unknown_message() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let missing = store.get_message("nope").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_message_without_payload_round_trips() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut empty = message("m1", "alice", "bob", "", 100);
    empty.payload = None;
    store.insert(&empty).await.unwrap();

    let stored = store.get_message("m1").await.unwrap().unwrap();
    assert_eq!(stored.payload, None);
}

#[tokio::test]
async fn test_mark_as_read_is_idempotent() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m1", "bob", "alice", "hi", 100),
            message("m2", "bob", "alice", "there", 200),
        ],
    )
    .await;

    let ids = vec!["m1".to_string(), "m2".to_string()];
    let first = store.mark_as_read(&ids).await.unwrap();

    let m1 = store.get_message("m1").await.unwrap().unwrap();
    assert_eq!(m1.read_at, Some(first));

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = store.mark_as_read(&ids).await.unwrap();
    assert!(second > first);

    for id in &ids {
        let msg = store.get_message(id).await.unwrap().unwrap();
        assert_eq!(msg.read_at, Some(first), "read_at must not be overwritten");
    }
}

#[tokio::test]
async fn test_mark_as_read_skips_unknown_ids() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(&store, &[message("m1", "bob", "alice", "hi", 100)]).await;

    store
        .mark_as_read(&["ghost".to_string(), "m1".to_string()])
        .await
        .expect("Unknown ids should not fail");

    let m1 = store.get_message("m1").await.unwrap().unwrap();
    assert!(m1.read_at.is_some());
}

#[tokio::test]
async fn test_mark_as_read_for_only_touches_recipient_messages() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m0", "alice", "bob", "ping", 50),
            message("m1", "bob", "alice", "pong", 100),
        ],
    )
    .await;

    let ids = vec!["m0".to_string(), "m1".to_string()];
    let read_at = store.mark_as_read_for("alice", &ids).await.unwrap();

    let m0 = store.get_message("m0").await.unwrap().unwrap();
    let m1 = store.get_message("m1").await.unwrap().unwrap();
    assert_eq!(m0.read_at, None);
    assert_eq!(m1.read_at, Some(read_at));
    assert_eq!(store.unread_count("bob", "alice").await.unwrap(), 1);
}

#[tokio::test]
async fn test_messages_for_user() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m1", "alice", "bob", "a", 100),
            message("m2", "carol", "alice", "b", 200),
            message("m3", "bob", "carol", "c", 300),
        ],
    )
    .await;

    let mut ids: Vec<String> = store
        .messages_for_user("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect();
    ids.sort();

    assert_eq!(ids, vec!["m1", "m2"]);
}

#[tokio::test]
async fn test_chat_history_limit_and_cursor() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m3", "alice", "bob", "three", 300),
            message("m1", "alice", "bob", "one", 100),
            message("m2", "bob", "alice", "two", 200),
            message("x1", "alice", "carol", "other", 150),
        ],
    )
    .await;

    let ids = |msgs: Vec<Message>| msgs.into_iter().map(|m| m.id).collect::<Vec<_>>();

    let all = store.chat_history("alice", "bob", 10, None).await.unwrap();
    assert_eq!(ids(all), vec!["m1", "m2", "m3"]);

    let limited = store.chat_history("bob", "alice", 2, None).await.unwrap();
    assert_eq!(ids(limited), vec!["m1", "m2"]);

    let before = store
        .chat_history("alice", "bob", 10, Some(300))
        .await
        .unwrap();
    assert_eq!(ids(before), vec!["m1", "m2"]);
}

#[tokio::test]
async fn test_unread_count_per_peer() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut read = message("m3", "bob", "alice", "seen", 300);
    read.read_at = Some(350);
    seed(
        &store,
        &[
            message("m1", "bob", "alice", "one", 100),
            message("m2", "bob", "alice", "two", 200),
            read,
            message("m4", "alice", "bob", "reply", 400),
            message("m5", "carol", "alice", "other", 500),
        ],
    )
    .await;

    assert_eq!(store.unread_count("alice", "bob").await.unwrap(), 2);
    assert_eq!(store.unread_count("alice", "carol").await.unwrap(), 1);
    assert_eq!(store.unread_count("bob", "alice").await.unwrap(), 1);
}

#[tokio::test]
async fn test_archive_and_unarchive_chat() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m1", "alice", "bob", "one", 100),
            message("m2", "bob", "alice", "two", 200),
            message("x1", "alice", "carol", "other", 300),
        ],
    )
    .await;

    let count = store.archive_chat("alice", "bob", true).await.unwrap();
    assert_eq!(count, 2);
    assert!(store.get_message("m1").await.unwrap().unwrap().archived);
    assert!(store.get_message("m2").await.unwrap().unwrap().archived);
    assert!(!store.get_message("x1").await.unwrap().unwrap().archived);

    store.archive_chat("bob", "alice", false).await.unwrap();
    assert!(!store.get_message("m1").await.unwrap().unwrap().archived);
}

#[tokio::test]
async fn test_delete_chat() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    seed(
        &store,
        &[
            message("m1", "alice", "bob", "one", 100),
            message("m2", "bob", "alice", "two", 200),
            message("x1", "alice", "carol", "other", 300),
        ],
    )
    .await;

    let deleted = store.delete_chat("alice", "bob").await.unwrap();
    assert_eq!(deleted, 2);

    assert!(store.get_message("m1").await.unwrap().is_none());
    assert!(store.get_message("x1").await.unwrap().is_some());
    assert_eq!(store.delete_chat("alice", "bob").await.unwrap(), 0);
}
