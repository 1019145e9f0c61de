// Copyright 2025 Chirp Team.
//
// Tests for store error types

use chirp_store::StoreError;

#[test]
fn test_error_display_unauthenticated() {
    let error = StoreError::Unauthenticated;

    assert_eq!(format!("{}", error), "Not authenticated");
}

#[test]
fn test_error_display_not_found() {
    let error = StoreError::NotFound("user for subject idp|x".to_string());
    let error_string = format!("{}", error);

    assert!(error_string.contains("Not found"));
    assert!(error_string.contains("idp|x"));
}

#[test]
fn test_error_display_username() {
    let invalid = StoreError::InvalidUsername("too short".to_string());
    let taken = StoreError::UsernameTaken("alice".to_string());

    assert!(format!("{}", invalid).contains("too short"));
    assert!(format!("{}", taken).contains("alice"));
}

#[test]
fn test_error_display_self_follow() {
    assert_eq!(
        format!("{}", StoreError::SelfFollow),
        "Cannot follow yourself"
    );
}

#[test]
fn test_error_from_database_error() {
    let db_err = sea_orm::DbErr::Custom("disk full".to_string());
    let error: StoreError = db_err.into();

    assert!(matches!(error, StoreError::Database(_)));
    assert!(format!("{}", error).contains("disk full"));
}

#[test]
fn test_error_from_serialization_error() {
    let json = r#"{"type": "Text""#;
    let ser_err = serde_json::from_str::<serde_json::Value>(json).unwrap_err();

    let error: StoreError = ser_err.into();

    assert!(format!("{}", error).contains("Serialization error"));
}
