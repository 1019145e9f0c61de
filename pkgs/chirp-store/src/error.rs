//! Error types for store operations

use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid username: {0}")]
    InvalidUsername(String),
    #[error("Username is already taken: {0}")]
    UsernameTaken(String),
    #[error("Cannot follow yourself")]
    SelfFollow,
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
