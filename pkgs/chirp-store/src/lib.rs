//! Chirp Store - direct message storage and chat list aggregation
//!
//! This crate keeps users and direct messages in SQLite through Sea-ORM and
//! derives the per-peer chat list shown in the messaging tab.
//!
//! # Architecture
//!
//! - **MessageStore**: send, history, mark-as-read, unread counts, archive, delete
//! - **UserDirectory**: user records keyed by identity provider subject
//! - **MuteManager**: per-peer notification muting
//! - **FollowManager**: follow edges, follower counters, follow notifications
//! - **chat_list**: pure fold of a message snapshot into conversation summaries
//! - **ChatService**: authenticated chat list with peer display fields
//!
//! # Database Schema
//!
//! - `users`: profile fields, follow/post counters, identity provider subject
//! - `messages`: sender, recipient, payload, `sent_at`, `read_at`, flags
//! - `mutes`: (user, muted user) mute flags
//! - `follows`: (follower, following) edges
//! - `notifications`: follow notifications per receiver
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use chirp_store::{
//!     connect, ChatListOrder, ChatService, DisplayConfig, Identity, MessagePayload, NewUser,
//!     StoreConfig,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = connect(&StoreConfig::default()).await?;
//! let service = ChatService::new(db, DisplayConfig::default());
//!
//! let alice = service
//!     .users()
//!     .upsert_user(NewUser {
//!         username: "alice".to_string(),
//!         fullname: "Alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!         bio: None,
//!         image: String::new(),
//!         auth_subject: "idp|alice".to_string(),
//!     })
//!     .await?;
//!
//! service
//!     .messages()
//!     .send_message(&alice, "bob-id", MessagePayload::text("Hello!"))
//!     .await?;
//!
//! let chats = service
//!     .chat_list(Some(&Identity::new("idp|alice")), ChatListOrder::Recency)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod chat_list;
pub mod chat_service;
pub mod display;
pub mod entities;
pub mod error;
pub mod follow_manager;
pub mod message_store;
pub mod migration;
pub mod models;
pub mod mute_manager;
pub mod user_directory;

pub use chat_service::{filter_chats, ChatService};
pub use display::{ColorScheme, DisplayConfig};
pub use error::{Result, StoreError};
pub use follow_manager::{FollowManager, NotificationInfo};
pub use message_store::MessageStore;
pub use models::{
    ChatListEntry, ChatListOrder, ConversationSummary, FileAttachment, Identity, Message,
    MessagePayload, PeerProfile, VoiceNote,
};
pub use mute_manager::MuteManager;
pub use user_directory::{NewUser, PeerDirectory, ProfileUpdate, UserDirectory, UserInfo};

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Configuration for the storage layer
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    pub db_path: std::path::PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::path::PathBuf::from("chirp.db"),
        }
    }
}

/// Open the database described by `config` and bring its schema up to date
pub async fn connect(config: &StoreConfig) -> Result<DatabaseConnection> {
    let db_path_str = config
        .db_path
        .to_str()
        .ok_or_else(|| StoreError::Connection("Invalid database path".to_string()))?
        .replace("\\", "/");

    let db_url = format!("sqlite:{}?mode=rwc", db_path_str);

    let db = Database::connect(db_url.as_str()).await?;

    migration::Migrator::up(&db, None).await?;

    info!("Chirp store initialized at {}", config.db_path.display());
    Ok(db)
}
