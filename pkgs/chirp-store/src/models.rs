//! Domain types shared by the store, the aggregator and the chat service

use serde::{Deserialize, Serialize};

/// Attached file descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileAttachment {
    pub url: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

/// Voice note descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceNote {
    pub url: String,
    /// Length in milliseconds
    pub duration: u64,
    pub mime_type: String,
}

/// Message payload, exactly one kind per message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MessagePayload {
    Text { text: String },
    File(FileAttachment),
    VoiceNote(VoiceNote),
}

impl MessagePayload {
    pub fn text(text: impl Into<String>) -> Self {
        MessagePayload::Text { text: text.into() }
    }

    /// Value stored in the `payload_type` column
    pub fn kind(&self) -> &'static str {
        match self {
            MessagePayload::Text { .. } => "Text",
            MessagePayload::File(_) => "File",
            MessagePayload::VoiceNote(_) => "VoiceNote",
        }
    }
}

/// A direct message between two users.
///
/// `payload` is `None` only for stored rows whose body is missing or could
/// not be decoded. Messages created through the store always carry one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub payload: Option<MessagePayload>,
    /// Milliseconds since epoch
    pub sent_at: i64,
    pub read_at: Option<i64>,
    pub archived: bool,
    pub muted: bool,
    pub blocked: bool,
}

impl Message {
    /// The other participant relative to `user_id`
    pub fn peer_of(&self, user_id: &str) -> &str {
        if self.sender_id == user_id {
            &self.recipient_id
        } else {
            &self.sender_id
        }
    }

    /// Addressed to `user_id` and not read yet
    pub fn is_unread_for(&self, user_id: &str) -> bool {
        self.recipient_id == user_id && self.read_at.is_none()
    }
}

/// Per-peer conversation state derived from a message snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    pub peer_id: String,
    pub last_message: String,
    pub last_sender_id: String,
    pub sent_at: i64,
    /// Read timestamp of the latest message
    pub last_read_at: Option<i64>,
    pub unread_count: u32,
    pub message_ids: Vec<String>,
}

/// Verified caller identity handed over by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }
}

/// Display fields of a peer as returned by the user directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerProfile {
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub image: String,
}

/// One row of the chat list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatListEntry {
    pub peer_id: String,
    pub name: String,
    pub fullname: Option<String>,
    pub initials: Option<String>,
    pub image: Option<String>,
    pub last_message: String,
    pub last_sender_id: String,
    pub sent_at: i64,
    /// `HH:MM` in the configured offset
    pub time: String,
    pub unread_count: u32,
    pub is_read: bool,
    pub message_ids: Vec<String>,
}

/// Ordering of conversations in the chat list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatListOrder {
    /// Order in which peers first show up in the chronological scan
    #[default]
    Discovery,
    /// Most recent conversation first
    Recency,
}
