//! Chat list aggregation - folds a user's messages into per-peer conversations
//!
//! The fold is a pure function over a snapshot of messages. It never touches
//! read state; marking messages read is done by
//! [`MessageStore::mark_as_read`](crate::MessageStore::mark_as_read).
//!
//! # Rules
//!
//! - Messages are scanned in ascending `sent_at` order. The sort is stable,
//!   so messages sharing a timestamp keep the order they were given in.
//! - The first message seen for a peer, and every later message with a
//!   strictly greater `sent_at`, becomes the conversation's latest message.
//! - Every message addressed to the user without a `read_at` counts as
//!   unread, including the latest one.
//! - `message_ids` lists every message of the conversation in scan order.
//! - Conversations come out in the order their peer first appeared.

use std::collections::HashMap;

use tracing::debug;

use crate::models::{ChatListOrder, ConversationSummary, Message, MessagePayload};

/// Preview shown when the latest message is a file
pub const ATTACHMENT_PREVIEW: &str = "[Attachment]";

/// Preview shown when the latest message is a voice note
pub const VOICE_PREVIEW: &str = "[Voice]";

/// Number of trailing id characters used for unknown peers
const FALLBACK_ID_CHARS: usize = 4;

/// Short textual preview of a message payload
pub fn preview(payload: Option<&MessagePayload>) -> String {
    match payload {
        Some(MessagePayload::Text { text }) => text.clone(),
        Some(MessagePayload::File(_)) => ATTACHMENT_PREVIEW.to_string(),
        Some(MessagePayload::VoiceNote(_)) => VOICE_PREVIEW.to_string(),
        None => String::new(),
    }
}

/// Display label for a peer missing from the user directory
pub fn fallback_name(peer_id: &str) -> String {
    let count = peer_id.chars().count();
    let tail: String = peer_id
        .chars()
        .skip(count.saturating_sub(FALLBACK_ID_CHARS))
        .collect();
    format!("User {}", tail)
}

/// Fold `messages` into one summary per peer of `user_id`.
///
/// Messages where `user_id` is neither sender nor recipient are skipped.
pub fn aggregate(user_id: &str, messages: &[Message]) -> Vec<ConversationSummary> {
    let mut relevant: Vec<&Message> = messages
        .iter()
        .filter(|m| m.sender_id == user_id || m.recipient_id == user_id)
        .collect();
    relevant.sort_by_key(|m| m.sent_at);

    let mut summaries: Vec<ConversationSummary> = Vec::new();
    let mut by_peer: HashMap<&str, usize> = HashMap::new();

    for msg in relevant {
        let peer_id = msg.peer_of(user_id);
        let unread = u32::from(msg.is_unread_for(user_id));

        match by_peer.get(peer_id) {
            Some(&idx) => {
                let summary = &mut summaries[idx];
                if msg.sent_at > summary.sent_at {
                    summary.last_message = preview(msg.payload.as_ref());
                    summary.last_sender_id = msg.sender_id.clone();
                    summary.sent_at = msg.sent_at;
                    summary.last_read_at = msg.read_at;
                }
                summary.unread_count += unread;
                summary.message_ids.push(msg.id.clone());
            }
            None => {
                by_peer.insert(peer_id, summaries.len());
                summaries.push(ConversationSummary {
                    peer_id: peer_id.to_string(),
                    last_message: preview(msg.payload.as_ref()),
                    last_sender_id: msg.sender_id.clone(),
                    sent_at: msg.sent_at,
                    last_read_at: msg.read_at,
                    unread_count: unread,
                    message_ids: vec![msg.id.clone()],
                });
            }
        }
    }

    debug!(
        "Aggregated {} messages into {} conversations for {}",
        messages.len(),
        summaries.len(),
        user_id
    );
    summaries
}

/// Reorder summaries in place
pub fn sort_summaries(summaries: &mut [ConversationSummary], order: ChatListOrder) {
    match order {
        ChatListOrder::Discovery => {}
        ChatListOrder::Recency => summaries.sort_by(|a, b| b.sent_at.cmp(&a.sent_at)),
    }
}
