//! Chat service - the authenticated chat list and its actions

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info};

use crate::chat_list::{self, fallback_name};
use crate::display::DisplayConfig;
use crate::error::Result;
use crate::message_store::MessageStore;
use crate::models::{ChatListEntry, ChatListOrder, ConversationSummary, Identity, PeerProfile};
use crate::user_directory::{PeerDirectory, UserDirectory, UserInfo};

/// Chat list service
pub struct ChatService {
    messages: MessageStore,
    users: UserDirectory,
    peers: Arc<dyn PeerDirectory>,
    display: DisplayConfig,
}

impl ChatService {
    /// Create a chat service whose peers are resolved from the `users` table
    pub fn new(db: DatabaseConnection, display: DisplayConfig) -> Self {
        let users = UserDirectory::new(db.clone());
        Self {
            messages: MessageStore::new(db),
            peers: Arc::new(users.clone()),
            users,
            display,
        }
    }

    /// Resolve peers through another directory
    pub fn with_peer_directory(mut self, peers: Arc<dyn PeerDirectory>) -> Self {
        self.peers = peers;
        self
    }

    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// The user record behind the caller identity
    pub async fn current_user(&self, identity: Option<&Identity>) -> Result<UserInfo> {
        self.users.current_user(identity).await
    }

    /// Conversations of the caller, one entry per peer
    pub async fn chat_list(
        &self,
        identity: Option<&Identity>,
        order: ChatListOrder,
    ) -> Result<Vec<ChatListEntry>> {
        let user = self.current_user(identity).await?;
        self.chat_list_for(&user, order).await
    }

    /// Conversations of an already resolved user
    pub async fn chat_list_for(
        &self,
        user: &UserInfo,
        order: ChatListOrder,
    ) -> Result<Vec<ChatListEntry>> {
        let messages = self.messages.messages_for_user(&user.id).await?;

        let mut summaries = chat_list::aggregate(&user.id, &messages);
        chat_list::sort_summaries(&mut summaries, order);

        let mut entries = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let peer = self.peers.find_peer(&summary.peer_id).await?;
            if peer.is_none() {
                debug!("Peer {} not in directory, using fallback name", summary.peer_id);
            }
            entries.push(self.to_entry(summary, peer));
        }

        Ok(entries)
    }

    /// Mark a conversation read when the caller opens it.
    ///
    /// Only acts when the peer sent the latest message and something is
    /// unread; returns the read timestamp in that case. Messages the caller
    /// sent are never marked.
    pub async fn open_chat(
        &self,
        identity: Option<&Identity>,
        entry: &ChatListEntry,
    ) -> Result<Option<i64>> {
        let user = self.current_user(identity).await?;
        self.open_chat_for(&user, entry).await
    }

    /// [`open_chat`](Self::open_chat) for an already resolved user
    pub async fn open_chat_for(
        &self,
        user: &UserInfo,
        entry: &ChatListEntry,
    ) -> Result<Option<i64>> {
        if entry.last_sender_id == user.id || entry.unread_count == 0 {
            return Ok(None);
        }

        let read_at = self
            .messages
            .mark_as_read_for(&user.id, &entry.message_ids)
            .await?;
        info!(
            "{} opened chat with {}, {} messages marked read",
            user.id,
            entry.peer_id,
            entry.message_ids.len()
        );
        Ok(Some(read_at))
    }

    fn to_entry(&self, summary: ConversationSummary, peer: Option<PeerProfile>) -> ChatListEntry {
        let (name, fullname, image) = match peer {
            Some(peer) => (
                peer.username,
                Some(peer.fullname),
                Some(peer.image).filter(|i| !i.is_empty()),
            ),
            None => (fallback_name(&summary.peer_id), None, None),
        };
        let initials: Option<String> = fullname
            .as_deref()
            .and_then(|f| f.chars().next())
            .map(|c| c.to_uppercase().collect());

        ChatListEntry {
            time: self.display.format_time(summary.sent_at),
            is_read: summary.last_read_at.is_some(),
            peer_id: summary.peer_id,
            name,
            fullname,
            initials,
            image,
            last_message: summary.last_message,
            last_sender_id: summary.last_sender_id,
            sent_at: summary.sent_at,
            unread_count: summary.unread_count,
            message_ids: summary.message_ids,
        }
    }
}

/// Entries whose name contains `search`, ignoring case
pub fn filter_chats<'a>(entries: &'a [ChatListEntry], search: &str) -> Vec<&'a ChatListEntry> {
    let needle = search.to_lowercase();
    entries
        .iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}
