//! Message store - persistent storage for direct messages

use chrono::Utc;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info, warn};

use crate::entities::messages;
use crate::error::Result;
use crate::models::{Message, MessagePayload};

/// Message store - manages persistent message storage
#[derive(Clone)]
pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    /// Create a message store on an existing database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a new message from `sender_id` to `recipient_id`
    pub async fn send_message(
        &self,
        sender_id: &str,
        recipient_id: &str,
        payload: MessagePayload,
    ) -> Result<Message> {
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            payload: Some(payload),
            sent_at: Utc::now().timestamp_millis(),
            read_at: None,
            archived: false,
            muted: false,
            blocked: false,
        };

        self.insert(&message).await?;

        debug!(
            "Stored message {} from {} to {}",
            message.id, sender_id, recipient_id
        );
        Ok(message)
    }

    /// Persist a fully built message, replacing nothing
    pub async fn insert(&self, message: &Message) -> Result<()> {
        let (payload_type, payload_json) = match &message.payload {
            Some(payload) => (
                Some(payload.kind().to_string()),
                Some(serde_json::to_string(payload)?),
            ),
            None => (None, None),
        };

        let row = messages::ActiveModel {
            id: Set(message.id.clone()),
            sender_id: Set(message.sender_id.clone()),
            recipient_id: Set(message.recipient_id.clone()),
            payload_type: Set(payload_type),
            payload_json: Set(payload_json),
            sent_at: Set(message.sent_at),
            read_at: Set(message.read_at),
            archived: Set(message.archived),
            muted: Set(message.muted),
            blocked: Set(message.blocked),
        };

        // Insert reports RecordNotFound when it cannot read back a string key
        match row.insert(&self.db).await {
            Ok(_) => {}
            Err(DbErr::RecordNotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    /// Get a single message by ID
    pub async fn get_message(&self, id: &str) -> Result<Option<Message>> {
        let row = messages::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;

        Ok(row.map(model_to_message))
    }

    /// All messages where `user_id` is sender or recipient
    pub async fn messages_for_user(&self, user_id: &str) -> Result<Vec<Message>> {
        let rows = messages::Entity::find()
            .filter(
                Condition::any()
                    .add(messages::Column::SenderId.eq(user_id))
                    .add(messages::Column::RecipientId.eq(user_id)),
            )
            .all(&self.db)
            .await?;

        debug!("Loaded {} messages for {}", rows.len(), user_id);
        Ok(rows.into_iter().map(model_to_message).collect())
    }

    /// Messages exchanged between two users, oldest first.
    ///
    /// With a `cursor`, only messages sent strictly before it are returned.
    pub async fn chat_history(
        &self,
        user_a: &str,
        user_b: &str,
        limit: u64,
        cursor: Option<i64>,
    ) -> Result<Vec<Message>> {
        let mut query = messages::Entity::find().filter(between(user_a, user_b));
        if let Some(cursor) = cursor {
            query = query.filter(messages::Column::SentAt.lt(cursor));
        }

        let rows = query
            .order_by_asc(messages::Column::SentAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(model_to_message).collect())
    }

    /// Set `read_at` on every listed message that is not read yet.
    ///
    /// Already read messages keep their timestamp and unknown ids are
    /// skipped. Returns the timestamp written.
    pub async fn mark_as_read(&self, message_ids: &[String]) -> Result<i64> {
        self.mark_read(None, message_ids).await
    }

    /// Like [`mark_as_read`](Self::mark_as_read), but only touches messages
    /// addressed to `recipient_id`; the caller's own outgoing messages in
    /// the list stay unread for the peer.
    pub async fn mark_as_read_for(
        &self,
        recipient_id: &str,
        message_ids: &[String],
    ) -> Result<i64> {
        self.mark_read(Some(recipient_id), message_ids).await
    }

    async fn mark_read(
        &self,
        recipient_id: Option<&str>,
        message_ids: &[String],
    ) -> Result<i64> {
        let now = Utc::now().timestamp_millis();
        let mut marked = 0;

        for id in message_ids {
            let mut update = messages::Entity::update_many()
                .col_expr(messages::Column::ReadAt, Expr::value(now))
                .filter(messages::Column::Id.eq(id.as_str()))
                .filter(messages::Column::ReadAt.is_null());
            if let Some(recipient_id) = recipient_id {
                update = update.filter(messages::Column::RecipientId.eq(recipient_id));
            }
            let result = update.exec(&self.db).await?;
            marked += result.rows_affected;
        }

        debug!(
            "Marked {} of {} messages read at {}",
            marked,
            message_ids.len(),
            now
        );
        Ok(now)
    }

    /// Unread messages sent by `peer_id` to `user_id`
    pub async fn unread_count(&self, user_id: &str, peer_id: &str) -> Result<u64> {
        let count = messages::Entity::find()
            .filter(messages::Column::RecipientId.eq(user_id))
            .filter(messages::Column::SenderId.eq(peer_id))
            .filter(messages::Column::ReadAt.is_null())
            .count(&self.db)
            .await?;

        Ok(count)
    }

    /// Archive or unarchive every message between two users.
    ///
    /// Returns the number of messages in the chat.
    pub async fn archive_chat(&self, user_id: &str, peer_id: &str, archive: bool) -> Result<u64> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::Archived, Expr::value(archive))
            .filter(between(user_id, peer_id))
            .exec(&self.db)
            .await?;

        info!(
            "Set archived={} on {} messages between {} and {}",
            archive, result.rows_affected, user_id, peer_id
        );
        Ok(result.rows_affected)
    }

    /// Permanently delete every message between two users
    pub async fn delete_chat(&self, user_a: &str, user_b: &str) -> Result<u64> {
        let result = messages::Entity::delete_many()
            .filter(between(user_a, user_b))
            .exec(&self.db)
            .await?;

        info!(
            "Deleted {} messages between {} and {}",
            result.rows_affected, user_a, user_b
        );
        Ok(result.rows_affected)
    }
}

/// Messages in either direction between two users
fn between(user_a: &str, user_b: &str) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(user_a))
                .add(messages::Column::RecipientId.eq(user_b)),
        )
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(user_b))
                .add(messages::Column::RecipientId.eq(user_a)),
        )
}

/// Convert Sea-ORM model to Message
fn model_to_message(model: messages::Model) -> Message {
    let payload = model.payload_json.as_deref().and_then(|json| {
        match serde_json::from_str::<MessagePayload>(json) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!("Message {} has an unreadable payload: {}", model.id, e);
                None
            }
        }
    });

    Message {
        id: model.id,
        sender_id: model.sender_id,
        recipient_id: model.recipient_id,
        payload,
        sent_at: model.sent_at,
        read_at: model.read_at,
        archived: model.archived,
        muted: model.muted,
        blocked: model.blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(payload_json: Option<&str>) -> messages::Model {
        messages::Model {
            id: "m1".to_string(),
            sender_id: "alice".to_string(),
            recipient_id: "bob".to_string(),
            payload_type: None,
            payload_json: payload_json.map(str::to_string),
            sent_at: 100,
            read_at: None,
            archived: false,
            muted: false,
            blocked: false,
        }
    }

    #[test]
    fn test_model_to_message_decodes_payload() {
        let json = serde_json::to_string(&MessagePayload::text("hello")).unwrap();
        let message = model_to_message(row(Some(&json)));

        assert_eq!(message.payload, Some(MessagePayload::text("hello")));
    }

    #[test]
    fn test_model_to_message_tolerates_bad_payload() {
        assert_eq!(model_to_message(row(Some("{not json"))).payload, None);
        assert_eq!(model_to_message(row(None)).payload, None);
    }
}
