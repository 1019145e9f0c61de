//! Follow manager - follow edges, user counters and follow notifications

use chrono::Utc;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::{follows, notifications, users};
use crate::error::{Result, StoreError};

/// Notification kind written when someone follows a user
pub const FOLLOW_NOTIFICATION: &str = "follow";

/// Stored notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationInfo {
    pub receiver_id: String,
    pub sender_id: String,
    pub kind: String,
    pub created_at: i64,
}

impl From<notifications::Model> for NotificationInfo {
    fn from(model: notifications::Model) -> Self {
        Self {
            receiver_id: model.receiver_id,
            sender_id: model.sender_id,
            kind: model.kind,
            created_at: model.created_at,
        }
    }
}

/// Follow manager
#[derive(Clone)]
pub struct FollowManager {
    db: DatabaseConnection,
}

impl FollowManager {
    /// Create a new follow manager
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Follow `target_id`, or unfollow when already following.
    ///
    /// Counters on both users move with the edge. A new follow also leaves
    /// a notification for the target. Returns whether `user_id` follows
    /// `target_id` afterwards.
    pub async fn toggle_follow(&self, user_id: &str, target_id: &str) -> Result<bool> {
        if user_id == target_id {
            return Err(StoreError::SelfFollow);
        }

        let txn = self.db.begin().await?;

        for id in [user_id, target_id] {
            if users::Entity::find_by_id(id.to_string())
                .one(&txn)
                .await?
                .is_none()
            {
                return Err(StoreError::NotFound(format!("user {}", id)));
            }
        }

        let existing = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .filter(follows::Column::FollowingId.eq(target_id))
            .one(&txn)
            .await?;

        let now_following = match existing {
            Some(edge) => {
                follows::Entity::delete_by_id(edge.id).exec(&txn).await?;
                bump(&txn, user_id, users::Column::Following, -1).await?;
                bump(&txn, target_id, users::Column::Followers, -1).await?;
                false
            }
            None => {
                let now = Utc::now().timestamp_millis();
                let edge = follows::ActiveModel {
                    follower_id: Set(user_id.to_string()),
                    following_id: Set(target_id.to_string()),
                    created_at: Set(now),
                    ..Default::default()
                };
                edge.insert(&txn).await?;
                bump(&txn, user_id, users::Column::Following, 1).await?;
                bump(&txn, target_id, users::Column::Followers, 1).await?;

                let notification = notifications::ActiveModel {
                    receiver_id: Set(target_id.to_string()),
                    sender_id: Set(user_id.to_string()),
                    kind: Set(FOLLOW_NOTIFICATION.to_string()),
                    created_at: Set(now),
                    ..Default::default()
                };
                notification.insert(&txn).await?;
                true
            }
        };

        txn.commit().await?;
        info!(
            "{} {} {}",
            user_id,
            if now_following { "followed" } else { "unfollowed" },
            target_id
        );
        Ok(now_following)
    }

    /// Whether `user_id` follows `target_id`
    pub async fn is_following(&self, user_id: &str, target_id: &str) -> Result<bool> {
        let edge = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .filter(follows::Column::FollowingId.eq(target_id))
            .one(&self.db)
            .await?;

        Ok(edge.is_some())
    }

    /// Ids of the users following `user_id`
    pub async fn followers_of(&self, user_id: &str) -> Result<Vec<String>> {
        let edges = follows::Entity::find()
            .filter(follows::Column::FollowingId.eq(user_id))
            .order_by_asc(follows::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(edges.into_iter().map(|e| e.follower_id).collect())
    }

    /// Ids of the users `user_id` follows
    pub async fn following_of(&self, user_id: &str) -> Result<Vec<String>> {
        let edges = follows::Entity::find()
            .filter(follows::Column::FollowerId.eq(user_id))
            .order_by_asc(follows::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(edges.into_iter().map(|e| e.following_id).collect())
    }

    /// Notifications addressed to `user_id`, newest first
    pub async fn notifications_for(&self, user_id: &str) -> Result<Vec<NotificationInfo>> {
        let rows = notifications::Entity::find()
            .filter(notifications::Column::ReceiverId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .all(&self.db)
            .await?;

        debug!("Loaded {} notifications for {}", rows.len(), user_id);
        Ok(rows.into_iter().map(NotificationInfo::from).collect())
    }
}

/// Add `delta` to a user counter; never goes below zero
async fn bump<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    column: users::Column,
    delta: i32,
) -> std::result::Result<(), DbErr> {
    let mut update = users::Entity::update_many()
        .col_expr(column, Expr::col(column).add(delta))
        .filter(users::Column::Id.eq(user_id));
    if delta < 0 {
        update = update.filter(column.gte(-delta));
    }
    update.exec(conn).await?;
    Ok(())
}
