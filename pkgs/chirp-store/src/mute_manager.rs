//! Mute manager for per-user chat notification muting

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use crate::entities::mutes;
use crate::error::Result;

/// Mute manager
#[derive(Clone)]
pub struct MuteManager {
    db: DatabaseConnection,
}

impl MuteManager {
    /// Create a new mute manager
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Mute or unmute `muted_user_id` for `user_id`
    pub async fn set_muted(
        &self,
        user_id: &str,
        muted_user_id: &str,
        mute: bool,
    ) -> Result<()> {
        match self.find(user_id, muted_user_id).await? {
            Some(model) => {
                let mut active: mutes::ActiveModel = model.into();
                active.muted = Set(mute);
                active.update(&self.db).await?;
            }
            None => {
                let record = mutes::ActiveModel {
                    user_id: Set(user_id.to_string()),
                    muted_user_id: Set(muted_user_id.to_string()),
                    muted: Set(mute),
                    ..Default::default()
                };
                record.insert(&self.db).await?;
            }
        }

        info!("{} set muted={} for {}", user_id, mute, muted_user_id);
        Ok(())
    }

    /// Whether `user_id` muted `muted_user_id`; false when never set
    pub async fn is_muted(&self, user_id: &str, muted_user_id: &str) -> Result<bool> {
        Ok(self
            .find(user_id, muted_user_id)
            .await?
            .is_some_and(|m| m.muted))
    }

    async fn find(&self, user_id: &str, muted_user_id: &str) -> Result<Option<mutes::Model>> {
        Ok(mutes::Entity::find()
            .filter(mutes::Column::UserId.eq(user_id))
            .filter(mutes::Column::MutedUserId.eq(muted_user_id))
            .one(&self.db)
            .await?)
    }
}
