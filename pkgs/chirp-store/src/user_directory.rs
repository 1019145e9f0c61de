//! User directory - user records keyed by identity provider subject

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::users;
use crate::error::{Result, StoreError};
use crate::models::{Identity, PeerProfile};

/// Minimum username length after trimming
pub const MIN_USERNAME_LEN: usize = 3;

/// Lookup of peer display fields by user id
#[async_trait]
pub trait PeerDirectory: Send + Sync {
    /// `None` when no user with that id exists
    async fn find_peer(&self, user_id: &str) -> Result<Option<PeerProfile>>;
}

/// Fields for creating or refreshing a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: String,
    pub auth_subject: String,
}

/// Stored user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: String,
    pub auth_subject: String,
    pub followers: i32,
    pub following: i32,
    pub posts: i32,
}

impl From<users::Model> for UserInfo {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            fullname: model.fullname,
            email: model.email,
            bio: model.bio,
            image: model.image,
            auth_subject: model.auth_subject,
            followers: model.followers,
            following: model.following,
            posts: model.posts,
        }
    }
}

impl From<UserInfo> for PeerProfile {
    fn from(user: UserInfo) -> Self {
        Self {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
            image: user.image,
        }
    }
}

/// Partial profile update; `None` and empty strings leave a field alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub fullname: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// User directory backed by the `users` table
#[derive(Clone)]
pub struct UserDirectory {
    db: DatabaseConnection,
}

impl UserDirectory {
    /// Create a new user directory
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a user, or refresh the one registered under the same subject.
    ///
    /// Counters of an existing user are kept. Returns the user id.
    pub async fn upsert_user(&self, user: NewUser) -> Result<String> {
        if let Some(model) = self.find_model_by_subject(&user.auth_subject).await? {
            let id = model.id.clone();
            let username = user.username.clone();
            let mut active: users::ActiveModel = model.into();
            active.username = Set(user.username);
            active.fullname = Set(user.fullname);
            active.email = Set(user.email);
            active.bio = Set(user.bio);
            active.image = Set(user.image);
            active
                .update(&self.db)
                .await
                .map_err(|e| username_conflict(e, &username))?;

            debug!("Updated user {}", id);
            return Ok(id);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let username = user.username.clone();
        let new_user = users::ActiveModel {
            id: Set(id.clone()),
            username: Set(user.username),
            fullname: Set(user.fullname),
            email: Set(user.email),
            bio: Set(user.bio),
            image: Set(user.image),
            followers: Set(0),
            following: Set(0),
            posts: Set(0),
            auth_subject: Set(user.auth_subject),
            created_at: Set(Utc::now().timestamp_millis()),
        };

        match new_user.insert(&self.db).await {
            Ok(_) => {}
            Err(DbErr::RecordNotFound(_)) => {}
            Err(e) => return Err(username_conflict(e, &username)),
        }

        info!("Created user {}", id);
        Ok(id)
    }

    /// The user record behind the caller identity
    pub async fn current_user(&self, identity: Option<&Identity>) -> Result<UserInfo> {
        let identity = identity.ok_or(StoreError::Unauthenticated)?;

        self.find_by_subject(&identity.subject)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user for subject {}", identity.subject)))
    }

    /// Every user except the caller, oldest account first
    pub async fn list_others(&self, identity: Option<&Identity>) -> Result<Vec<PeerProfile>> {
        let me = self.current_user(identity).await?;

        let others = users::Entity::find()
            .filter(users::Column::Id.ne(me.id.as_str()))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await?;

        debug!("Listed {} users for {}", others.len(), me.id);
        Ok(others
            .into_iter()
            .map(|m| PeerProfile::from(UserInfo::from(m)))
            .collect())
    }

    /// Get a user by ID
    pub async fn get(&self, user_id: &str) -> Result<Option<UserInfo>> {
        let user = users::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?;

        Ok(user.map(UserInfo::from))
    }

    /// Find the user registered under an identity provider subject
    pub async fn find_by_subject(&self, subject: &str) -> Result<Option<UserInfo>> {
        Ok(self
            .find_model_by_subject(subject)
            .await?
            .map(UserInfo::from))
    }

    /// Change a user's username after validating it.
    ///
    /// The lookup gives the common case a clear error; the unique index on
    /// `username` decides when two renames race.
    pub async fn update_username(&self, user_id: &str, username: &str) -> Result<()> {
        let username = username.trim();
        validate_username(username)?;

        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Id.ne(user_id))
            .one(&self.db)
            .await?;
        if taken.is_some() {
            return Err(StoreError::UsernameTaken(username.to_string()));
        }

        let model = self.require(user_id).await?;
        let mut active: users::ActiveModel = model.into();
        active.username = Set(username.to_string());
        active
            .update(&self.db)
            .await
            .map_err(|e| username_conflict(e, username))?;

        info!("User {} renamed to {}", user_id, username);
        Ok(())
    }

    /// Apply the non-empty fields of `update`
    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
        let model = self.require(user_id).await?;
        let mut active: users::ActiveModel = model.into();
        let mut changed = false;

        if let Some(fullname) = update.fullname.filter(|v| !v.is_empty()) {
            active.fullname = Set(fullname);
            changed = true;
        }
        if let Some(bio) = update.bio.filter(|v| !v.is_empty()) {
            active.bio = Set(Some(bio));
            changed = true;
        }
        if let Some(image) = update.image.filter(|v| !v.is_empty()) {
            active.image = Set(image);
            changed = true;
        }

        if changed {
            active.update(&self.db).await?;
            debug!("Updated profile of {}", user_id);
        }
        Ok(())
    }

    async fn require(&self, user_id: &str) -> Result<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user_id)))
    }

    async fn find_model_by_subject(&self, subject: &str) -> Result<Option<users::Model>> {
        Ok(users::Entity::find()
            .filter(users::Column::AuthSubject.eq(subject))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl PeerDirectory for UserDirectory {
    async fn find_peer(&self, user_id: &str) -> Result<Option<PeerProfile>> {
        Ok(self.get(user_id).await?.map(PeerProfile::from))
    }
}

/// `UsernameTaken` when `err` is a violation of the unique username index
fn username_conflict(err: DbErr, username: &str) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) if detail.contains("username") => {
            StoreError::UsernameTaken(username.to_string())
        }
        _ => err.into(),
    }
}

/// Check a trimmed username against the naming rules
pub fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(StoreError::InvalidUsername(
            "username cannot be empty".to_string(),
        ));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(StoreError::InvalidUsername(format!(
            "username must be at least {} characters long",
            MIN_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::InvalidUsername(
            "username can only contain letters, numbers and underscore".to_string(),
        ));
    }
    Ok(())
}
