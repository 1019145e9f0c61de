//! Message entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub payload_type: Option<String>, // "Text", "File" or "VoiceNote"
    pub payload_json: Option<String>, // Full payload as JSON
    pub sent_at: i64,
    pub read_at: Option<i64>,
    pub archived: bool,
    pub muted: bool,
    pub blocked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
