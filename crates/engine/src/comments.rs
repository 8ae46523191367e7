//! Complaint comments.
//!
//! Comments are write-once: created after submission, never edited, removed
//! only when the owning complaint goes away.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on comment text, enforced at the HTTP boundary.
pub const COMMENT_MAX_LEN: usize = 500;

/// Display name stored when the commenter left the name blank.
pub const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub complaint_id: String,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(complaint_id: String, name: String, text: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            complaint_id,
            name,
            text,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub complaint_id: String,
    pub name: String,
    pub text: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::complaints::Entity",
        from = "Column::ComplaintId",
        to = "super::complaints::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Complaints,
}

impl Related<super::complaints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Comment> for ActiveModel {
    fn from(comment: &Comment) -> Self {
        Self {
            id: ActiveValue::Set(comment.id.clone()),
            complaint_id: ActiveValue::Set(comment.complaint_id.clone()),
            name: ActiveValue::Set(comment.name.clone()),
            text: ActiveValue::Set(comment.text.clone()),
            created_at: ActiveValue::Set(comment.created_at),
        }
    }
}

impl From<Model> for Comment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            complaint_id: model.complaint_id,
            name: model.name,
            text: model.text,
            created_at: model.created_at,
        }
    }
}
