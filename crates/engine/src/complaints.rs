//! Complaint primitives.
//!
//! A [`Complaint`] is the aggregate root: it owns its images, comments and
//! support rows, all of which are removed with it. Category and location are
//! held by value (plain strings checked against the registries at submission
//! time), so deleting a registry entry never touches historical complaints.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, comments};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl TryFrom<&str> for ComplaintStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            other => Err(EngineError::InvalidInput(format!(
                "invalid complaint status: {other}"
            ))),
        }
    }
}

/// Caller-supplied fields for a new complaint, before validation.
#[derive(Clone, Debug, Default)]
pub struct ComplaintDraft {
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    /// Pre-encoded payloads, persisted verbatim in insertion order.
    pub images: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub status: ComplaintStatus,
    /// Cardinality of the support relation, filled in by the read paths.
    pub support_count: i64,
    pub images: Vec<String>,
    /// Newest first.
    pub comments: Vec<comments::Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Builds a fresh complaint from already-normalized fields.
    ///
    /// Status is always `pending` and the identifier is generated here, never
    /// accepted from the caller.
    pub fn new(
        student_name: Option<String>,
        email: Option<String>,
        title: String,
        description: String,
        category: String,
        location: Option<String>,
        images: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            student_name,
            email,
            title,
            description,
            category,
            location,
            status: ComplaintStatus::Pending,
            support_count: 0,
            images,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub student_name: Option<String>,
    pub email: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::images::Entity")]
    Images,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
    #[sea_orm(has_many = "super::support::Entity")]
    Support,
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::support::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Support.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Complaint> for ActiveModel {
    fn from(complaint: &Complaint) -> Self {
        Self {
            id: ActiveValue::Set(complaint.id.clone()),
            student_name: ActiveValue::Set(complaint.student_name.clone()),
            email: ActiveValue::Set(complaint.email.clone()),
            title: ActiveValue::Set(complaint.title.clone()),
            description: ActiveValue::Set(complaint.description.clone()),
            category: ActiveValue::Set(complaint.category.clone()),
            location: ActiveValue::Set(complaint.location.clone()),
            status: ActiveValue::Set(complaint.status.as_str().to_string()),
            created_at: ActiveValue::Set(complaint.created_at),
            updated_at: ActiveValue::Set(complaint.updated_at),
        }
    }
}

impl TryFrom<Model> for Complaint {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            student_name: model.student_name,
            email: model.email,
            title: model.title,
            description: model.description,
            category: model.category,
            location: model.location,
            status: ComplaintStatus::try_from(model.status.as_str())?,
            support_count: 0,
            images: Vec::new(),
            comments: Vec::new(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
