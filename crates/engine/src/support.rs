//! Support rows.
//!
//! One row is one upvote by one anonymous client identifier. The unique
//! (complaint_id, user_identifier) index declared in the schema is what makes
//! concurrent toggles safe; the complaint's support count is always the
//! number of rows here, never a stored counter.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "support")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub complaint_id: String,
    pub user_identifier: String,
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
