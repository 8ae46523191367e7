//! Image attachments.
//!
//! Images exist only as children of a complaint: attached at submission time,
//! removed with the complaint. The payload is an opaque pre-encoded string
//! (a data URI in practice); the engine never inspects it.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub complaint_id: String,
    pub image_data: String,
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
