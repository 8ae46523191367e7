//! Initial schema migration - creates all tables from scratch.
//!
//! Complete schema for Campuz:
//!
//! - `categories`: complaint tags, unique by name
//! - `locations`: place tags, unique by name
//! - `complaints`: the central records (category/location held by value)
//! - `images`: encoded attachments owned by one complaint
//! - `comments`: free-text entries owned by one complaint
//! - `support`: one upvote row per (complaint, user) pair

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Locations {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Complaints {
    Table,
    Id,
    StudentName,
    Email,
    Title,
    Description,
    Category,
    Location,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    ComplaintId,
    ImageData,
    CreatedAt,
}

#[derive(Iden)]
enum Comments {
    Table,
    Id,
    ComplaintId,
    Name,
    Text,
    CreatedAt,
}

#[derive(Iden)]
enum Support {
    Table,
    Id,
    ComplaintId,
    UserIdentifier,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-name-unique")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Locations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-locations-name-unique")
                    .table(Locations::Table)
                    .col(Locations::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Complaints
        // ───────────────────────────────────────────────────────────────────
        // Category and location are plain strings, not foreign keys: deleting
        // a registry entry must leave historical complaints untouched.
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaints::StudentName).string())
                    .col(ColumnDef::new(Complaints::Email).string())
                    .col(ColumnDef::new(Complaints::Title).string().not_null())
                    .col(ColumnDef::new(Complaints::Description).text().not_null())
                    .col(ColumnDef::new(Complaints::Category).string().not_null())
                    .col(ColumnDef::new(Complaints::Location).string())
                    .col(
                        ColumnDef::new(Complaints::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Complaints::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-complaints-created_at")
                    .table(Complaints::Table)
                    .col(Complaints::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-complaints-status")
                    .table(Complaints::Table)
                    .col(Complaints::Status)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Images
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Images::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Images::ComplaintId).string().not_null())
                    .col(ColumnDef::new(Images::ImageData).text().not_null())
                    .col(
                        ColumnDef::new(Images::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-images-complaint_id")
                            .from(Images::Table, Images::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-images-complaint_id")
                    .table(Images::Table)
                    .col(Images::ComplaintId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Comments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::ComplaintId).string().not_null())
                    .col(ColumnDef::new(Comments::Name).string().not_null())
                    .col(ColumnDef::new(Comments::Text).text().not_null())
                    .col(
                        ColumnDef::new(Comments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comments-complaint_id")
                            .from(Comments::Table, Comments::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-comments-complaint_id")
                    .table(Comments::Table)
                    .col(Comments::ComplaintId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Support
        // ───────────────────────────────────────────────────────────────────
        // The unique pair index is the race backstop for concurrent toggles;
        // the support count is always derived from this table.
        manager
            .create_table(
                Table::create()
                    .table(Support::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Support::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Support::ComplaintId).string().not_null())
                    .col(ColumnDef::new(Support::UserIdentifier).string().not_null())
                    .col(
                        ColumnDef::new(Support::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-support-complaint_id")
                            .from(Support::Table, Support::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-support-complaint_id-user_identifier-unique")
                    .table(Support::Table)
                    .col(Support::ComplaintId)
                    .col(Support::UserIdentifier)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Support::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}
