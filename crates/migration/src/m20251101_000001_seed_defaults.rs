//! Seeds the default category and location registries.
//!
//! Inserts are insert-or-ignore on the unique name, so re-running against a
//! database where an admin already renamed or removed entries is harmless.

use sea_orm::DbErr;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Categories {
    Table,
    Name,
}

#[derive(Iden)]
enum Locations {
    Table,
    Name,
}

const DEFAULT_CATEGORIES: [&str; 5] = ["Campus", "Hostel", "Roadways", "Transport/Bus", "Others"];

const DEFAULT_LOCATIONS: [&str; 14] = [
    "Main Campus",
    "Hostel A",
    "Hostel B",
    "Hostel C",
    "Block A",
    "Block B",
    "Block C",
    "Library",
    "Cafeteria",
    "Sports Complex",
    "Auditorium",
    "Parking Area",
    "Main Gate",
    "Administrative Block",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let mut categories = Query::insert()
            .into_table(Categories::Table)
            .columns([Categories::Name])
            .on_conflict(OnConflict::column(Categories::Name).do_nothing().to_owned())
            .to_owned();
        for name in DEFAULT_CATEGORIES {
            categories.values_panic([name.into()]);
        }
        db.execute(backend.build(&categories)).await?;

        let mut locations = Query::insert()
            .into_table(Locations::Table)
            .columns([Locations::Name])
            .on_conflict(OnConflict::column(Locations::Name).do_nothing().to_owned())
            .to_owned();
        for name in DEFAULT_LOCATIONS {
            locations.values_panic([name.into()]);
        }
        db.execute(backend.build(&locations)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = db.get_database_backend();

        let categories = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::Name).is_in(DEFAULT_CATEGORIES))
            .to_owned();
        db.execute(backend.build(&categories)).await?;

        let locations = Query::delete()
            .from_table(Locations::Table)
            .and_where(Expr::col(Locations::Name).is_in(DEFAULT_LOCATIONS))
            .to_owned();
        db.execute(backend.build(&locations)).await?;

        Ok(())
    }
}
