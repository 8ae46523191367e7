use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, SqlErr, prelude::*};

use crate::{ResultEngine, locations};

use super::{Engine, normalize_required_text};

impl Engine {
    /// Location names, sorted alphabetically.
    pub async fn locations(&self) -> ResultEngine<Vec<String>> {
        let models = locations::Entity::find()
            .order_by_asc(locations::Column::Name)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(|model| model.name).collect())
    }

    /// Add a location, returning `false` when the name already exists.
    pub async fn add_location(&self, name: &str) -> ResultEngine<bool> {
        let name = normalize_required_text(name, "location name")?;

        let model = locations::ActiveModel {
            name: ActiveValue::Set(name),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        match model.insert(&self.database).await {
            Ok(_) => Ok(true),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Remove a location by name, returning whether anything was deleted.
    ///
    /// Complaints keep their stored location string either way.
    pub async fn delete_location(&self, name: &str) -> ResultEngine<bool> {
        let name = normalize_required_text(name, "location name")?;

        let deleted = locations::Entity::delete_many()
            .filter(locations::Column::Name.eq(name))
            .exec(&self.database)
            .await?;

        Ok(deleted.rows_affected > 0)
    }
}
