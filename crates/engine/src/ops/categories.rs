use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, SqlErr, prelude::*};

use crate::{ResultEngine, categories};

use super::{Engine, normalize_required_text};

impl Engine {
    /// Category names, sorted alphabetically.
    pub async fn categories(&self) -> ResultEngine<Vec<String>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;

        Ok(models.into_iter().map(|model| model.name).collect())
    }

    /// Add a category, returning `false` when the name already exists.
    pub async fn add_category(&self, name: &str) -> ResultEngine<bool> {
        let name = normalize_required_text(name, "category name")?;

        let model = categories::ActiveModel {
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

    /// Remove a category by name, returning whether anything was deleted.
    ///
    /// Complaints keep their stored category string either way.
    pub async fn delete_category(&self, name: &str) -> ResultEngine<bool> {
        let name = normalize_required_text(name, "category name")?;

        let deleted = categories::Entity::delete_many()
            .filter(categories::Column::Name.eq(name))
            .exec(&self.database)
            .await?;

        Ok(deleted.rows_affected > 0)
    }
}
