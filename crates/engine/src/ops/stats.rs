use std::collections::HashMap;

use sea_orm::{QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{ComplaintStatus, ResultEngine, categories, locations};

use super::{Engine, with_tx};

/// Snapshot of complaint volume, recomputed from current rows on every call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total: i64,
    pub pending: i64,
    pub resolved: i64,
    /// Count per live category name; zero for categories with no complaints.
    pub by_category: HashMap<String, i64>,
    /// Count per live location name; zero for locations with no complaints.
    pub by_location: HashMap<String, i64>,
}

impl Engine {
    /// Aggregate totals plus per-category and per-location counts.
    ///
    /// The registries drive the map key sets, so complaints tagged with a
    /// since-deleted name count toward the totals but appear in no map.
    pub async fn statistics(&self) -> ResultEngine<Statistics> {
        with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();
            let mut stats = Statistics::default();

            let status_rows = db_tx
                .query_all(Statement::from_string(
                    backend,
                    "SELECT status, COUNT(*) AS count FROM complaints GROUP BY status;"
                        .to_string(),
                ))
                .await?;
            for row in status_rows {
                let status: String = row.try_get("", "status")?;
                let count: i64 = row.try_get("", "count")?;
                stats.total += count;
                match ComplaintStatus::try_from(status.as_str()) {
                    Ok(ComplaintStatus::Pending) => stats.pending = count,
                    Ok(ComplaintStatus::Resolved) => stats.resolved = count,
                    // Unrecognized stored statuses still count toward the total.
                    Err(_) => {}
                }
            }

            for model in categories::Entity::find()
                .order_by_asc(categories::Column::Name)
                .all(&db_tx)
                .await?
            {
                stats.by_category.insert(model.name, 0);
            }

            let category_rows = db_tx
                .query_all(Statement::from_string(
                    backend,
                    "SELECT category, COUNT(*) AS count FROM complaints GROUP BY category;"
                        .to_string(),
                ))
                .await?;
            for row in category_rows {
                let category: String = row.try_get("", "category")?;
                let count: i64 = row.try_get("", "count")?;
                if let Some(slot) = stats.by_category.get_mut(&category) {
                    *slot = count;
                }
            }

            for model in locations::Entity::find()
                .order_by_asc(locations::Column::Name)
                .all(&db_tx)
                .await?
            {
                stats.by_location.insert(model.name, 0);
            }

            let location_rows = db_tx
                .query_all(Statement::from_string(
                    backend,
                    "SELECT location, COUNT(*) AS count FROM complaints \
                     WHERE location IS NOT NULL GROUP BY location;"
                        .to_string(),
                ))
                .await?;
            for row in location_rows {
                let location: String = row.try_get("", "location")?;
                let count: i64 = row.try_get("", "count")?;
                if let Some(slot) = stats.by_location.get_mut(&location) {
                    *slot = count;
                }
            }

            Ok(stats)
        })
    }
}
