use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, SqlErr, TransactionTrait,
    prelude::*,
};

use crate::{ResultEngine, support};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    pub(super) async fn count_support(
        &self,
        db: &impl ConnectionTrait,
        complaint_id: &str,
    ) -> ResultEngine<i64> {
        let count = support::Entity::find()
            .filter(support::Column::ComplaintId.eq(complaint_id))
            .count(db)
            .await?;
        Ok(count as i64)
    }

    /// Derived cardinality of a complaint's support set.
    ///
    /// Unknown complaints simply count zero, matching `has_supported`.
    pub async fn support_count(&self, complaint_id: &str) -> ResultEngine<i64> {
        self.count_support(&self.database, complaint_id).await
    }

    /// Flip one supporter's state on a complaint.
    ///
    /// Returns the new state together with the post-toggle support count. Two
    /// racing first-time toggles may both report `true`; the unique index on
    /// `(complaint_id, user_identifier)` guarantees at most one row lands, and
    /// the loser's constraint violation is absorbed rather than surfaced.
    pub async fn toggle_support(
        &self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> ResultEngine<(bool, i64)> {
        let user_identifier = normalize_required_text(user_identifier, "user identifier")?;

        with_tx!(self, |db_tx| {
            self.require_complaint(&db_tx, complaint_id).await?;

            let existing = support::Entity::find()
                .filter(support::Column::ComplaintId.eq(complaint_id))
                .filter(support::Column::UserIdentifier.eq(user_identifier.as_str()))
                .one(&db_tx)
                .await?;

            let supported = match existing {
                Some(row) => {
                    support::Entity::delete_by_id(row.id).exec(&db_tx).await?;
                    false
                }
                None => {
                    let model = support::ActiveModel {
                        complaint_id: ActiveValue::Set(complaint_id.to_string()),
                        user_identifier: ActiveValue::Set(user_identifier.clone()),
                        created_at: ActiveValue::Set(Utc::now()),
                        ..Default::default()
                    };
                    match model.insert(&db_tx).await {
                        Ok(_) => true,
                        // A concurrent toggle already landed the row.
                        Err(err)
                            if matches!(
                                err.sql_err(),
                                Some(SqlErr::UniqueConstraintViolation(_))
                            ) =>
                        {
                            true
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            };

            let count = self.count_support(&db_tx, complaint_id).await?;
            Ok((supported, count))
        })
    }

    /// Whether the given identifier currently supports the complaint.
    ///
    /// Unknown complaints and blank identifiers both read as `false`; a
    /// deleted complaint answers exactly like one that never existed.
    pub async fn has_supported(
        &self,
        complaint_id: &str,
        user_identifier: &str,
    ) -> ResultEngine<bool> {
        let Some(user_identifier) = normalize_optional_text(Some(user_identifier)) else {
            return Ok(false);
        };

        let found = support::Entity::find()
            .filter(support::Column::ComplaintId.eq(complaint_id))
            .filter(support::Column::UserIdentifier.eq(user_identifier.as_str()))
            .one(&self.database)
            .await?;

        Ok(found.is_some())
    }
}
