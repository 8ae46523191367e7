use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, IntoActiveModel, QueryFilter, QueryOrder, Statement,
    TransactionTrait, prelude::*,
};

use crate::{
    Complaint, ComplaintDraft, ComplaintStatus, EngineError, ResultEngine, categories, comments,
    complaints, images, locations, support,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Fetch a complaint row or fail with `KeyNotFound`.
    pub(super) async fn require_complaint(
        &self,
        db_tx: &DatabaseTransaction,
        complaint_id: &str,
    ) -> ResultEngine<complaints::Model> {
        complaints::Entity::find_by_id(complaint_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("complaint not exists".to_string()))
    }

    /// Submit a new complaint together with its images.
    ///
    /// The category (and the location, when given) must name a live registry
    /// entry at submission time; the stored value is the plain string, so
    /// later registry changes leave the complaint as-is. The complaint row
    /// and every image row are written in one transaction.
    pub async fn submit_complaint(&self, draft: ComplaintDraft) -> ResultEngine<String> {
        let title = normalize_required_text(&draft.title, "title")?;
        let description = normalize_required_text(&draft.description, "description")?;
        let category = normalize_required_text(&draft.category, "category")?;
        let student_name = normalize_optional_text(draft.student_name.as_deref());
        let email = normalize_optional_text(draft.email.as_deref());
        let location = normalize_optional_text(draft.location.as_deref());

        with_tx!(self, |db_tx| {
            let known = categories::Entity::find()
                .filter(categories::Column::Name.eq(category.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if !known {
                return Err(EngineError::InvalidInput(format!(
                    "unknown category: {category}"
                )));
            }

            if let Some(location) = &location {
                let known = locations::Entity::find()
                    .filter(locations::Column::Name.eq(location.clone()))
                    .one(&db_tx)
                    .await?
                    .is_some();
                if !known {
                    return Err(EngineError::InvalidInput(format!(
                        "unknown location: {location}"
                    )));
                }
            }

            let complaint = Complaint::new(
                student_name,
                email,
                title,
                description,
                category,
                location,
                draft.images,
            );

            let complaint_model: complaints::ActiveModel = (&complaint).into();
            complaint_model.insert(&db_tx).await?;

            for image_data in &complaint.images {
                let image_model = images::ActiveModel {
                    complaint_id: ActiveValue::Set(complaint.id.clone()),
                    image_data: ActiveValue::Set(image_data.clone()),
                    created_at: ActiveValue::Set(complaint.created_at),
                    ..Default::default()
                };
                image_model.insert(&db_tx).await?;
            }

            Ok(complaint.id)
        })
    }

    /// List every complaint, newest first, with images, comments and the
    /// derived support count attached.
    ///
    /// Children are loaded in bulk and stitched in memory rather than queried
    /// per complaint.
    pub async fn list_complaints(&self) -> ResultEngine<Vec<Complaint>> {
        with_tx!(self, |db_tx| {
            let complaint_models = complaints::Entity::find()
                .order_by_desc(complaints::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            // Image id order is insertion order.
            let image_models = images::Entity::find()
                .order_by_asc(images::Column::Id)
                .all(&db_tx)
                .await?;

            let comment_models = comments::Entity::find()
                .order_by_desc(comments::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let backend = self.database.get_database_backend();
            let support_rows = db_tx
                .query_all(Statement::from_string(
                    backend,
                    "SELECT complaint_id, COUNT(*) AS count FROM support GROUP BY complaint_id;"
                        .to_string(),
                ))
                .await?;

            let mut images_by_complaint: HashMap<String, Vec<String>> = HashMap::new();
            for image in image_models {
                images_by_complaint
                    .entry(image.complaint_id)
                    .or_default()
                    .push(image.image_data);
            }

            let mut comments_by_complaint: HashMap<String, Vec<comments::Comment>> = HashMap::new();
            for comment in comment_models {
                comments_by_complaint
                    .entry(comment.complaint_id.clone())
                    .or_default()
                    .push(comment.into());
            }

            let mut support_counts: HashMap<String, i64> = HashMap::new();
            for row in support_rows {
                let complaint_id: String = row.try_get("", "complaint_id")?;
                let count: i64 = row.try_get("", "count")?;
                support_counts.insert(complaint_id, count);
            }

            let mut out = Vec::with_capacity(complaint_models.len());
            for model in complaint_models {
                let mut complaint = Complaint::try_from(model)?;
                complaint.images = images_by_complaint
                    .remove(&complaint.id)
                    .unwrap_or_default();
                complaint.comments = comments_by_complaint
                    .remove(&complaint.id)
                    .unwrap_or_default();
                complaint.support_count = support_counts.remove(&complaint.id).unwrap_or(0);
                out.push(complaint);
            }

            Ok(out)
        })
    }

    /// Set a complaint's status and bump its update timestamp.
    pub async fn update_complaint_status(
        &self,
        complaint_id: &str,
        status: ComplaintStatus,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_complaint(&db_tx, complaint_id).await?;
            let mut active = model.into_active_model();
            active.status = ActiveValue::Set(status.as_str().to_string());
            active.updated_at = ActiveValue::Set(Utc::now());
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete a complaint and everything it owns.
    ///
    /// Children are removed explicitly inside the transaction; the schema's
    /// ON DELETE CASCADE remains as a second line of defence.
    pub async fn delete_complaint(&self, complaint_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_complaint(&db_tx, complaint_id).await?;

            images::Entity::delete_many()
                .filter(images::Column::ComplaintId.eq(complaint_id))
                .exec(&db_tx)
                .await?;
            comments::Entity::delete_many()
                .filter(comments::Column::ComplaintId.eq(complaint_id))
                .exec(&db_tx)
                .await?;
            support::Entity::delete_many()
                .filter(support::Column::ComplaintId.eq(complaint_id))
                .exec(&db_tx)
                .await?;

            complaints::Entity::delete_by_id(complaint_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }
}
