use sea_orm::{TransactionTrait, prelude::*};

use crate::{ANONYMOUS_NAME, COMMENT_MAX_LEN, Comment, EngineError, ResultEngine, comments};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Attach a comment to a complaint.
    ///
    /// A missing or blank name is stored as "Anonymous". The text must be
    /// non-empty after trimming and at most `COMMENT_MAX_LEN` characters.
    pub async fn add_comment(
        &self,
        complaint_id: &str,
        name: Option<&str>,
        text: &str,
    ) -> ResultEngine<Comment> {
        let text = normalize_required_text(text, "comment text")?;
        if text.chars().count() > COMMENT_MAX_LEN {
            return Err(EngineError::InvalidInput(format!(
                "comment text exceeds {COMMENT_MAX_LEN} characters"
            )));
        }
        let name = normalize_optional_text(name).unwrap_or_else(|| ANONYMOUS_NAME.to_string());

        with_tx!(self, |db_tx| {
            self.require_complaint(&db_tx, complaint_id).await?;

            let comment = Comment::new(complaint_id.to_string(), name, text);
            let model: comments::ActiveModel = (&comment).into();
            model.insert(&db_tx).await?;

            Ok(comment)
        })
    }
}
