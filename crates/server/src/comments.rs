//! Comment API endpoints

use api_types::comment::{CommentCreated, CommentNew, CommentView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_comment(comment: engine::Comment) -> CommentView {
    CommentView {
        id: comment.id,
        name: comment.name,
        text: comment.text,
        created_at: comment.created_at,
    }
}

pub async fn add(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CommentNew>,
) -> Result<(StatusCode, Json<CommentCreated>), ServerError> {
    // Length is bounded here, before the engine sees the text.
    if payload.text.chars().count() > engine::COMMENT_MAX_LEN {
        return Err(ServerError::Generic(format!(
            "comment text exceeds {} characters",
            engine::COMMENT_MAX_LEN
        )));
    }

    let comment = state
        .engine
        .add_comment(&id, payload.name.as_deref(), &payload.text)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentCreated { id: comment.id })))
}
