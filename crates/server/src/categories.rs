//! Category registry API endpoints

use api_types::category::{CategoryListResponse, CategoryNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state.engine.categories().await?;

    Ok(Json(CategoryListResponse { categories }))
}

pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<StatusCode, ServerError> {
    let added = state.engine.add_category(&payload.name).await?;
    if !added {
        return Err(ServerError::Conflict(format!(
            "category already exists: {}",
            payload.name.trim()
        )));
    }

    Ok(StatusCode::CREATED)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ServerError> {
    let deleted = state.engine.delete_category(&name).await?;
    if !deleted {
        return Err(ServerError::NotFound(format!("no such category: {name}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
