//! Location registry API endpoints

use api_types::location::{LocationListResponse, LocationNew};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<LocationListResponse>, ServerError> {
    let locations = state.engine.locations().await?;

    Ok(Json(LocationListResponse { locations }))
}

pub async fn add(
    State(state): State<ServerState>,
    Json(payload): Json<LocationNew>,
) -> Result<StatusCode, ServerError> {
    let added = state.engine.add_location(&payload.name).await?;
    if !added {
        return Err(ServerError::Conflict(format!(
            "location already exists: {}",
            payload.name.trim()
        )));
    }

    Ok(StatusCode::CREATED)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ServerError> {
    let deleted = state.engine.delete_location(&name).await?;
    if !deleted {
        return Err(ServerError::NotFound(format!("no such location: {name}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
