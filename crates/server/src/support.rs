//! Support toggle API endpoints

use api_types::support::{SupportCheck, SupportState, SupportToggle};
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState};

pub async fn toggle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SupportToggle>,
) -> Result<Json<SupportState>, ServerError> {
    let (supported, support_count) = state
        .engine
        .toggle_support(&id, &payload.user_identifier)
        .await?;

    Ok(Json(SupportState {
        supported,
        support_count,
    }))
}

pub async fn check(
    State(state): State<ServerState>,
    Path((id, user_identifier)): Path<(String, String)>,
) -> Result<Json<SupportCheck>, ServerError> {
    let supported = state.engine.has_supported(&id, &user_identifier).await?;

    Ok(Json(SupportCheck { supported }))
}
