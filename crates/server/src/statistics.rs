//! Statistics API endpoints

use api_types::stats::Statistics;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<Statistics>, ServerError> {
    let stats = state.engine.statistics().await?;

    Ok(Json(Statistics {
        total: stats.total,
        pending: stats.pending,
        resolved: stats.resolved,
        by_category: stats.by_category,
        by_location: stats.by_location,
    }))
}
