//! Admin login API endpoint

use api_types::admin::{LoginRequest, LoginResponse};
use axum::{Json, extract::State, http::StatusCode};

use crate::server::ServerState;

/// Check the submitted credentials against the configured admin account.
///
/// There is no session state; clients re-send nothing and simply gate their
/// own admin views on a successful answer.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> (StatusCode, Json<LoginResponse>) {
    let ok =
        payload.username == state.admin.username && payload.password == state.admin.password;

    if ok {
        (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "Login successful".to_string(),
            }),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(LoginResponse {
                success: false,
                message: "Invalid credentials".to_string(),
            }),
        )
    }
}
