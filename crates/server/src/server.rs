use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use chrono::Utc;

use std::sync::Arc;

use crate::{admin, categories, comments, complaints, locations, statistics, support};
use api_types::health::Health;
use engine::Engine;

// Submissions carry base64 image payloads, so the default 2 MiB limit is far
// too small.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Credentials for the single admin account, supplied by configuration.
#[derive(Clone)]
pub struct AdminAuth {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub admin: AdminAuth,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route(
            "/complaints",
            get(complaints::list).post(complaints::submit),
        )
        .route("/complaints/{id}", delete(complaints::remove))
        .route("/complaints/{id}/status", put(complaints::update_status))
        .route("/complaints/{id}/support", post(support::toggle))
        .route(
            "/complaints/{id}/support/{user_identifier}",
            get(support::check),
        )
        .route("/complaints/{id}/comments", post(comments::add))
        .route("/categories", get(categories::list).post(categories::add))
        .route("/categories/{name}", delete(categories::remove))
        .route("/locations", get(locations::list).post(locations::add))
        .route("/locations/{name}", delete(locations::remove))
        .route("/stats", get(statistics::get_stats))
        .route("/admin/login", post(admin::login))
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

pub async fn run(engine: Engine, admin: AdminAuth) {
    let listener = match tokio::net::TcpListener::bind("0.0.0.0:3001").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, admin, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    admin: AdminAuth,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        admin,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    admin: AdminAuth,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, admin, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
