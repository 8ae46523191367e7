use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{AdminAuth, ServerState};

async fn test_router() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    server::router(ServerState {
        engine: Arc::new(engine),
        admin: AdminAuth {
            username: "Campuz".to_string(),
            password: "Campuz@001".to_string(),
        },
    })
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn submit_complaint(app: &Router, title: &str, category: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({
                "title": title,
                "description": "something broke",
                "category": category,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn submit_then_list_round_trip() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({
                "student_name": "Riya",
                "email": "riya@example.edu",
                "title": "Broken fan",
                "description": "Ceiling fan in room 12 does not start",
                "category": "Hostel",
                "location": "Hostel A",
                "images": ["img-one", "img-two"],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get("/api/complaints")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let complaints = body["complaints"].as_array().unwrap();
    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0]["id"].as_str(), Some(id.as_str()));
    assert_eq!(complaints[0]["student_name"], "Riya");
    assert_eq!(complaints[0]["status"], "pending");
    assert_eq!(complaints[0]["support_count"], 0);
    assert_eq!(complaints[0]["images"], json!(["img-one", "img-two"]));
    assert_eq!(complaints[0]["comments"], json!([]));
}

#[tokio::test]
async fn submit_validation_failures_are_422() {
    let app = test_router().await;

    // Field missing entirely: rejected at deserialization.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({ "description": "x", "category": "Campus" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Field present but blank: rejected by the engine.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({ "title": "   ", "description": "x", "category": "Campus" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({ "title": "t", "description": "x", "category": "Quidditch" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("unknown category"));

    let response = app.clone().oneshot(get("/api/complaints")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["complaints"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn status_update_and_delete_flow() {
    let app = test_router().await;
    let id = submit_complaint(&app, "Pothole", "Roadways").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/complaints/{id}/status"),
            json!({ "status": "resolved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get("/api/complaints")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["complaints"][0]["status"], "resolved");

    // Statuses outside the closed set never reach the engine.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/complaints/{id}/status"),
            json!({ "status": "sideways" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/complaints/no-such-id/status",
            json!({ "status": "resolved" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/complaints/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(get("/api/complaints")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["complaints"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(delete(&format!("/api/complaints/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn support_toggle_and_check() {
    let app = test_router().await;
    let id = submit_complaint(&app, "Pothole", "Roadways").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/complaints/{id}/support"),
            json!({ "user_identifier": "device-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["supported"], true);
    assert_eq!(body["support_count"], 1);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/complaints/{id}/support/device-1")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["supported"], true);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/complaints/{id}/support"),
            json!({ "user_identifier": "device-1" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["supported"], false);
    assert_eq!(body["support_count"], 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints/no-such-id/support",
            json!({ "user_identifier": "device-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The check endpoint treats unknown complaints as plain "not supported".
    let response = app
        .clone()
        .oneshot(get("/api/complaints/no-such-id/support/device-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["supported"], false);
}

#[tokio::test]
async fn comments_default_name_and_validation() {
    let app = test_router().await;
    let id = submit_complaint(&app, "Pothole", "Roadways").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/complaints/{id}/comments"),
            json!({ "text": " same here " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["id"].as_str().is_some());

    let response = app.clone().oneshot(get("/api/complaints")).await.unwrap();
    let body = body_json(response).await;
    let comments = body["complaints"][0]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["name"], "Anonymous");
    assert_eq!(comments[0]["text"], "same here");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/complaints/{id}/comments"),
            json!({ "text": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Over the length bound: rejected before the engine is called.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/complaints/{id}/comments"),
            json!({ "text": "x".repeat(501) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints/no-such-id/comments",
            json!({ "text": "hello" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_category_conflicts() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            json!({ "name": "Electrical" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/categories",
            json!({ "name": "Electrical" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app.clone().oneshot(get("/api/categories")).await.unwrap();
    let body = body_json(response).await;
    let names = body["categories"].as_array().unwrap();
    assert_eq!(
        names.iter().filter(|name| *name == "Electrical").count(),
        1
    );

    let response = app
        .clone()
        .oneshot(delete("/api/categories/Electrical"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete("/api/categories/Electrical"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Seeded name with a slash must survive the URL round trip.
    let response = app
        .clone()
        .oneshot(delete("/api/categories/Transport%2FBus"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn locations_follow_the_same_contract() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/locations",
            json!({ "name": "Rooftop Garden" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/locations",
            json!({ "name": "Rooftop Garden" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(delete("/api/locations/Rooftop%20Garden"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(delete("/api/locations/Rooftop%20Garden"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stats_zero_fill_per_registry() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/complaints",
            json!({
                "title": "Pothole",
                "description": "deep one",
                "category": "Campus",
                "location": "Main Campus",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["resolved"], 0);
    assert_eq!(body["by_category"]["Campus"], 1);
    assert_eq!(body["by_category"]["Others"], 0);
    assert_eq!(body["by_location"]["Main Campus"], 1);
    assert_eq!(body["by_location"]["Library"], 0);
}

#[tokio::test]
async fn admin_login_round_trip() {
    let app = test_router().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            json!({ "username": "Campuz", "password": "Campuz@001" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/login",
            json!({ "username": "Campuz", "password": "nope" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_router().await;

    let response = app.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
}
