//! Complaint API endpoints

use api_types::ComplaintStatus as ApiStatus;
use api_types::complaint::{
    ComplaintCreated, ComplaintListResponse, ComplaintNew, ComplaintView, StatusUpdate,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, comments, server::ServerState};

fn map_status(status: engine::ComplaintStatus) -> ApiStatus {
    match status {
        engine::ComplaintStatus::Pending => ApiStatus::Pending,
        engine::ComplaintStatus::Resolved => ApiStatus::Resolved,
    }
}

pub(crate) fn map_complaint(complaint: engine::Complaint) -> ComplaintView {
    ComplaintView {
        id: complaint.id,
        student_name: complaint.student_name,
        email: complaint.email,
        title: complaint.title,
        description: complaint.description,
        category: complaint.category,
        location: complaint.location,
        status: map_status(complaint.status),
        support_count: complaint.support_count,
        images: complaint.images,
        comments: complaint
            .comments
            .into_iter()
            .map(comments::map_comment)
            .collect(),
        created_at: complaint.created_at,
        updated_at: complaint.updated_at,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ComplaintListResponse>, ServerError> {
    let complaints = state.engine.list_complaints().await?;

    Ok(Json(ComplaintListResponse {
        complaints: complaints.into_iter().map(map_complaint).collect(),
    }))
}

pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<ComplaintNew>,
) -> Result<(StatusCode, Json<ComplaintCreated>), ServerError> {
    let id = state
        .engine
        .submit_complaint(engine::ComplaintDraft {
            student_name: payload.student_name,
            email: payload.email,
            title: payload.title,
            description: payload.description,
            category: payload.category,
            location: payload.location,
            images: payload.images,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ComplaintCreated { id })))
}

pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> Result<StatusCode, ServerError> {
    let status = match payload.status {
        ApiStatus::Pending => engine::ComplaintStatus::Pending,
        ApiStatus::Resolved => engine::ComplaintStatus::Resolved,
    };
    state.engine.update_complaint_status(&id, status).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_complaint(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
