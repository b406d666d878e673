//! Admin endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use grievance_common::AppResult;
use grievance_core::analytics::AnalyticsOverview;
use serde::Deserialize;

use crate::{
    endpoints::complaints::ComplaintResponse,
    endpoints::officers::OfficerResponse,
    extractors::AdminUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Approve a pending officer registration.
async fn approve_officer(
    AdminUser(_claims): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OfficerResponse>> {
    let officer = state.approval_service.approve(&id).await?;
    Ok(ApiResponse::ok(officer.into()))
}

/// Reject a pending officer registration.
async fn reject_officer(
    AdminUser(_claims): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.approval_service.reject(&id).await?;
    Ok(ApiResponse::ok(serde_json::json!({
        "message": "Registration rejected"
    })))
}

/// Manual assignment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub officer_email: String,
}

/// Assign a complaint to an approved officer.
async fn assign_complaint(
    AdminUser(claims): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let complaint = state
        .complaint_service
        .assign_officer(&id, &req.officer_email, &claims.sub)
        .await?;
    Ok(ApiResponse::ok(complaint.into()))
}

/// Dashboard analytics overview.
async fn analytics_overview(
    AdminUser(_claims): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AnalyticsOverview>> {
    let overview = state.analytics_service.overview().await?;
    Ok(ApiResponse::ok(overview))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/approve/{id}", post(approve_officer))
        .route("/reject/{id}", post(reject_officer))
        .route("/complaints/{id}/assign", post(assign_complaint))
        .route("/analytics/overview", get(analytics_overview))
}
