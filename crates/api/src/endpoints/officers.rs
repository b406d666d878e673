//! Officer endpoints.

use axum::{
    Router,
    extract::{Multipart, Query, State},
    routing::{get, post},
};
use grievance_common::{AppError, AppResult, storage::sanitize_file_name};
use grievance_core::approval::OfficerRegistration;
use grievance_db::entities::{officer, pending_officer};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::complaints::ComplaintResponse,
    extractors::{AdminUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Approved officer representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub certificate_url: Option<String>,
    pub approved_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<officer::Model> for OfficerResponse {
    fn from(model: officer::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            department: model.department,
            certificate_url: model.certificate_url,
            approved_at: model.approved_at,
        }
    }
}

/// Pending officer registration representation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOfficerResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub certificate_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<pending_officer::Model> for PendingOfficerResponse {
    fn from(model: pending_officer::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            department: model.department,
            certificate_url: model.certificate_url,
            created_at: model.created_at,
        }
    }
}

/// Officer registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerRegisterResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub department: String,
}

/// Register an officer account (multipart form with optional certificate).
///
/// The registration lands in the pending queue and requires admin
/// approval before login is possible.
async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<OfficerRegisterResponse>> {
    let mut full_name = None;
    let mut email = None;
    let mut password = None;
    let mut department = None;
    let mut certificate_url = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "fullName" => full_name = Some(read_text(field).await?),
            "email" => email = Some(read_text(field).await?),
            "password" => password = Some(read_text(field).await?),
            "department" => department = Some(read_text(field).await?),
            "certificate" => {
                let file_name = field.file_name().unwrap_or("certificate").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

                let key = sanitize_file_name(&file_name);
                let stored = state.storage.upload(&key, &data, &content_type).await?;
                certificate_url = Some(stored.url);
            }
            _ => {}
        }
    }

    let password = password.ok_or_else(|| AppError::BadRequest("Missing password".to_string()))?;
    if password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let pending = state
        .approval_service
        .register_officer(OfficerRegistration {
            full_name: full_name
                .ok_or_else(|| AppError::BadRequest("Missing fullName".to_string()))?,
            email: email.ok_or_else(|| AppError::BadRequest("Missing email".to_string()))?,
            password,
            department: department
                .ok_or_else(|| AppError::BadRequest("Missing department".to_string()))?,
            certificate_url,
        })
        .await?;

    Ok(ApiResponse::ok(OfficerRegisterResponse {
        id: pending.id,
        email: pending.email,
        full_name: pending.full_name,
        department: pending.department,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {e}")))
}

/// List approved officers (admin only).
async fn list_officers(
    AdminUser(_claims): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<OfficerResponse>>> {
    let officers = state.approval_service.officers().await?;
    Ok(ApiResponse::ok(
        officers.into_iter().map(Into::into).collect(),
    ))
}

/// List pending officer registrations (admin only).
async fn list_pending(
    AdminUser(_claims): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PendingOfficerResponse>>> {
    let pending = state.approval_service.pending().await?;
    Ok(ApiResponse::ok(pending.into_iter().map(Into::into).collect()))
}

/// Query for an officer's worklist.
#[derive(Debug, Deserialize)]
pub struct WorklistQuery {
    pub email: Option<String>,
}

/// List the complaints assigned to an officer.
///
/// Defaults to the authenticated officer; admins may pass any email.
async fn worklist(
    StaffUser(claims): StaffUser,
    State(state): State<AppState>,
    Query(query): Query<WorklistQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let email = query.email.unwrap_or_else(|| claims.sub.clone());
    if email != claims.sub && !claims.is_admin() {
        return Err(AppError::Forbidden(
            "Cannot view another officer's worklist".to_string(),
        ));
    }

    let complaints = state.complaint_service.get_by_assignee(&email).await?;
    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_officers))
        .route("/register", post(register))
        .route("/pending", get(list_pending))
        .route("/complaints", get(worklist))
}
