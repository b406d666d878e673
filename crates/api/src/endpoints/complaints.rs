//! Complaint endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{get, post},
};
use grievance_common::{AppError, AppResult, storage::sanitize_file_name};
use grievance_core::complaint::NewComplaint;
use grievance_db::entities::{complaint, complaint_note, complaint_reply, complaint_status_history};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extractors::{AuthUser, StaffUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Complaint representation returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub reference_number: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    pub status: String,
    pub priority: String,
    pub submitted_by: String,
    pub is_anonymous: bool,
    pub assigned_to: Option<String>,
    pub assigned_department: Option<String>,
    pub escalated: bool,
    pub escalation_level: i32,
    pub escalation_reason: Option<String>,
    pub escalated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub attachments: Vec<String>,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub last_updated: chrono::DateTime<chrono::FixedOffset>,
    pub last_updated_by: Option<String>,
}

impl From<complaint::Model> for ComplaintResponse {
    fn from(model: complaint::Model) -> Self {
        let attachments = serde_json::from_value(model.attachments).unwrap_or_default();
        Self {
            id: model.id,
            reference_number: model.reference_number,
            title: model.title,
            description: model.description,
            category: model.category,
            location: model.location,
            status: model.status.as_str().to_string(),
            priority: model.priority.as_str().to_string(),
            submitted_by: model.submitted_by,
            is_anonymous: model.is_anonymous,
            assigned_to: model.assigned_to,
            assigned_department: model.assigned_department,
            escalated: model.escalated,
            escalation_level: model.escalation_level,
            escalation_reason: model.escalation_reason,
            escalated_at: model.escalated_at,
            attachments,
            created_at: model.created_at,
            last_updated: model.last_updated,
            last_updated_by: model.last_updated_by,
        }
    }
}

/// Public reply representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub author: String,
    pub author_role: String,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<complaint_reply::Model> for ReplyResponse {
    fn from(model: complaint_reply::Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            author_role: model.author_role,
            message: model.message,
            created_at: model.created_at,
        }
    }
}

/// Note representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: String,
    pub author: String,
    pub note: String,
    pub is_private: bool,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<complaint_note::Model> for NoteResponse {
    fn from(model: complaint_note::Model) -> Self {
        Self {
            id: model.id,
            author: model.author,
            note: model.note,
            is_private: model.is_private,
            created_at: model.created_at,
        }
    }
}

/// Status history entry representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub status: String,
    pub note: String,
    pub changed_by: String,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
}

impl From<complaint_status_history::Model> for HistoryResponse {
    fn from(model: complaint_status_history::Model) -> Self {
        Self {
            status: model.status.as_str().to_string(),
            note: model.note,
            changed_by: model.changed_by,
            created_at: model.created_at,
        }
    }
}

/// Full complaint detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDetailResponse {
    #[serde(flatten)]
    pub complaint: ComplaintResponse,
    pub replies: Vec<ReplyResponse>,
    pub notes: Vec<NoteResponse>,
    pub history: Vec<HistoryResponse>,
}

/// Complaint submission request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 10_000))]
    pub description: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    pub location: Option<String>,

    /// Priority token; defaults to MEDIUM when absent.
    pub priority: Option<String>,

    #[serde(default)]
    pub is_anonymous: bool,
}

/// Submit a complaint.
async fn submit(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitComplaintRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    req.validate()?;

    let complaint = state
        .complaint_service
        .submit(
            &claims.sub,
            NewComplaint {
                title: req.title,
                description: req.description,
                category: req.category,
                location: req.location,
                priority: req.priority,
                is_anonymous: req.is_anonymous,
                attachments: vec![],
            },
        )
        .await?;

    Ok(ApiResponse::ok(complaint.into()))
}

/// Submit a complaint with file attachments (multipart form).
async fn submit_with_attachments(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut location = None;
    let mut priority = None;
    let mut is_anonymous = false;
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "description" => description = Some(read_text(field).await?),
            "category" => category = Some(read_text(field).await?),
            "location" => location = Some(read_text(field).await?),
            "priority" => priority = Some(read_text(field).await?),
            "isAnonymous" => is_anonymous = read_text(field).await? == "true",
            "attachment" => {
                let file_name = field.file_name().unwrap_or("file").to_string();
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
                attachments.push(stored.url);
            }
            _ => {}
        }
    }

    let complaint = state
        .complaint_service
        .submit(
            &claims.sub,
            NewComplaint {
                title: title.ok_or_else(|| AppError::BadRequest("Missing title".to_string()))?,
                description: description
                    .ok_or_else(|| AppError::BadRequest("Missing description".to_string()))?,
                category: category
                    .ok_or_else(|| AppError::BadRequest("Missing category".to_string()))?,
                location,
                priority,
                is_anonymous,
                attachments,
            },
        )
        .await?;

    Ok(ApiResponse::ok(complaint.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {e}")))
}

/// Query for listing a submitter's complaints.
#[derive(Debug, Deserialize)]
pub struct SubmitterQuery {
    pub email: Option<String>,
}

/// List the complaints of a submitter.
///
/// Citizens may only list their own; staff may pass any email.
async fn by_submitter(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SubmitterQuery>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let email = query.email.unwrap_or_else(|| claims.sub.clone());
    if email != claims.sub && !claims.is_admin() && !claims.is_officer() {
        return Err(AppError::Forbidden(
            "Cannot view another citizen's complaints".to_string(),
        ));
    }

    let complaints = state.complaint_service.get_by_submitter(&email).await?;
    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// List all complaints (staff only).
async fn list_all(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<ComplaintResponse>>> {
    let complaints = state.complaint_service.get_all().await?;
    Ok(ApiResponse::ok(
        complaints.into_iter().map(Into::into).collect(),
    ))
}

/// Fetch one complaint with replies, notes and history.
///
/// Private notes are only included for staff. Citizens can only view
/// complaints they submitted.
async fn detail(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ComplaintDetailResponse>> {
    let detail = state.complaint_service.get_detail(&id).await?;
    let is_staff = claims.is_admin() || claims.is_officer();

    if !is_staff && detail.complaint.submitted_by != claims.sub {
        return Err(AppError::Forbidden(
            "Cannot view another citizen's complaint".to_string(),
        ));
    }

    Ok(ApiResponse::ok(ComplaintDetailResponse {
        complaint: detail.complaint.into(),
        replies: detail.replies.into_iter().map(Into::into).collect(),
        notes: detail
            .notes
            .into_iter()
            .filter(|n| is_staff || !n.is_private)
            .map(Into::into)
            .collect(),
        history: detail.history.into_iter().map(Into::into).collect(),
    }))
}

/// Status update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Update the status of a complaint (staff only).
async fn update_status(
    StaffUser(claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let complaint = state
        .complaint_service
        .update_status(&id, &req.status, &claims.sub)
        .await?;
    Ok(ApiResponse::ok(complaint.into()))
}

/// Priority update request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriorityRequest {
    pub priority: String,
}

/// Update the priority of a complaint (staff only).
async fn update_priority(
    StaffUser(claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePriorityRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    let complaint = state
        .complaint_service
        .update_priority(&id, &req.priority, &claims.sub)
        .await?;
    Ok(ApiResponse::ok(complaint.into()))
}

/// Escalation request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EscalateRequest {
    #[validate(range(min = 1, max = 10))]
    pub level: i32,

    #[validate(length(min = 1, max = 2000))]
    pub reason: String,
}

/// Escalate a complaint.
async fn escalate(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EscalateRequest>,
) -> AppResult<ApiResponse<ComplaintResponse>> {
    req.validate()?;
    let complaint = state
        .complaint_service
        .escalate(&id, req.level, &req.reason, &claims.sub)
        .await?;
    Ok(ApiResponse::ok(complaint.into()))
}

/// Note request. Notes default to private (staff-only).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,

    pub is_private: Option<bool>,
}

/// Add a note (staff only).
async fn add_note(
    StaffUser(claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddNoteRequest>,
) -> AppResult<ApiResponse<NoteResponse>> {
    req.validate()?;
    let note = state
        .complaint_service
        .add_note(&id, &claims.sub, &req.content, req.is_private.unwrap_or(true))
        .await?;
    Ok(ApiResponse::ok(note.into()))
}

/// Public reply request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddReplyRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

/// Add a public reply to the complaint conversation.
async fn add_reply(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AddReplyRequest>,
) -> AppResult<ApiResponse<ReplyResponse>> {
    req.validate()?;
    let reply = state
        .complaint_service
        .add_reply(&id, &claims.sub, &claims.role, &req.content)
        .await?;
    Ok(ApiResponse::ok(reply.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all))
        .route("/submit", post(submit))
        .route("/submit-with-files", post(submit_with_attachments))
        .route("/user", get(by_submitter))
        .route("/{id}", get(detail))
        .route("/{id}/status", post(update_status))
        .route("/{id}/priority", post(update_priority))
        .route("/{id}/escalate", post(escalate))
        .route("/{id}/notes", post(add_note))
        .route("/{id}/replies", post(add_reply))
}
