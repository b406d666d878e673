//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use grievance_common::{AppError, AppResult};
use grievance_db::entities::user::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Account registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Role string; defaults to `ROLE_CITIZEN`. An officer registration is
    /// staged for admin approval and answered with 403 `PENDING_APPROVAL`.
    pub role: Option<String>,
}

/// Registration response. Carries a token so new accounts are logged in
/// immediately.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub token: String,
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Register an account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<ApiResponse<RegisterResponse>> {
    req.validate()?;

    let role = match req.role.as_deref() {
        None | Some("") => Role::Citizen,
        Some(token) => Role::parse(token)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown role: {token}")))?,
    };

    let user = state
        .auth_service
        .register(&req.full_name, &req.email, &req.password, role)
        .await?;
    let token = state.token_service.issue(&user.email, user.role.as_str())?;

    Ok(ApiResponse::ok(RegisterResponse {
        token,
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role.as_str().to_string(),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let outcome = state.auth_service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(LoginResponse {
        token: outcome.token,
        email: outcome.email,
        full_name: outcome.full_name,
        role: outcome.role,
    }))
}

/// Current account response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Resolve the authenticated account.
async fn me(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MeResponse>> {
    let account = state.auth_service.current_account(&claims.sub).await?;
    Ok(ApiResponse::ok(MeResponse {
        id: account.id,
        email: account.email,
        full_name: account.full_name,
        role: account.role,
    }))
}

/// Password reset request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    #[validate(email)]
    pub email: String,
}

/// Request a password reset email.
async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    req.validate()?;
    state.auth_service.request_password_reset(&req.email).await?;

    Ok(ApiResponse::ok(serde_json::json!({
        "message": "If an account exists, a reset email has been sent"
    })))
}

/// Password reset confirmation.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub token: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Redeem a reset token and set a new password.
async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetConfirm>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    req.validate()?;
    state
        .auth_service
        .reset_password(&req.token, &req.new_password)
        .await?;

    Ok(ApiResponse::ok(serde_json::json!({
        "message": "Password updated"
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/password-reset/request", post(request_password_reset))
        .route("/password-reset", post(confirm_password_reset))
}
