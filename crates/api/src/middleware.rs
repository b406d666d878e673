//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use grievance_common::storage::StorageBackend;
use grievance_core::{
    AnalyticsService, AuthService, ComplaintService, OfficerApprovalService, TokenService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub complaint_service: ComplaintService,
    pub approval_service: OfficerApprovalService,
    pub analytics_service: AnalyticsService,
    pub token_service: TokenService,
    pub storage: Arc<dyn StorageBackend>,
}

/// Authentication middleware.
///
/// Verifies the bearer token when present and stores the claims in the
/// request extensions. Endpoints that require authentication pull them
/// back out via the extractors.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.token_service.verify(token)
    {
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}
