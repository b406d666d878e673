//! HTTP API layer for the grievance backend.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: authentication, complaints, officers, admin
//! - **Extractors**: bearer-token authentication and role checks
//! - **Middleware**: token verification
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
