//! Business logic services.

#![allow(missing_docs)]

pub mod analytics;
pub mod approval;
pub mod assignment;
pub mod auth;
pub mod complaint;
pub mod email;
pub mod notifier;
pub mod token;

pub use analytics::AnalyticsService;
pub use approval::OfficerApprovalService;
pub use assignment::AssignmentEngine;
pub use auth::AuthService;
pub use complaint::ComplaintService;
pub use email::EmailService;
pub use notifier::Notifier;
pub use token::{Claims, TokenService};
