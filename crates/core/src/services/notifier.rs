//! Fire-and-forget email notifications.
//!
//! Notifications never block or fail the request that triggered them.
//! Each one runs on a detached task; delivery errors are logged and dropped.

use crate::services::email::EmailService;

/// Dispatches notification emails on background tasks.
#[derive(Clone)]
pub struct Notifier {
    email: EmailService,
}

impl Notifier {
    /// Create a notifier over an email service.
    #[must_use]
    pub const fn new(email: EmailService) -> Self {
        Self { email }
    }

    fn spawn<F>(task: F)
    where
        F: std::future::Future<Output = grievance_common::AppResult<()>> + Send + 'static,
    {
        tokio::spawn(async move {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Notification email failed");
            }
        });
    }

    /// Welcome email for a new citizen account.
    pub fn welcome(&self, to: &str, name: &str) {
        let email = self.email.clone();
        let (to, name) = (to.to_string(), name.to_string());
        Self::spawn(async move { email.send_welcome(&to, &name).await });
    }

    /// Password reset link.
    pub fn password_reset(&self, to: &str, token: &str) {
        let email = self.email.clone();
        let (to, token) = (to.to_string(), token.to_string());
        Self::spawn(async move { email.send_password_reset(&to, &token).await });
    }

    /// Status change notification to the submitter.
    pub fn status_update(&self, to: &str, reference: &str, status: &str) {
        let email = self.email.clone();
        let (to, reference, status) = (to.to_string(), reference.to_string(), status.to_string());
        Self::spawn(async move { email.send_status_update(&to, &reference, &status).await });
    }

    /// Escalation notification.
    pub fn escalation(&self, to: &str, reference: &str, level: i32, reason: &str) {
        let email = self.email.clone();
        let (to, reference, reason) = (to.to_string(), reference.to_string(), reason.to_string());
        Self::spawn(async move { email.send_escalation(&to, &reference, level, &reason).await });
    }

    /// Assignment notification to an officer.
    pub fn assignment(&self, to: &str, reference: &str, title: &str) {
        let email = self.email.clone();
        let (to, reference, title) = (to.to_string(), reference.to_string(), title.to_string());
        Self::spawn(async move { email.send_assignment(&to, &reference, &title).await });
    }

    /// Approval notification to a new officer.
    pub fn officer_approved(&self, to: &str, name: &str) {
        let email = self.email.clone();
        let (to, name) = (to.to_string(), name.to_string());
        Self::spawn(async move { email.send_officer_approved(&to, &name).await });
    }

    /// Rejection notification to an officer applicant.
    pub fn officer_rejected(&self, to: &str, name: &str) {
        let email = self.email.clone();
        let (to, name) = (to.to_string(), name.to_string());
        Self::spawn(async move { email.send_officer_rejected(&to, &name).await });
    }
}
