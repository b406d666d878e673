//! Outgoing email via SMTP.

use grievance_common::config::MailConfig;
use grievance_common::{AppError, AppResult};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Email service backed by an SMTP relay.
///
/// When no mail configuration is present the service is disabled:
/// every send becomes a no-op that logs the skipped message.
#[derive(Clone)]
pub struct EmailService {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    portal_url: String,
}

impl EmailService {
    /// Create an email service from optional SMTP configuration.
    pub fn new(mail: Option<&MailConfig>, portal_url: &str) -> AppResult<Self> {
        let Some(mail) = mail else {
            return Ok(Self {
                mailer: None,
                from: None,
                portal_url: portal_url.to_string(),
            });
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&mail.smtp_host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP host: {e}")))?
            .port(mail.smtp_port);

        if let (Some(username), Some(password)) = (&mail.username, &mail.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", mail.from_name, mail.from_address)
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;

        Ok(Self {
            mailer: Some(builder.build()),
            from: Some(from),
            portal_url: portal_url.to_string(),
        })
    }

    /// Whether outgoing mail is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Send a plain-text email.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let (Some(mailer), Some(from)) = (&self.mailer, &self.from) else {
            tracing::info!(to = %to, subject = %subject, "Mail disabled, skipping email");
            return Ok(());
        };

        let message = Message::builder()
            .from(from.clone())
            .to(to
                .parse()
                .map_err(|e| AppError::EmailDelivery(format!("Invalid recipient: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::EmailDelivery(format!("Failed to build message: {e}")))?;

        mailer
            .send(message)
            .await
            .map_err(|e| AppError::EmailDelivery(e.to_string()))?;

        tracing::debug!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }

    /// Welcome email for a newly registered citizen.
    pub async fn send_welcome(&self, to: &str, name: &str) -> AppResult<()> {
        let (subject, body) = render_welcome(name, &self.portal_url);
        self.send(to, &subject, &body).await
    }

    /// Password reset email carrying the reset link.
    pub async fn send_password_reset(&self, to: &str, token: &str) -> AppResult<()> {
        let (subject, body) = render_password_reset(token, &self.portal_url);
        self.send(to, &subject, &body).await
    }

    /// Status change notification to the submitter.
    pub async fn send_status_update(
        &self,
        to: &str,
        reference: &str,
        status: &str,
    ) -> AppResult<()> {
        let (subject, body) = render_status_update(reference, status);
        self.send(to, &subject, &body).await
    }

    /// Escalation notification.
    pub async fn send_escalation(
        &self,
        to: &str,
        reference: &str,
        level: i32,
        reason: &str,
    ) -> AppResult<()> {
        let (subject, body) = render_escalation(reference, level, reason);
        self.send(to, &subject, &body).await
    }

    /// Assignment notification to an officer.
    pub async fn send_assignment(&self, to: &str, reference: &str, title: &str) -> AppResult<()> {
        let (subject, body) = render_assignment(reference, title);
        self.send(to, &subject, &body).await
    }

    /// Approval notification to a newly approved officer.
    pub async fn send_officer_approved(&self, to: &str, name: &str) -> AppResult<()> {
        let (subject, body) = render_officer_approved(name, &self.portal_url);
        self.send(to, &subject, &body).await
    }

    /// Rejection notification to an officer applicant.
    pub async fn send_officer_rejected(&self, to: &str, name: &str) -> AppResult<()> {
        let (subject, body) = render_officer_rejected(name);
        self.send(to, &subject, &body).await
    }
}

fn render_welcome(name: &str, portal_url: &str) -> (String, String) {
    let subject = "Welcome to the Grievance Desk".to_string();
    let body = format!(
        "Hi {name},\n\n\
        Your account has been created. You can now submit complaints and track \
        their progress.\n\n\
        Get started: {portal_url}\n"
    );
    (subject, body)
}

fn render_password_reset(token: &str, portal_url: &str) -> (String, String) {
    let subject = "Password reset request".to_string();
    let body = format!(
        "A password reset was requested for your account.\n\n\
        Use the following link to choose a new password:\n\
        {portal_url}/reset-password?token={token}\n\n\
        The link is valid for one hour. If you did not request this, you can \
        safely ignore this email.\n"
    );
    (subject, body)
}

fn render_status_update(reference: &str, status: &str) -> (String, String) {
    let subject = format!("Update on complaint {reference}");
    let body = format!(
        "Your complaint {reference} has a new status: {status}.\n\n\
        Log in to view the details and any replies from the handling officer.\n"
    );
    (subject, body)
}

fn render_escalation(reference: &str, level: i32, reason: &str) -> (String, String) {
    let subject = format!("Complaint {reference} escalated");
    let body = format!(
        "Complaint {reference} has been escalated to level {level}.\n\n\
        Reason: {reason}\n"
    );
    (subject, body)
}

fn render_assignment(reference: &str, title: &str) -> (String, String) {
    let subject = format!("Complaint {reference} assigned to you");
    let body = format!(
        "The complaint \"{title}\" ({reference}) has been assigned to you.\n\n\
        Please review it and update its status as you make progress.\n"
    );
    (subject, body)
}

fn render_officer_approved(name: &str, portal_url: &str) -> (String, String) {
    let subject = "Your officer account has been approved".to_string();
    let body = format!(
        "Hi {name},\n\n\
        An administrator has approved your officer registration. You can now \
        log in and start handling complaints.\n\n\
        Log in: {portal_url}\n"
    );
    (subject, body)
}

fn render_officer_rejected(name: &str) -> (String, String) {
    let subject = "Your officer registration was not approved".to_string();
    let body = format!(
        "Hi {name},\n\n\
        An administrator has reviewed your officer registration and it was not \
        approved. If you believe this is a mistake, contact the administrator.\n"
    );
    (subject, body)
}
