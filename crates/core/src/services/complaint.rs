//! Complaint lifecycle service.

use chrono::Utc;
use sea_orm::Set;

use grievance_common::{AppError, AppResult, IdGenerator, generate_reference_number};
use grievance_db::entities::complaint::{ComplaintPriority, ComplaintStatus};
use grievance_db::entities::{
    complaint, complaint_note, complaint_reply, complaint_status_history,
};
use grievance_db::repositories::{
    ComplaintNoteRepository, ComplaintReplyRepository, ComplaintRepository,
    ComplaintStatusHistoryRepository, OfficerRepository, UserRepository,
};

use crate::services::assignment::AssignmentEngine;
use crate::services::notifier::Notifier;

/// Input for a new complaint.
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: Option<String>,
    /// Priority token; defaults to MEDIUM when absent.
    pub priority: Option<String>,
    /// Hide the submitter's name from public views.
    pub is_anonymous: bool,
    /// URLs of already-stored attachments.
    pub attachments: Vec<String>,
}

/// A complaint with its conversation and audit trail.
#[derive(Debug, Clone)]
pub struct ComplaintDetail {
    pub complaint: complaint::Model,
    pub replies: Vec<complaint_reply::Model>,
    pub notes: Vec<complaint_note::Model>,
    pub history: Vec<complaint_status_history::Model>,
}

/// Complaint lifecycle service.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    reply_repo: ComplaintReplyRepository,
    note_repo: ComplaintNoteRepository,
    history_repo: ComplaintStatusHistoryRepository,
    officer_repo: OfficerRepository,
    user_repo: UserRepository,
    assignment: AssignmentEngine,
    notifier: Notifier,
    id_gen: IdGenerator,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub const fn new(
        complaint_repo: ComplaintRepository,
        reply_repo: ComplaintReplyRepository,
        note_repo: ComplaintNoteRepository,
        history_repo: ComplaintStatusHistoryRepository,
        officer_repo: OfficerRepository,
        user_repo: UserRepository,
        assignment: AssignmentEngine,
        notifier: Notifier,
    ) -> Self {
        Self {
            complaint_repo,
            reply_repo,
            note_repo,
            history_repo,
            officer_repo,
            user_repo,
            assignment,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new complaint.
    ///
    /// HIGH and URGENT complaints are auto-assigned to the least-loaded
    /// officer. When no officers exist the complaint stays PENDING. The
    /// submitter is notified of the resulting status either way.
    pub async fn submit(
        &self,
        submitted_by: &str,
        input: NewComplaint,
    ) -> AppResult<complaint::Model> {
        let priority = match input.priority.as_deref() {
            None | Some("") => ComplaintPriority::default(),
            Some(token) => ComplaintPriority::parse(token)
                .ok_or_else(|| AppError::InvalidPriority(token.to_string()))?,
        };

        // Submissions require a resolvable citizen account
        self.user_repo.get_by_email(submitted_by).await?;

        let now = Utc::now();
        let model = complaint::ActiveModel {
            id: Set(self.id_gen.generate()),
            reference_number: Set(generate_reference_number()),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(input.category),
            location: Set(input.location),
            status: Set(ComplaintStatus::Pending),
            priority: Set(priority),
            submitted_by: Set(submitted_by.to_string()),
            is_anonymous: Set(input.is_anonymous),
            assigned_to: Set(None),
            assigned_department: Set(None),
            escalated: Set(false),
            escalation_level: Set(0),
            escalation_reason: Set(None),
            escalated_at: Set(None),
            attachments: Set(serde_json::json!(input.attachments)),
            created_at: Set(now.into()),
            last_updated: Set(now.into()),
            last_updated_by: Set(None),
        };

        let mut created = self.complaint_repo.create(model).await?;
        tracing::info!(
            reference = %created.reference_number,
            priority = priority.as_str(),
            "Complaint submitted"
        );

        self.record_history(&created.id, ComplaintStatus::Pending, "Initial submission", submitted_by)
            .await?;

        if priority.is_auto_assignable() {
            created = self.auto_assign(created).await?;
        }

        self.notifier.status_update(
            &created.submitted_by,
            &created.reference_number,
            created.status.as_str(),
        );

        Ok(created)
    }

    async fn auto_assign(&self, existing: complaint::Model) -> AppResult<complaint::Model> {
        let Some(officer) = self.assignment.pick_least_loaded().await? else {
            tracing::warn!(
                reference = %existing.reference_number,
                "No officers available for auto-assignment"
            );
            return Ok(existing);
        };

        let complaint_id = existing.id.clone();
        let now = Utc::now();

        let mut model: complaint::ActiveModel = existing.into();
        model.assigned_to = Set(Some(officer.email.clone()));
        model.assigned_department = Set(Some(officer.department.clone()));
        model.status = Set(ComplaintStatus::Assigned);
        model.last_updated = Set(now.into());
        let updated = self.complaint_repo.update(model).await?;

        // Auto-assignment is not attributable to any person
        self.record_history(
            &complaint_id,
            ComplaintStatus::Assigned,
            &format!("Auto-assigned to {}", officer.full_name),
            "system",
        )
        .await?;

        tracing::info!(
            reference = %updated.reference_number,
            officer = %officer.email,
            "Complaint auto-assigned"
        );
        self.notifier
            .assignment(&officer.email, &updated.reference_number, &updated.title);

        Ok(updated)
    }

    /// Update the status of a complaint.
    pub async fn update_status(
        &self,
        id: &str,
        status_token: &str,
        changed_by: &str,
    ) -> AppResult<complaint::Model> {
        let status = ComplaintStatus::parse(status_token)
            .ok_or_else(|| AppError::InvalidStatus(status_token.to_string()))?;

        let existing = self.complaint_repo.get_by_id(id).await?;
        let submitted_by = existing.submitted_by.clone();

        let mut model: complaint::ActiveModel = existing.into();
        model.status = Set(status);
        model.last_updated = Set(Utc::now().into());
        model.last_updated_by = Set(Some(changed_by.to_string()));
        let updated = self.complaint_repo.update(model).await?;

        self.record_history(
            id,
            status,
            &format!("Status updated to {}", status.as_str()),
            changed_by,
        )
        .await?;

        self.notifier
            .status_update(&submitted_by, &updated.reference_number, status.as_str());

        Ok(updated)
    }

    /// Update the priority of a complaint.
    ///
    /// Priority changes are not recorded in the status history.
    pub async fn update_priority(
        &self,
        id: &str,
        priority_token: &str,
        changed_by: &str,
    ) -> AppResult<complaint::Model> {
        let priority = ComplaintPriority::parse(priority_token)
            .ok_or_else(|| AppError::InvalidPriority(priority_token.to_string()))?;

        let existing = self.complaint_repo.get_by_id(id).await?;

        let mut model: complaint::ActiveModel = existing.into();
        model.priority = Set(priority);
        model.last_updated = Set(Utc::now().into());
        model.last_updated_by = Set(Some(changed_by.to_string()));
        self.complaint_repo.update(model).await
    }

    /// Escalate a complaint to the given level.
    ///
    /// Records the level and reason. The status is left untouched;
    /// escalation is an orthogonal flag.
    pub async fn escalate(
        &self,
        id: &str,
        level: i32,
        reason: &str,
        escalated_by: &str,
    ) -> AppResult<complaint::Model> {
        let existing = self.complaint_repo.get_by_id(id).await?;
        let submitted_by = existing.submitted_by.clone();
        let assigned_to = existing.assigned_to.clone();
        let now = Utc::now();

        let mut model: complaint::ActiveModel = existing.into();
        model.escalated = Set(true);
        model.escalation_level = Set(level);
        model.escalation_reason = Set(Some(reason.to_string()));
        model.escalated_at = Set(Some(now.into()));
        model.last_updated = Set(now.into());
        model.last_updated_by = Set(Some(escalated_by.to_string()));
        let updated = self.complaint_repo.update(model).await?;

        tracing::info!(
            reference = %updated.reference_number,
            level,
            "Complaint escalated"
        );

        self.notifier
            .escalation(&submitted_by, &updated.reference_number, level, reason);
        if let Some(officer_email) = assigned_to {
            self.notifier
                .escalation(&officer_email, &updated.reference_number, level, reason);
        }

        Ok(updated)
    }

    /// Manually assign a complaint to an officer by email.
    pub async fn assign_officer(
        &self,
        id: &str,
        officer_email: &str,
        assigned_by: &str,
    ) -> AppResult<complaint::Model> {
        let officer = self
            .officer_repo
            .find_by_email(officer_email)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("No approved officer with email {officer_email}"))
            })?;

        let existing = self.complaint_repo.get_by_id(id).await?;
        let submitted_by = existing.submitted_by.clone();

        let mut model: complaint::ActiveModel = existing.into();
        model.assigned_to = Set(Some(officer.email.clone()));
        model.assigned_department = Set(Some(officer.department.clone()));
        model.status = Set(ComplaintStatus::Assigned);
        model.last_updated = Set(Utc::now().into());
        model.last_updated_by = Set(Some(assigned_by.to_string()));
        let updated = self.complaint_repo.update(model).await?;

        self.record_history(
            id,
            ComplaintStatus::Assigned,
            &format!("Assigned to {}", officer.full_name),
            assigned_by,
        )
        .await?;

        self.notifier
            .assignment(&officer.email, &updated.reference_number, &updated.title);
        self.notifier.status_update(
            &submitted_by,
            &updated.reference_number,
            ComplaintStatus::Assigned.as_str(),
        );

        Ok(updated)
    }

    /// Add a note. Private notes are hidden from the submitting citizen.
    pub async fn add_note(
        &self,
        complaint_id: &str,
        author: &str,
        note: &str,
        is_private: bool,
    ) -> AppResult<complaint_note::Model> {
        // Ensure the complaint exists before attaching anything
        self.complaint_repo.get_by_id(complaint_id).await?;

        let model = complaint_note::ActiveModel {
            id: Set(self.id_gen.generate()),
            complaint_id: Set(complaint_id.to_string()),
            author: Set(author.to_string()),
            note: Set(note.to_string()),
            is_private: Set(is_private),
            created_at: Set(Utc::now().into()),
        };
        self.note_repo.create(model).await
    }

    /// Add a public reply visible to the submitter.
    pub async fn add_reply(
        &self,
        complaint_id: &str,
        author: &str,
        author_role: &str,
        message: &str,
    ) -> AppResult<complaint_reply::Model> {
        self.complaint_repo.get_by_id(complaint_id).await?;

        let model = complaint_reply::ActiveModel {
            id: Set(self.id_gen.generate()),
            complaint_id: Set(complaint_id.to_string()),
            author: Set(author.to_string()),
            author_role: Set(author_role.to_string()),
            message: Set(message.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.reply_repo.create(model).await
    }

    /// Fetch a complaint with replies, notes and history.
    pub async fn get_detail(&self, id: &str) -> AppResult<ComplaintDetail> {
        let complaint = self.complaint_repo.get_by_id(id).await?;
        let replies = self.reply_repo.find_by_complaint(id).await?;
        let notes = self.note_repo.find_by_complaint(id).await?;
        let history = self.history_repo.find_by_complaint(id).await?;

        Ok(ComplaintDetail {
            complaint,
            replies,
            notes,
            history,
        })
    }

    /// List all complaints, newest first.
    pub async fn get_all(&self) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_all().await
    }

    /// List complaints submitted by a citizen. The email must belong to a
    /// known account.
    pub async fn get_by_submitter(&self, email: &str) -> AppResult<Vec<complaint::Model>> {
        self.user_repo.get_by_email(email).await?;
        self.complaint_repo.find_by_submitter(email).await
    }

    /// List complaints assigned to an officer email.
    pub async fn get_by_assignee(&self, email: &str) -> AppResult<Vec<complaint::Model>> {
        self.complaint_repo.find_by_assigned_to(email).await
    }

    async fn record_history(
        &self,
        complaint_id: &str,
        status: ComplaintStatus,
        note: &str,
        changed_by: &str,
    ) -> AppResult<()> {
        let model = complaint_status_history::ActiveModel {
            id: Set(self.id_gen.generate()),
            complaint_id: Set(complaint_id.to_string()),
            status: Set(status),
            note: Set(note.to_string()),
            changed_by: Set(changed_by.to_string()),
            created_at: Set(Utc::now().into()),
        };
        self.history_repo.create(model).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::email::EmailService;
    use grievance_db::entities::{officer, user};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn no_rows_mock<M: sea_orm::IntoMockRow>() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<M>::new()])
                .into_connection(),
        )
    }

    fn test_service(
        complaint_db: Arc<sea_orm::DatabaseConnection>,
        officer_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ComplaintService {
        test_service_with_history(complaint_db, empty_mock(), officer_db, user_db)
    }

    fn test_service_with_history(
        complaint_db: Arc<sea_orm::DatabaseConnection>,
        history_db: Arc<sea_orm::DatabaseConnection>,
        officer_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ComplaintService {
        let email = EmailService::new(None, "https://desk.example.com").unwrap();
        ComplaintService::new(
            ComplaintRepository::new(complaint_db.clone()),
            ComplaintReplyRepository::new(empty_mock()),
            ComplaintNoteRepository::new(empty_mock()),
            ComplaintStatusHistoryRepository::new(history_db),
            OfficerRepository::new(officer_db.clone()),
            UserRepository::new(user_db),
            AssignmentEngine::new(
                OfficerRepository::new(officer_db),
                ComplaintRepository::new(complaint_db),
            ),
            Notifier::new(email),
        )
    }

    fn new_complaint(priority: Option<&str>) -> NewComplaint {
        NewComplaint {
            title: "Broken street light".to_string(),
            description: "The light at 5th and Main is out".to_string(),
            category: "Infrastructure".to_string(),
            location: Some("5th and Main".to_string()),
            priority: priority.map(String::from),
            is_anonymous: false,
            attachments: vec![],
        }
    }

    fn stored_complaint(
        status: ComplaintStatus,
        priority: ComplaintPriority,
    ) -> complaint::Model {
        let now = Utc::now();
        complaint::Model {
            id: "01arz3ndektsv4rrffq69g5fav".to_string(),
            reference_number: "GRV-20260829-00001".to_string(),
            title: "Broken street light".to_string(),
            description: "The light at 5th and Main is out".to_string(),
            category: "Infrastructure".to_string(),
            location: Some("5th and Main".to_string()),
            status,
            priority,
            submitted_by: "citizen@example.com".to_string(),
            is_anonymous: false,
            assigned_to: None,
            assigned_department: None,
            escalated: false,
            escalation_level: 0,
            escalation_reason: None,
            escalated_at: None,
            attachments: serde_json::json!([]),
            created_at: now.into(),
            last_updated: now.into(),
            last_updated_by: None,
        }
    }

    fn test_citizen() -> user::Model {
        user::Model {
            id: "01arz3ndektsv4rrffq69g5faw".to_string(),
            full_name: "Test Citizen".to_string(),
            email: "citizen@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            role: user::Role::Citizen,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_officer(email: &str) -> officer::Model {
        officer::Model {
            id: format!("id-{email}"),
            full_name: "Officer Grey".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            department: "Infrastructure".to_string(),
            role: "ROLE_OFFICER".to_string(),
            certificate_url: None,
            approved_at: Utc::now().into(),
            created_at: Utc::now().into(),
        }
    }

    fn history_row(
        status: ComplaintStatus,
        note: &str,
        changed_by: &str,
    ) -> complaint_status_history::Model {
        complaint_status_history::Model {
            id: "01arz3ndektsv4rrffq69g5fax".to_string(),
            complaint_id: "01arz3ndektsv4rrffq69g5fav".to_string(),
            status,
            note: note.to_string(),
            changed_by: changed_by.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }]
    }

    #[tokio::test]
    async fn test_submit_default_priority_stays_pending() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_citizen()]])
                .into_connection(),
        );
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![stored_complaint(
                    ComplaintStatus::Pending,
                    ComplaintPriority::Medium,
                )]])
                .into_connection(),
        );
        let history_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![history_row(
                    ComplaintStatus::Pending,
                    "Initial submission",
                    "citizen@example.com",
                )]])
                .into_connection(),
        );

        let service = test_service_with_history(complaint_db, history_db, empty_mock(), user_db);
        let created = service
            .submit("citizen@example.com", new_complaint(None))
            .await
            .unwrap();

        // Medium priority never triggers auto-assignment
        assert_eq!(created.status, ComplaintStatus::Pending);
        assert_eq!(created.priority, ComplaintPriority::Medium);
        assert!(created.assigned_to.is_none());
    }

    #[tokio::test]
    async fn test_submit_high_priority_is_auto_assigned() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_citizen()]])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_officer("grey@example.com")]])
                .into_connection(),
        );

        let mut assigned = stored_complaint(ComplaintStatus::Assigned, ComplaintPriority::High);
        assigned.assigned_to = Some("grey@example.com".to_string());
        assigned.assigned_department = Some("Infrastructure".to_string());

        // Insert, then the officer's current load, then the assignment update
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![stored_complaint(
                    ComplaintStatus::Pending,
                    ComplaintPriority::High,
                )]])
                .append_query_results([count_result(0)])
                .append_query_results([vec![assigned]])
                .into_connection(),
        );
        let history_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![history_row(
                        ComplaintStatus::Pending,
                        "Initial submission",
                        "citizen@example.com",
                    )],
                    vec![history_row(
                        ComplaintStatus::Assigned,
                        "Auto-assigned to Officer Grey",
                        "system",
                    )],
                ])
                .into_connection(),
        );

        let service = test_service_with_history(complaint_db, history_db, officer_db, user_db);
        let created = service
            .submit("citizen@example.com", new_complaint(Some("HIGH")))
            .await
            .unwrap();

        assert_eq!(created.status, ComplaintStatus::Assigned);
        assert_eq!(created.assigned_to.as_deref(), Some("grey@example.com"));
        assert_eq!(created.assigned_department.as_deref(), Some("Infrastructure"));
    }

    #[tokio::test]
    async fn test_escalate_sets_fields_without_changing_status() {
        let mut escalated = stored_complaint(ComplaintStatus::InProgress, ComplaintPriority::Medium);
        escalated.escalated = true;
        escalated.escalation_level = 2;
        escalated.escalation_reason = Some("No progress in 30 days".to_string());
        escalated.escalated_at = Some(Utc::now().into());
        escalated.last_updated_by = Some("citizen@example.com".to_string());

        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![stored_complaint(
                        ComplaintStatus::InProgress,
                        ComplaintPriority::Medium,
                    )],
                    vec![escalated],
                ])
                .into_connection(),
        );

        let service = test_service(complaint_db, empty_mock(), empty_mock());
        let updated = service
            .escalate(
                "01arz3ndektsv4rrffq69g5fav",
                2,
                "No progress in 30 days",
                "citizen@example.com",
            )
            .await
            .unwrap();

        assert!(updated.escalated);
        assert_eq!(updated.escalation_level, 2);
        assert_eq!(updated.escalation_reason.as_deref(), Some("No progress in 30 days"));
        assert!(updated.escalated_at.is_some());
        // Escalation is orthogonal to the workflow status
        assert_eq!(updated.status, ComplaintStatus::InProgress);
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_priority() {
        let service = test_service(empty_mock(), empty_mock(), empty_mock());

        let result = service
            .submit("citizen@example.com", new_complaint(Some("CRITICAL")))
            .await;

        assert!(matches!(result, Err(AppError::InvalidPriority(token)) if token == "CRITICAL"));
    }

    #[tokio::test]
    async fn test_submit_rejects_unknown_submitter() {
        let user_db = no_rows_mock::<grievance_db::entities::user::Model>();
        let service = test_service(empty_mock(), empty_mock(), user_db);

        let result = service
            .submit("ghost@example.com", new_complaint(None))
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(email)) if email == "ghost@example.com"));
    }

    #[tokio::test]
    async fn test_update_status_rejects_lowercase_token() {
        let service = test_service(empty_mock(), empty_mock(), empty_mock());

        // Token matching is exact; "resolved" is not a valid status
        let result = service
            .update_status("some-id", "resolved", "admin@example.com")
            .await;

        assert!(matches!(result, Err(AppError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_update_status_missing_complaint() {
        let complaint_db = no_rows_mock::<complaint::Model>();
        let service = test_service(complaint_db, empty_mock(), empty_mock());

        let result = service
            .update_status("missing-id", "RESOLVED", "admin@example.com")
            .await;

        assert!(matches!(result, Err(AppError::ComplaintNotFound(id)) if id == "missing-id"));
    }

    #[tokio::test]
    async fn test_update_priority_missing_complaint() {
        let complaint_db = no_rows_mock::<complaint::Model>();
        let service = test_service(complaint_db, empty_mock(), empty_mock());

        let result = service
            .update_priority("missing-id", "low", "admin@example.com")
            .await;

        assert!(matches!(result, Err(AppError::ComplaintNotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_officer_unknown_email() {
        let officer_db = no_rows_mock::<grievance_db::entities::officer::Model>();
        let service = test_service(empty_mock(), officer_db, empty_mock());

        let result = service
            .assign_officer("some-id", "ghost@example.com", "admin@example.com")
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_by_submitter_unknown_email() {
        let user_db = no_rows_mock::<grievance_db::entities::user::Model>();
        let service = test_service(empty_mock(), empty_mock(), user_db);

        let result = service.get_by_submitter("ghost@example.com").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
