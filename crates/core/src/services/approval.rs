//! Officer registration and approval workflow.

use chrono::Utc;
use sea_orm::Set;

use grievance_common::{AppError, AppResult, IdGenerator};
use grievance_db::entities::{officer, pending_officer};
use grievance_db::repositories::{OfficerRepository, PendingOfficerRepository, UserRepository};

use crate::services::auth::hash_password;
use crate::services::notifier::Notifier;

/// Input for an officer registration.
#[derive(Debug, Clone)]
pub struct OfficerRegistration {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub department: String,
    /// URL of the already-stored verification certificate.
    pub certificate_url: Option<String>,
}

/// Manages officer registrations and admin approval decisions.
#[derive(Clone)]
pub struct OfficerApprovalService {
    officer_repo: OfficerRepository,
    pending_officer_repo: PendingOfficerRepository,
    user_repo: UserRepository,
    notifier: Notifier,
    id_gen: IdGenerator,
}

impl OfficerApprovalService {
    /// Create a new approval service.
    #[must_use]
    pub const fn new(
        officer_repo: OfficerRepository,
        pending_officer_repo: PendingOfficerRepository,
        user_repo: UserRepository,
        notifier: Notifier,
    ) -> Self {
        Self {
            officer_repo,
            pending_officer_repo,
            user_repo,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new officer. The account stays pending until an admin
    /// approves it; until then logins are rejected with a pending error.
    pub async fn register_officer(
        &self,
        input: OfficerRegistration,
    ) -> AppResult<pending_officer::Model> {
        let taken = self.user_repo.find_by_email(&input.email).await?.is_some()
            || self
                .officer_repo
                .find_by_email(&input.email)
                .await?
                .is_some()
            || self
                .pending_officer_repo
                .find_by_email(&input.email)
                .await?
                .is_some();
        if taken {
            return Err(AppError::EmailAlreadyRegistered(input.email));
        }

        let model = pending_officer::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            department: Set(input.department),
            certificate_url: Set(input.certificate_url),
            approved: Set(false),
            created_at: Set(Utc::now().into()),
        };

        let created = self.pending_officer_repo.create(model).await?;
        tracing::info!(email = %created.email, "Officer registration submitted for approval");
        Ok(created)
    }

    /// Approve a pending registration, promoting it to a full officer account.
    pub async fn approve(&self, pending_id: &str) -> AppResult<officer::Model> {
        let pending = self
            .pending_officer_repo
            .find_by_id(pending_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Pending officer not found: {pending_id}"))
            })?;

        let now = Utc::now();
        let model = officer::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(pending.full_name.clone()),
            email: Set(pending.email.clone()),
            password_hash: Set(pending.password_hash.clone()),
            department: Set(pending.department.clone()),
            role: Set("ROLE_OFFICER".to_string()),
            certificate_url: Set(pending.certificate_url.clone()),
            approved_at: Set(now.into()),
            created_at: Set(pending.created_at),
        };

        let officer = self.officer_repo.create(model).await?;
        self.pending_officer_repo.delete(pending).await?;

        tracing::info!(email = %officer.email, "Officer registration approved");
        self.notifier
            .officer_approved(&officer.email, &officer.full_name);

        Ok(officer)
    }

    /// Reject a pending registration.
    ///
    /// The applicant is emailed when the record can still be resolved;
    /// the delete itself is unconditional.
    pub async fn reject(&self, pending_id: &str) -> AppResult<()> {
        if let Some(pending) = self.pending_officer_repo.find_by_id(pending_id).await? {
            self.notifier
                .officer_rejected(&pending.email, &pending.full_name);
        }

        self.pending_officer_repo.delete_by_id(pending_id).await?;
        tracing::info!(pending_id = %pending_id, "Officer registration rejected");
        Ok(())
    }

    /// List registrations awaiting a decision.
    pub async fn pending(&self) -> AppResult<Vec<pending_officer::Model>> {
        self.pending_officer_repo.find_all().await
    }

    /// List approved officers.
    pub async fn officers(&self) -> AppResult<Vec<officer::Model>> {
        self.officer_repo.find_all().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::email::EmailService;
    use grievance_db::entities::user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn test_service(
        officer_db: Arc<sea_orm::DatabaseConnection>,
        pending_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
    ) -> OfficerApprovalService {
        let email = EmailService::new(None, "https://desk.example.com").unwrap();
        OfficerApprovalService::new(
            OfficerRepository::new(officer_db),
            PendingOfficerRepository::new(pending_db),
            UserRepository::new(user_db),
            Notifier::new(email),
        )
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![user::Model {
                    id: "01arz3ndektsv4rrffq69g5fav".to_string(),
                    full_name: "Existing User".to_string(),
                    email: "taken@example.com".to_string(),
                    password_hash: "$argon2id$test".to_string(),
                    role: user::Role::Citizen,
                    created_at: Utc::now().into(),
                    updated_at: None,
                }]])
                .into_connection(),
        );

        let service = test_service(empty_mock(), empty_mock(), user_db);
        let result = service
            .register_officer(OfficerRegistration {
                full_name: "New Officer".to_string(),
                email: "taken@example.com".to_string(),
                password: "password".to_string(),
                department: "Sanitation".to_string(),
                certificate_url: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::EmailAlreadyRegistered(_))));
    }

    #[tokio::test]
    async fn test_approve_missing_pending_registration() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<pending_officer::Model>::new()])
                .into_connection(),
        );

        let service = test_service(empty_mock(), pending_db, empty_mock());
        let result = service.approve("missing-id").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    fn pending_registration() -> pending_officer::Model {
        pending_officer::Model {
            id: "01arz3ndektsv4rrffq69g5fav".to_string(),
            full_name: "New Officer".to_string(),
            email: "officer@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
            department: "Sanitation".to_string(),
            certificate_url: None,
            approved: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_approve_promotes_pending_to_officer() {
        let pending = pending_registration();
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![officer::Model {
                    id: "01arz3ndektsv4rrffq69g5faw".to_string(),
                    full_name: pending.full_name.clone(),
                    email: pending.email.clone(),
                    password_hash: pending.password_hash.clone(),
                    department: pending.department.clone(),
                    role: "ROLE_OFFICER".to_string(),
                    certificate_url: None,
                    approved_at: Utc::now().into(),
                    created_at: pending.created_at,
                }]])
                .into_connection(),
        );
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![pending]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = test_service(officer_db, pending_db, empty_mock());
        let officer = service.approve("01arz3ndektsv4rrffq69g5fav").await.unwrap();

        assert_eq!(officer.email, "officer@example.com");
        assert_eq!(officer.department, "Sanitation");
        assert_eq!(officer.role, "ROLE_OFFICER");
    }

    #[tokio::test]
    async fn test_reject_deletes_registration_without_promotion() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![pending_registration()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        // The officer mock has no results, so any promotion attempt would fail
        let service = test_service(empty_mock(), pending_db, empty_mock());
        service.reject("01arz3ndektsv4rrffq69g5fav").await.unwrap();
    }
}
