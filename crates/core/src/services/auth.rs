//! Authentication and account lifecycle.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sea_orm::Set;

use grievance_common::{AppError, AppResult, IdGenerator};
use grievance_db::entities::user::Role;
use grievance_db::entities::{password_reset_token, pending_officer, user};
use grievance_db::repositories::{
    OfficerRepository, PasswordResetTokenRepository, PendingOfficerRepository, UserRepository,
};

use crate::services::notifier::Notifier;
use crate::services::token::TokenService;

/// Reset tokens are valid for one hour from issuance.
const RESET_TOKEN_VALIDITY_HOURS: i64 = 1;

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// Account email.
    pub email: String,
    /// Account display name.
    pub full_name: String,
    /// Stored role string.
    pub role: String,
}

/// Resolved account behind a bearer token.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    officer_repo: OfficerRepository,
    pending_officer_repo: PendingOfficerRepository,
    reset_token_repo: PasswordResetTokenRepository,
    token_service: TokenService,
    notifier: Notifier,
    id_gen: IdGenerator,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        officer_repo: OfficerRepository,
        pending_officer_repo: PendingOfficerRepository,
        reset_token_repo: PasswordResetTokenRepository,
        token_service: TokenService,
        notifier: Notifier,
    ) -> Self {
        Self {
            user_repo,
            officer_repo,
            pending_officer_repo,
            reset_token_repo,
            token_service,
            notifier,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register an account.
    ///
    /// Citizens and admins are created directly. An officer registration is
    /// parked in the pending queue instead and reported as
    /// [`AppError::PendingApproval`]; no login is possible until an admin
    /// approves it.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<user::Model> {
        if role == Role::Officer {
            return self.stage_officer(full_name, email, password).await;
        }
        self.ensure_email_unused(email).await?;

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(full_name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            role: Set(role),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;
        tracing::info!(email = %created.email, role = created.role.as_str(), "Account registered");

        self.notifier.welcome(&created.email, &created.full_name);
        Ok(created)
    }

    /// Park an officer registration in the pending queue.
    ///
    /// The public form carries no department, so the row is created with a
    /// placeholder until an admin approves it. Always returns an error: the
    /// caller must not treat staging as a live account.
    async fn stage_officer(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        if self
            .pending_officer_repo
            .find_by_email(email)
            .await?
            .is_some()
        {
            return Err(AppError::PendingApproval(
                "Your officer registration is already pending approval".to_string(),
            ));
        }
        self.ensure_email_unused(email).await?;

        let model = pending_officer::ActiveModel {
            id: Set(self.id_gen.generate()),
            full_name: Set(full_name.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            department: Set("Unassigned".to_string()),
            certificate_url: Set(None),
            approved: Set(false),
            created_at: Set(Utc::now().into()),
        };
        self.pending_officer_repo.create(model).await?;
        tracing::info!(email = %email, "Officer registration staged for approval");

        Err(AppError::PendingApproval(
            "Officer registration submitted for admin approval. You cannot log in yet".to_string(),
        ))
    }

    /// Resolve the account behind an authenticated email.
    pub async fn current_account(&self, email: &str) -> AppResult<AccountInfo> {
        if let Some(account) = self.user_repo.find_by_email(email).await? {
            return Ok(AccountInfo {
                id: account.id,
                email: account.email,
                full_name: account.full_name,
                role: account.role.as_str().to_string(),
            });
        }
        if let Some(officer) = self.officer_repo.find_by_email(email).await? {
            return Ok(AccountInfo {
                id: officer.id,
                email: officer.email,
                full_name: officer.full_name,
                role: officer.role,
            });
        }
        Err(AppError::UserNotFound(email.to_string()))
    }

    /// Log in with email and password.
    ///
    /// Citizens and admins live in the user table; approved officers in the
    /// officer table. An applicant whose registration is still pending gets
    /// a distinct error so the frontend can explain the wait.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        if let Some(account) = self.user_repo.find_by_email(email).await? {
            if !verify_password(password, &account.password_hash)? {
                return Err(AppError::InvalidCredentials("Invalid password".to_string()));
            }
            let role = account.role.as_str();
            return Ok(LoginOutcome {
                token: self.token_service.issue(&account.email, role)?,
                email: account.email,
                full_name: account.full_name,
                role: role.to_string(),
            });
        }

        if let Some(officer) = self.officer_repo.find_by_email(email).await? {
            if !verify_password(password, &officer.password_hash)? {
                return Err(AppError::InvalidCredentials("Invalid password".to_string()));
            }
            return Ok(LoginOutcome {
                token: self.token_service.issue(&officer.email, &officer.role)?,
                email: officer.email,
                full_name: officer.full_name,
                role: officer.role,
            });
        }

        if self
            .pending_officer_repo
            .find_by_email(email)
            .await?
            .is_some()
        {
            return Err(AppError::PendingApproval(
                "Your officer registration is awaiting admin approval".to_string(),
            ));
        }

        Err(AppError::InvalidCredentials(
            "No account found for this email".to_string(),
        ))
    }

    /// Issue a password reset token and email it to the account holder.
    ///
    /// Unknown emails are silently ignored so the endpoint cannot be used
    /// to enumerate accounts.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let known = self.user_repo.find_by_email(email).await?.is_some()
            || self.officer_repo.find_by_email(email).await?.is_some();
        if !known {
            tracing::debug!(email = %email, "Reset requested for unknown email, ignoring");
            return Ok(());
        }

        let now = Utc::now();
        let token = self.id_gen.generate_token();
        let model = password_reset_token::ActiveModel {
            token: Set(token.clone()),
            email: Set(email.to_string()),
            expires_at: Set((now + chrono::Duration::hours(RESET_TOKEN_VALIDITY_HOURS)).into()),
            created_at: Set(now.into()),
        };
        self.reset_token_repo.create(model).await?;

        tracing::info!(email = %email, "Password reset token issued");
        self.notifier.password_reset(email, &token);
        Ok(())
    }

    /// Redeem a reset token and set a new password.
    ///
    /// Tokens are single-use: the record is deleted whether redemption
    /// succeeds or the token turns out to be expired.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let record = self
            .reset_token_repo
            .find(token)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or unknown reset token".to_string()))?;

        if record.expires_at < Utc::now() {
            self.reset_token_repo.delete(token).await?;
            return Err(AppError::BadRequest("Reset token has expired".to_string()));
        }

        let hash = hash_password(new_password)?;

        if let Some(account) = self.user_repo.find_by_email(&record.email).await? {
            let mut model: user::ActiveModel = account.into();
            model.password_hash = Set(hash);
            model.updated_at = Set(Some(Utc::now().into()));
            self.user_repo.update(model).await?;
            self.reset_token_repo.delete(token).await?;
            return Ok(());
        }

        if let Some(officer) = self.officer_repo.find_by_email(&record.email).await? {
            let mut model: grievance_db::entities::officer::ActiveModel = officer.into();
            model.password_hash = Set(hash);
            self.officer_repo.update(model).await?;
            self.reset_token_repo.delete(token).await?;
            return Ok(());
        }

        self.reset_token_repo.delete(token).await?;
        Err(AppError::BadRequest(
            "No account associated with this token".to_string(),
        ))
    }

    async fn ensure_email_unused(&self, email: &str) -> AppResult<()> {
        let taken = self.user_repo.find_by_email(email).await?.is_some()
            || self.officer_repo.find_by_email(email).await?.is_some()
            || self
                .pending_officer_repo
                .find_by_email(email)
                .await?
                .is_some();

        if taken {
            return Err(AppError::EmailAlreadyRegistered(email.to_string()));
        }
        Ok(())
    }
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use grievance_db::entities::{officer, pending_officer};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn empty_mock() -> Arc<sea_orm::DatabaseConnection> {
        Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection())
    }

    fn test_service(
        user_db: Arc<sea_orm::DatabaseConnection>,
        officer_db: Arc<sea_orm::DatabaseConnection>,
        pending_db: Arc<sea_orm::DatabaseConnection>,
        reset_db: Arc<sea_orm::DatabaseConnection>,
    ) -> AuthService {
        let email = crate::services::email::EmailService::new(None, "https://desk.example.com")
            .unwrap();
        AuthService::new(
            UserRepository::new(user_db),
            OfficerRepository::new(officer_db),
            PendingOfficerRepository::new(pending_db),
            PasswordResetTokenRepository::new(reset_db),
            TokenService::new("test-secret", 24),
            Notifier::new(email),
        )
    }

    fn test_user(email: &str, password: &str) -> user::Model {
        user::Model {
            id: "01arz3ndektsv4rrffq69g5fav".to_string(),
            full_name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: Role::Citizen,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(hash.len() > 50);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(verify_password("test_password_123", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("test_password_123").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("test", "invalid_hash").is_err());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<pending_officer::Model>::new()])
                .into_connection(),
        );

        let service = test_service(user_db, officer_db, pending_db, empty_mock());
        let result = service.login("nobody@example.com", "password").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_user("alice@example.com", "correct")]])
                .into_connection(),
        );

        let service = test_service(user_db, empty_mock(), empty_mock(), empty_mock());
        let result = service.login("alice@example.com", "wrong").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_token() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_user("alice@example.com", "correct")]])
                .into_connection(),
        );

        let service = test_service(user_db, empty_mock(), empty_mock(), empty_mock());
        let outcome = service.login("alice@example.com", "correct").await.unwrap();

        assert_eq!(outcome.email, "alice@example.com");
        assert_eq!(outcome.role, "ROLE_CITIZEN");
        assert!(!outcome.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_pending_officer_gets_distinct_error() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![pending_officer::Model {
                    id: "01arz3ndektsv4rrffq69g5fav".to_string(),
                    full_name: "Pending Officer".to_string(),
                    email: "officer@example.com".to_string(),
                    password_hash: hash_password("pw").unwrap(),
                    department: "Sanitation".to_string(),
                    certificate_url: None,
                    approved: false,
                    created_at: Utc::now().into(),
                }]])
                .into_connection(),
        );

        let service = test_service(user_db, officer_db, pending_db, empty_mock());
        let result = service.login("officer@example.com", "pw").await;

        assert!(matches!(result, Err(AppError::PendingApproval(_))));
    }

    #[tokio::test]
    async fn test_reset_password_unknown_token() {
        let reset_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<password_reset_token::Model>::new()])
                .into_connection(),
        );

        let service = test_service(empty_mock(), empty_mock(), empty_mock(), reset_db);
        let result = service.reset_password("bogus", "newpassword").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    fn reset_token(token: &str, email: &str, ttl_hours: i64) -> password_reset_token::Model {
        let now = Utc::now();
        password_reset_token::Model {
            token: token.to_string(),
            email: email.to_string(),
            expires_at: (now + chrono::Duration::hours(ttl_hours)).into(),
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_reset_password_expired_token_is_consumed() {
        let reset_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![reset_token(
                    "stale-token",
                    "alice@example.com",
                    -2,
                )]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        // The user mock has no results; an expired token must never reach it
        let service = test_service(empty_mock(), empty_mock(), empty_mock(), reset_db);
        let result = service.reset_password("stale-token", "newpassword").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_reset_password_rewrites_hash_and_deletes_token() {
        let account = test_user("alice@example.com", "oldpassword");
        let mut updated = account.clone();
        updated.password_hash = hash_password("newpassword").unwrap();
        updated.updated_at = Some(Utc::now().into());

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![account], vec![updated]])
                .into_connection(),
        );
        let reset_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![reset_token(
                    "fresh-token",
                    "alice@example.com",
                    1,
                )]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = test_service(user_db, empty_mock(), empty_mock(), reset_db);
        service
            .reset_password("fresh-token", "newpassword")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_officer_already_pending() {
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![pending_officer::Model {
                    id: "01arz3ndektsv4rrffq69g5fav".to_string(),
                    full_name: "Eve Officer".to_string(),
                    email: "eve@example.com".to_string(),
                    password_hash: hash_password("pw").unwrap(),
                    department: "Unassigned".to_string(),
                    certificate_url: None,
                    approved: false,
                    created_at: Utc::now().into(),
                }]])
                .into_connection(),
        );

        let service = test_service(empty_mock(), empty_mock(), pending_db, empty_mock());
        let result = service
            .register("Eve Officer", "eve@example.com", "password123", Role::Officer)
            .await;

        assert!(matches!(result, Err(AppError::PendingApproval(_))));
    }

    #[tokio::test]
    async fn test_register_officer_is_staged_not_created() {
        let staged = pending_officer::Model {
            id: "01arz3ndektsv4rrffq69g5fav".to_string(),
            full_name: "Eve Officer".to_string(),
            email: "eve@example.com".to_string(),
            password_hash: hash_password("password123").unwrap(),
            department: "Unassigned".to_string(),
            certificate_url: None,
            approved: false,
            created_at: Utc::now().into(),
        };
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );
        let pending_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    Vec::<pending_officer::Model>::new(),
                    Vec::<pending_officer::Model>::new(),
                    vec![staged],
                ])
                .into_connection(),
        );

        let service = test_service(user_db, officer_db, pending_db, empty_mock());
        let result = service
            .register("Eve Officer", "eve@example.com", "password123", Role::Officer)
            .await;

        // Staging always surfaces as a pending-approval error, never a login
        assert!(matches!(result, Err(AppError::PendingApproval(_))));
    }

    #[tokio::test]
    async fn test_password_reset_request_unknown_email_is_silent() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );

        let service = test_service(user_db, officer_db, empty_mock(), empty_mock());
        service
            .request_password_reset("nobody@example.com")
            .await
            .unwrap();
    }
}
