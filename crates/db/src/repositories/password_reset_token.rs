//! Password reset token repository.

use std::sync::Arc;

use crate::entities::{PasswordResetToken, password_reset_token};
use grievance_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Repository for single-use password reset tokens.
#[derive(Clone)]
pub struct PasswordResetTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl PasswordResetTokenRepository {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a token record.
    pub async fn find(&self, token: &str) -> AppResult<Option<password_reset_token::Model>> {
        PasswordResetToken::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a token record.
    pub async fn create(
        &self,
        model: password_reset_token::ActiveModel,
    ) -> AppResult<password_reset_token::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a token record by value.
    pub async fn delete(&self, token: &str) -> AppResult<()> {
        PasswordResetToken::delete_by_id(token)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
