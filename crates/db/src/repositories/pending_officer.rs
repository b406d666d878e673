//! Pending officer repository.

use std::sync::Arc;

use crate::entities::{PendingOfficer, pending_officer};
use grievance_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Repository for officer registrations awaiting approval.
#[derive(Clone)]
pub struct PendingOfficerRepository {
    db: Arc<DatabaseConnection>,
}

impl PendingOfficerRepository {
    /// Create a new pending officer repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a pending registration by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<pending_officer::Model>> {
        PendingOfficer::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a pending registration by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<pending_officer::Model>> {
        PendingOfficer::find()
            .filter(pending_officer::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List pending registrations, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<pending_officer::Model>> {
        PendingOfficer::find()
            .order_by_asc(pending_officer::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a pending registration.
    pub async fn create(
        &self,
        model: pending_officer::ActiveModel,
    ) -> AppResult<pending_officer::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a pending registration.
    pub async fn delete(&self, model: pending_officer::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a pending registration by ID, ignoring whether it existed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<()> {
        PendingOfficer::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
