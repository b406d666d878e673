//! Officer repository.

use std::sync::Arc;

use crate::entities::{Officer, officer};
use grievance_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Officer repository for database operations.
#[derive(Clone)]
pub struct OfficerRepository {
    db: Arc<DatabaseConnection>,
}

impl OfficerRepository {
    /// Create a new officer repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an officer by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<officer::Model>> {
        Officer::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an officer by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<officer::Model>> {
        Officer::find()
            .filter(officer::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all approved officers, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<officer::Model>> {
        Officer::find()
            .order_by_asc(officer::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new officer.
    pub async fn create(&self, model: officer::ActiveModel) -> AppResult<officer::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an officer.
    pub async fn update(&self, model: officer::ActiveModel) -> AppResult<officer::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an officer.
    pub async fn delete(&self, model: officer::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
