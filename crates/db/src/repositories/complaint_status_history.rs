//! Complaint status history repository.

use std::sync::Arc;

use crate::entities::{ComplaintStatusHistory, complaint_status_history};
use grievance_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Repository for complaint status transitions.
#[derive(Clone)]
pub struct ComplaintStatusHistoryRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintStatusHistoryRepository {
    /// Create a new status history repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List history entries for a complaint, oldest first.
    pub async fn find_by_complaint(
        &self,
        complaint_id: &str,
    ) -> AppResult<Vec<complaint_status_history::Model>> {
        ComplaintStatusHistory::find()
            .filter(complaint_status_history::Column::ComplaintId.eq(complaint_id))
            .order_by_asc(complaint_status_history::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a history entry.
    pub async fn create(
        &self,
        model: complaint_status_history::ActiveModel,
    ) -> AppResult<complaint_status_history::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
