//! Complaint note repository.

use std::sync::Arc;

use crate::entities::{ComplaintNote, complaint_note};
use grievance_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Repository for internal staff notes on complaints.
#[derive(Clone)]
pub struct ComplaintNoteRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintNoteRepository {
    /// Create a new note repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List notes for a complaint, oldest first.
    pub async fn find_by_complaint(
        &self,
        complaint_id: &str,
    ) -> AppResult<Vec<complaint_note::Model>> {
        ComplaintNote::find()
            .filter(complaint_note::Column::ComplaintId.eq(complaint_id))
            .order_by_asc(complaint_note::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a note.
    pub async fn create(
        &self,
        model: complaint_note::ActiveModel,
    ) -> AppResult<complaint_note::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
