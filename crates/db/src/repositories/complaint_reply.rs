//! Complaint reply repository.

use std::sync::Arc;

use crate::entities::{ComplaintReply, complaint_reply};
use grievance_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Repository for public replies on complaints.
#[derive(Clone)]
pub struct ComplaintReplyRepository {
    db: Arc<DatabaseConnection>,
}

impl ComplaintReplyRepository {
    /// Create a new reply repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List replies for a complaint, oldest first.
    pub async fn find_by_complaint(
        &self,
        complaint_id: &str,
    ) -> AppResult<Vec<complaint_reply::Model>> {
        ComplaintReply::find()
            .filter(complaint_reply::Column::ComplaintId.eq(complaint_id))
            .order_by_asc(complaint_reply::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a reply.
    pub async fn create(
        &self,
        model: complaint_reply::ActiveModel,
    ) -> AppResult<complaint_reply::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
