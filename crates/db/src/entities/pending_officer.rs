//! Officer registration awaiting admin approval.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pending_officer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub department: String,

    /// URL of the uploaded verification certificate, if any.
    #[sea_orm(nullable)]
    pub certificate_url: Option<String>,

    /// Approval flag. Stays false for the lifetime of the row; approval
    /// promotes the registration to the officer table and deletes it.
    pub approved: bool,

    /// When the registration was submitted.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
