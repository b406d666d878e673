//! Approved grievance officer entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "officer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Department the officer handles complaints for.
    pub department: String,

    /// Stored role string, always `ROLE_OFFICER` for this table.
    pub role: String,

    /// URL of the uploaded verification certificate, if any.
    #[sea_orm(nullable)]
    pub certificate_url: Option<String>,

    /// When the admin approved this officer.
    pub approved_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
