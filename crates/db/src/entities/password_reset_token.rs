//! Single-use password reset token.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "password_reset_token")]
pub struct Model {
    /// Opaque random token handed out in the reset email.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    /// Email of the account the token belongs to.
    pub email: String,

    /// Tokens are valid for one hour from issuance.
    pub expires_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
