//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application role carried by an account and in bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum Role {
    #[sea_orm(string_value = "ROLE_CITIZEN")]
    #[default]
    Citizen,
    #[sea_orm(string_value = "ROLE_OFFICER")]
    Officer,
    #[sea_orm(string_value = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// The stored role string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "ROLE_CITIZEN",
            Self::Officer => "ROLE_OFFICER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse a stored role string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ROLE_CITIZEN" => Some(Self::Citizen),
            "ROLE_OFFICER" => Some(Self::Officer),
            "ROLE_ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Full display name.
    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 password hash. Never serialized to API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Citizen, Role::Officer, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(Role::parse("ADMIN"), None);
        assert_eq!(Role::parse("role_admin"), None);
    }
}
