//! Complaint entity and its status/priority enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "UNDER_REVIEW")]
    UnderReview,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "ESCALATED")]
    Escalated,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl ComplaintStatus {
    /// The stored status token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Assigned => "ASSIGNED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Escalated => "ESCALATED",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }

    /// Parse a status token. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "ASSIGNED" => Some(Self::Assigned),
            "UNDER_REVIEW" => Some(Self::UnderReview),
            "IN_PROGRESS" => Some(Self::InProgress),
            "ESCALATED" => Some(Self::Escalated),
            "RESOLVED" => Some(Self::Resolved),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }

    /// Lowercase hyphenated form used in analytics breakdowns.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::UnderReview => "under-review",
            Self::InProgress => "in-progress",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

/// Priority of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum ComplaintPriority {
    #[sea_orm(string_value = "URGENT")]
    Urgent,
    #[sea_orm(string_value = "HIGH")]
    High,
    #[sea_orm(string_value = "MEDIUM")]
    #[default]
    Medium,
    #[sea_orm(string_value = "LOW")]
    Low,
}

impl ComplaintPriority {
    /// The stored priority token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "URGENT",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Parse a priority token. Input is uppercased before matching,
    /// so `"high"` and `"HIGH"` both parse.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "URGENT" => Some(Self::Urgent),
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    /// Whether this priority triggers automatic officer assignment.
    #[must_use]
    pub const fn is_auto_assignable(self) -> bool {
        matches!(self, Self::Urgent | Self::High)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Citizen-facing reference, `GRV-YYYYMMDD-NNNNN`.
    pub reference_number: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    pub status: ComplaintStatus,

    pub priority: ComplaintPriority,

    /// Email of the submitting citizen.
    pub submitted_by: String,

    /// Whether the submitter asked not to be named publicly.
    pub is_anonymous: bool,

    /// Email of the assigned officer, if any.
    #[sea_orm(nullable)]
    pub assigned_to: Option<String>,

    /// Department of the assigned officer, if any.
    #[sea_orm(nullable)]
    pub assigned_department: Option<String>,

    pub escalated: bool,

    pub escalation_level: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub escalation_reason: Option<String>,

    #[sea_orm(nullable)]
    pub escalated_at: Option<DateTimeWithTimeZone>,

    /// URLs of uploaded attachments.
    #[sea_orm(column_type = "Json")]
    pub attachments: Json,

    pub created_at: DateTimeWithTimeZone,

    pub last_updated: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint_reply::Entity")]
    Replies,

    #[sea_orm(has_many = "super::complaint_note::Entity")]
    Notes,

    #[sea_orm(has_many = "super::complaint_status_history::Entity")]
    StatusHistory,
}

impl Related<super::complaint_reply::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Replies.def()
    }
}

impl Related<super::complaint_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notes.def()
    }
}

impl Related<super::complaint_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_sensitive() {
        assert_eq!(ComplaintStatus::parse("RESOLVED"), Some(ComplaintStatus::Resolved));
        assert_eq!(ComplaintStatus::parse("resolved"), None);
        assert_eq!(ComplaintStatus::parse("Resolved"), None);
        assert_eq!(ComplaintStatus::parse("DONE"), None);
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!(ComplaintPriority::parse("HIGH"), Some(ComplaintPriority::High));
        assert_eq!(ComplaintPriority::parse("high"), Some(ComplaintPriority::High));
        assert_eq!(ComplaintPriority::parse("Urgent"), Some(ComplaintPriority::Urgent));
        assert_eq!(ComplaintPriority::parse("critical"), None);
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(ComplaintPriority::default(), ComplaintPriority::Medium);
    }

    #[test]
    fn test_auto_assignable_priorities() {
        assert!(ComplaintPriority::Urgent.is_auto_assignable());
        assert!(ComplaintPriority::High.is_auto_assignable());
        assert!(!ComplaintPriority::Medium.is_auto_assignable());
        assert!(!ComplaintPriority::Low.is_auto_assignable());
    }

    #[test]
    fn test_status_slugs_are_hyphenated() {
        assert_eq!(ComplaintStatus::InProgress.slug(), "in-progress");
        assert_eq!(ComplaintStatus::UnderReview.slug(), "under-review");
        assert_eq!(ComplaintStatus::Pending.slug(), "pending");
    }
}
