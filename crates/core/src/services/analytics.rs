//! Dashboard analytics.

use std::collections::BTreeMap;

use serde::Serialize;

use grievance_common::AppResult;
use grievance_db::entities::complaint::{ComplaintPriority, ComplaintStatus};
use grievance_db::repositories::{ComplaintRepository, OfficerRepository};

/// Complaint counts per priority.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub urgent: u64,
}

/// Admin dashboard overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_complaints: u64,
    pub pending: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub resolved: u64,
    /// Complaints at HIGH or URGENT priority.
    pub high_priority: u64,
    pub officers: u64,
    /// Assigned complaint count per officer email.
    pub workload: BTreeMap<String, u64>,
    pub priority_breakdown: PriorityBreakdown,
    /// Complaint count per status slug, e.g. `in-progress`.
    pub status_breakdown: BTreeMap<String, u64>,
}

/// Computes dashboard numbers from the complaint and officer tables.
#[derive(Clone)]
pub struct AnalyticsService {
    complaint_repo: ComplaintRepository,
    officer_repo: OfficerRepository,
}

impl AnalyticsService {
    /// Create a new analytics service.
    #[must_use]
    pub const fn new(complaint_repo: ComplaintRepository, officer_repo: OfficerRepository) -> Self {
        Self {
            complaint_repo,
            officer_repo,
        }
    }

    /// Compute the dashboard overview.
    pub async fn overview(&self) -> AppResult<AnalyticsOverview> {
        let complaints = self.complaint_repo.find_all().await?;
        let officers = self.officer_repo.find_all().await?;

        let mut status_breakdown: BTreeMap<String, u64> = [
            ComplaintStatus::Pending,
            ComplaintStatus::Assigned,
            ComplaintStatus::UnderReview,
            ComplaintStatus::InProgress,
            ComplaintStatus::Escalated,
            ComplaintStatus::Resolved,
            ComplaintStatus::Closed,
        ]
        .iter()
        .map(|s| (s.slug().to_string(), 0))
        .collect();

        let mut priority_breakdown = PriorityBreakdown {
            low: 0,
            medium: 0,
            high: 0,
            urgent: 0,
        };

        let mut workload: BTreeMap<String, u64> =
            officers.iter().map(|o| (o.email.clone(), 0)).collect();

        for complaint in &complaints {
            if let Some(count) = status_breakdown.get_mut(complaint.status.slug()) {
                *count += 1;
            }
            match complaint.priority {
                ComplaintPriority::Low => priority_breakdown.low += 1,
                ComplaintPriority::Medium => priority_breakdown.medium += 1,
                ComplaintPriority::High => priority_breakdown.high += 1,
                ComplaintPriority::Urgent => priority_breakdown.urgent += 1,
            }
            if let Some(assignee) = &complaint.assigned_to {
                *workload.entry(assignee.clone()).or_insert(0) += 1;
            }
        }

        let count_status = |status: ComplaintStatus| {
            complaints.iter().filter(|c| c.status == status).count() as u64
        };

        Ok(AnalyticsOverview {
            total_complaints: complaints.len() as u64,
            pending: count_status(ComplaintStatus::Pending),
            assigned: count_status(ComplaintStatus::Assigned),
            in_progress: count_status(ComplaintStatus::InProgress),
            resolved: count_status(ComplaintStatus::Resolved),
            high_priority: priority_breakdown.high + priority_breakdown.urgent,
            officers: officers.len() as u64,
            workload,
            priority_breakdown,
            status_breakdown,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use grievance_db::entities::{complaint, officer};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_complaint(
        id: &str,
        status: ComplaintStatus,
        priority: ComplaintPriority,
        assigned_to: Option<&str>,
    ) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            reference_number: format!("GRV-20250101-{id:0>5}"),
            title: "Test".to_string(),
            description: "Test".to_string(),
            category: "General".to_string(),
            location: None,
            status,
            priority,
            submitted_by: "citizen@example.com".to_string(),
            is_anonymous: false,
            assigned_to: assigned_to.map(String::from),
            assigned_department: assigned_to.map(|_| "General".to_string()),
            escalated: false,
            escalation_level: 0,
            escalation_reason: None,
            escalated_at: None,
            attachments: serde_json::json!([]),
            created_at: Utc::now().into(),
            last_updated: Utc::now().into(),
            last_updated_by: None,
        }
    }

    fn test_officer(email: &str) -> officer::Model {
        officer::Model {
            id: format!("id-{email}"),
            full_name: format!("Officer {email}"),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            department: "General".to_string(),
            role: "ROLE_OFFICER".to_string(),
            certificate_url: None,
            approved_at: Utc::now().into(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    test_complaint(
                        "1",
                        ComplaintStatus::Pending,
                        ComplaintPriority::Medium,
                        None,
                    ),
                    test_complaint(
                        "2",
                        ComplaintStatus::Assigned,
                        ComplaintPriority::High,
                        Some("a@example.com"),
                    ),
                    test_complaint(
                        "3",
                        ComplaintStatus::InProgress,
                        ComplaintPriority::Urgent,
                        Some("a@example.com"),
                    ),
                    test_complaint(
                        "4",
                        ComplaintStatus::Resolved,
                        ComplaintPriority::Low,
                        Some("b@example.com"),
                    ),
                ]])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![
                    test_officer("a@example.com"),
                    test_officer("b@example.com"),
                ]])
                .into_connection(),
        );

        let service = AnalyticsService::new(
            ComplaintRepository::new(complaint_db),
            OfficerRepository::new(officer_db),
        );
        let overview = service.overview().await.unwrap();

        assert_eq!(overview.total_complaints, 4);
        assert_eq!(overview.pending, 1);
        assert_eq!(overview.assigned, 1);
        assert_eq!(overview.in_progress, 1);
        assert_eq!(overview.resolved, 1);
        assert_eq!(overview.high_priority, 2);
        assert_eq!(overview.officers, 2);
        assert_eq!(overview.workload.get("a@example.com"), Some(&2));
        assert_eq!(overview.workload.get("b@example.com"), Some(&1));
        assert_eq!(
            overview.priority_breakdown,
            PriorityBreakdown {
                low: 1,
                medium: 1,
                high: 1,
                urgent: 1
            }
        );
        assert_eq!(overview.status_breakdown.get("in-progress"), Some(&1));
        assert_eq!(overview.status_breakdown.get("closed"), Some(&0));
    }

    #[tokio::test]
    async fn test_overview_empty_tables() {
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<complaint::Model>::new()])
                .into_connection(),
        );
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );

        let service = AnalyticsService::new(
            ComplaintRepository::new(complaint_db),
            OfficerRepository::new(officer_db),
        );
        let overview = service.overview().await.unwrap();

        assert_eq!(overview.total_complaints, 0);
        assert_eq!(overview.officers, 0);
        assert!(overview.workload.is_empty());
        assert_eq!(overview.status_breakdown.len(), 7);
    }
}
