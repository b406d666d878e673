//! Officer auto-assignment.

use grievance_common::AppResult;
use grievance_db::entities::officer;
use grievance_db::repositories::{ComplaintRepository, OfficerRepository};

/// Picks the least-loaded officer for new high-priority complaints.
///
/// Load is the number of complaints currently assigned to the officer's
/// email. Ties go to the officer listed first (the longest-serving one).
/// The read-then-assign sequence is not atomic, so two simultaneous
/// submissions can land on the same officer.
#[derive(Clone)]
pub struct AssignmentEngine {
    officer_repo: OfficerRepository,
    complaint_repo: ComplaintRepository,
}

impl AssignmentEngine {
    /// Create a new assignment engine.
    #[must_use]
    pub const fn new(officer_repo: OfficerRepository, complaint_repo: ComplaintRepository) -> Self {
        Self {
            officer_repo,
            complaint_repo,
        }
    }

    /// Pick the officer with the fewest assigned complaints.
    ///
    /// Returns `None` when no officers exist; the complaint then stays
    /// unassigned.
    pub async fn pick_least_loaded(&self) -> AppResult<Option<officer::Model>> {
        let officers = self.officer_repo.find_all().await?;
        if officers.is_empty() {
            return Ok(None);
        }

        let mut best: Option<(officer::Model, u64)> = None;
        for candidate in officers {
            let load = self
                .complaint_repo
                .count_by_assigned_to(&candidate.email)
                .await?;
            match &best {
                Some((_, best_load)) if load >= *best_load => {}
                _ => best = Some((candidate, load)),
            }
        }

        Ok(best.map(|(officer, _)| officer))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

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

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }]
    }

    #[tokio::test]
    async fn test_no_officers_yields_none() {
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<officer::Model>::new()])
                .into_connection(),
        );
        let complaint_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let engine = AssignmentEngine::new(
            OfficerRepository::new(officer_db),
            ComplaintRepository::new(complaint_db),
        );

        assert!(engine.pick_least_loaded().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_picks_officer_with_fewest_complaints() {
        let officers = vec![
            test_officer("a@example.com"),
            test_officer("b@example.com"),
            test_officer("c@example.com"),
            test_officer("d@example.com"),
        ];
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([officers])
                .into_connection(),
        );
        // Loads per officer, queried in listing order
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    count_result(3),
                    count_result(1),
                    count_result(1),
                    count_result(2),
                ])
                .into_connection(),
        );

        let engine = AssignmentEngine::new(
            OfficerRepository::new(officer_db),
            ComplaintRepository::new(complaint_db),
        );

        let picked = engine.pick_least_loaded().await.unwrap().unwrap();
        // First officer with the minimal load wins the tie
        assert_eq!(picked.email, "b@example.com");
    }

    #[tokio::test]
    async fn test_single_officer_is_always_picked() {
        let officer_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_officer("only@example.com")]])
                .into_connection(),
        );
        let complaint_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([count_result(42)])
                .into_connection(),
        );

        let engine = AssignmentEngine::new(
            OfficerRepository::new(officer_db),
            ComplaintRepository::new(complaint_db),
        );

        let picked = engine.pick_least_loaded().await.unwrap().unwrap();
        assert_eq!(picked.email, "only@example.com");
    }
}
