//! Canvas LMS integration.
//!
//! Canvas is the system of record for user accounts, so this side only
//! reads: enrolled students are matched against the Canvas course roster
//! and flagged as existing or missing. Account creation happens through
//! the SIS CSV export instead.

use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Deserialize;
use tracing::{debug, info, trace, warn};

use model::entities::student::{self, CanvasStatus};
use model::entities::classroom;

use crate::config::CanvasSettings;
use crate::error::{GatevasError, Result};
use crate::services::enrollment;

const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CanvasUser {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub login_id: Option<String>,
}

pub struct CanvasClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl CanvasClient {
    pub fn new(settings: &CanvasSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_token: settings.api_token.clone(),
        }
    }

    /// Fetches the full user roster of a Canvas course, following the
    /// page parameter until a short page signals the end.
    pub async fn course_users(&self, course_id: i64) -> Result<Vec<CanvasUser>> {
        trace!("Entering course_users function");

        let url = format!("{}/api/v1/courses/{}/users", self.base_url, course_id);
        let mut users = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.api_token)
                .query(&[("per_page", PAGE_SIZE.to_string()), ("page", page.to_string())])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(GatevasError::Api {
                    message: format!(
                        "Canvas user listing for course {} failed with status {}",
                        course_id,
                        response.status()
                    ),
                });
            }

            let batch: Vec<CanvasUser> = response.json().await?;
            let batch_len = batch.len();
            users.extend(batch);

            if batch_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!("Fetched {} users for Canvas course {}.", users.len(), course_id);
        Ok(users)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SyncSummary {
    pub total: usize,
    pub exists: usize,
    pub missing: usize,
}

/// True when any roster entry carries the email, either in the email
/// field or as the login id. Our SIS export sets the login id to the
/// email, and Canvas hides the email field on some tokens, so both count.
fn roster_contains(roster: &[CanvasUser], email: &str) -> bool {
    roster.iter().any(|user| {
        let by_email = user
            .email
            .as_deref()
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(email));
        let by_login = user
            .login_id
            .as_deref()
            .is_some_and(|login| login.eq_ignore_ascii_case(email));
        by_email || by_login
    })
}

/// Compares the classroom's enrolled students against the Canvas roster
/// and stores the verdict on each student. Nothing is written to Canvas.
pub async fn sync_users_read_only(
    db: &DatabaseConnection,
    client: &CanvasClient,
    classroom: &classroom::Model,
) -> Result<SyncSummary> {
    trace!("Entering sync_users_read_only function");

    let Some(course_id) = classroom.canvas_course_id else {
        warn!(
            "Classroom '{}' has no Canvas course attached.",
            classroom.short_name
        );
        return Ok(SyncSummary::default());
    };

    let roster = client.course_users(course_id).await?;
    apply_roster(db, classroom, &roster).await
}

/// Marks every enrolled student as existing or missing in Canvas. Split
/// from [`sync_users_read_only`] so the marking logic can run against a
/// fabricated roster, without a live Canvas endpoint.
pub(crate) async fn apply_roster(
    db: &DatabaseConnection,
    classroom: &classroom::Model,
    roster: &[CanvasUser],
) -> Result<SyncSummary> {
    let students = enrollment::students_in_classroom(db, classroom).await?;

    let mut summary = SyncSummary {
        total: students.len(),
        ..Default::default()
    };

    for student in students {
        let status = if roster_contains(roster, &student.email) {
            summary.exists += 1;
            CanvasStatus::Exists
        } else {
            summary.missing += 1;
            CanvasStatus::Missing
        };

        if student.canvas_status != status {
            let mut active: student::ActiveModel = student.into();
            active.canvas_status = Set(status);
            active.update(db).await?;
        }
    }

    info!(
        "Canvas sync for '{}': {} enrolled, {} exist, {} missing.",
        classroom.short_name, summary.total, summary.exists, summary.missing
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: Option<&str>, login_id: Option<&str>) -> CanvasUser {
        CanvasUser {
            id: 1,
            name: "Test User".to_string(),
            email: email.map(str::to_string),
            login_id: login_id.map(str::to_string),
        }
    }

    #[test]
    fn test_roster_contains_matches_email_case_insensitively() {
        let roster = vec![user(Some("Kari@Example.No"), None)];
        assert!(roster_contains(&roster, "kari@example.no"));
        assert!(!roster_contains(&roster, "ola@example.no"));
    }

    #[test]
    fn test_roster_contains_falls_back_to_login_id() {
        let roster = vec![user(None, Some("kari@example.no"))];
        assert!(roster_contains(&roster, "kari@example.no"));
        assert!(!roster_contains(&[], "kari@example.no"));
    }
}
