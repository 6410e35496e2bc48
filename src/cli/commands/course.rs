use std::path::Path;

use anyhow::{Context, Result};
use sea_orm::{Database, DatabaseConnection};
use tracing::trace;

use model::entities::course_application::ApplicationStatus;
use model::entities::{classroom, subject};

use crate::canvas::{self, CanvasClient};
use crate::cli::CourseCommand;
use crate::config::Settings;
use crate::mailer;
use crate::services::{course, enrollment, student as student_service};
use crate::sheets::client::SheetsClient;
use crate::sheets::import;

pub async fn course_command(command: CourseCommand, database_url: &str) -> Result<()> {
    trace!("Entering course_command function");

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match command {
        CourseCommand::List => {
            let subjects = course::list_subjects(&db).await?;
            let classrooms = course::list_classrooms(&db).await?;

            for subject in &subjects {
                println!("{} ({})", subject.short_name, subject.long_name);
                for classroom in classrooms.iter().filter(|c| c.subject_id == subject.id) {
                    match classroom.canvas_course_id {
                        Some(id) => println!("  {:<20} canvas course {}", classroom.short_name, id),
                        None => println!("  {}", classroom.short_name),
                    }
                }
            }
            println!("{} subjects, {} classrooms.", subjects.len(), classrooms.len());
        }
        CourseCommand::Create {
            short_name,
            long_name,
            google_sheet_id,
        } => {
            let subject = course::create_subject(&db, &short_name, &long_name, google_sheet_id).await?;
            println!("Subject '{}' ({}) is registered.", subject.short_name, subject.long_name);
        }
        CourseCommand::Classroom {
            subject,
            short_name,
            canvas_course_id,
        } => {
            let classroom =
                course::create_classroom(&db, &subject, &short_name, canvas_course_id).await?;
            println!("Classroom '{}' is registered.", classroom.short_name);
        }
        CourseCommand::Import { subject } => {
            let settings = Settings::load()?;
            let client = SheetsClient::new(&settings.google);
            let subject = require_subject(&db, &subject).await?;

            let students = import::process_sheet(&db, &client, &subject).await?;
            println!(
                "Imported {} students into '{}'.",
                students.len(),
                subject.short_name
            );
        }
        CourseCommand::Status {
            subject,
            email,
            status,
        } => {
            let Some(status) = parse_status(&status) else {
                anyhow::bail!(
                    "Unknown status '{}'. Use applied, accepted, finished, withdrawn or failed.",
                    status
                );
            };

            let subject = require_subject(&db, &subject).await?;
            let Some(student) = student_service::get_by_email(&db, &email).await? else {
                anyhow::bail!("No student with email '{}'", email);
            };
            let Some(application) = course::find_application(&db, &student, &subject).await? else {
                anyhow::bail!(
                    "No application from '{}' to '{}'",
                    email,
                    subject.short_name
                );
            };

            let updated = course::set_application_status(&db, application, status).await?;
            println!(
                "Application from {} to '{}' is now {:?}.",
                email, subject.short_name, updated.status
            );
        }
        CourseCommand::Enroll { subject, classroom } => {
            let subject = require_subject(&db, &subject).await?;
            let classroom = require_classroom(&db, &classroom).await?;

            let enrolled = enrollment::enroll_accepted(&db, &subject, &classroom).await?;
            println!("Enrolled {} students into '{}'.", enrolled, classroom.short_name);
        }
        CourseCommand::Sync { classroom } => {
            let settings = Settings::load()?;
            let client = CanvasClient::new(&settings.canvas);
            let classroom = require_classroom(&db, &classroom).await?;

            let summary = canvas::sync_users_read_only(&db, &client, &classroom).await?;
            println!(
                "{} enrolled, {} found in Canvas, {} missing.",
                summary.total, summary.exists, summary.missing
            );
        }
        CourseCommand::Export { classroom, output } => {
            let settings = Settings::load()?;
            let client = CanvasClient::new(&settings.canvas);
            let classroom = require_classroom(&db, &classroom).await?;

            let exported =
                student_service::export_students_to_csv(&db, &client, &classroom, Path::new(&output))
                    .await?;
            if exported {
                println!("Export complete: {}", output);
            } else {
                anyhow::bail!("Failed to write {}", output);
            }
        }
        CourseCommand::Notify { classroom } => {
            let settings = Settings::load()?;
            let classroom = require_classroom(&db, &classroom).await?;

            let sent = mailer::notify_enrolled(&db, &settings.smtp, &classroom).await?;
            println!("Sent login info to {} students.", sent);
        }
    }

    Ok(())
}

async fn require_subject(db: &DatabaseConnection, name: &str) -> Result<subject::Model> {
    course::find_subject(db, name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Subject '{}' not found", name))
}

async fn require_classroom(db: &DatabaseConnection, short_name: &str) -> Result<classroom::Model> {
    course::find_classroom_by_short_name(db, short_name)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Classroom '{}' not found", short_name))
}

fn parse_status(raw: &str) -> Option<ApplicationStatus> {
    match raw.to_lowercase().as_str() {
        "applied" => Some(ApplicationStatus::Applied),
        "accepted" => Some(ApplicationStatus::Accepted),
        "finished" => Some(ApplicationStatus::Finished),
        "withdrawn" => Some(ApplicationStatus::Withdrawn),
        "failed" => Some(ApplicationStatus::Failed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_accepts_any_case() {
        assert_eq!(parse_status("accepted"), Some(ApplicationStatus::Accepted));
        assert_eq!(parse_status("ACCEPTED"), Some(ApplicationStatus::Accepted));
        assert_eq!(parse_status("Withdrawn"), Some(ApplicationStatus::Withdrawn));
        assert_eq!(parse_status("enrolled"), None);
    }
}
