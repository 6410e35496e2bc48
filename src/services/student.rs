use std::path::Path;

use chrono::NaiveDate;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, error, info};

use model::entities::prelude::Student;
use model::entities::student::{self, CanvasStatus, StudentStatus};
use model::entities::classroom;

use crate::canvas::{self, CanvasClient};
use crate::error::Result;
use crate::export;
use crate::services::{enrollment, phone};

const TMP_PASSWORD_LEN: usize = 10;

/// Creates a student unless one already exists. Deduplication first goes
/// by email and then by first plus last name; in both cases the existing
/// row wins and nothing is written. The returned flag tells whether a row
/// was created.
pub async fn create_student(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone_number: Option<i32>,
) -> Result<(student::Model, bool)> {
    let first_name = first_name.trim();
    let last_name = last_name.trim();
    let email = email.trim();

    if let Some(existing) = get_by_email(db, email).await? {
        debug!("EMAIL ALREADY EXIST -> {}", existing.email);
        return Ok((existing, false));
    }

    if let Some(existing) = get_by_name(db, first_name, last_name).await? {
        debug!(
            "NAME ALREADY EXIST -> {} {}",
            existing.first_name, existing.last_name
        );
        return Ok((existing, false));
    }

    let phone = phone::create_phone(db, phone_number).await?;

    let created = student::ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        phone_id: Set(phone.id),
        home_address_id: Set(None),
        birth_date: Set(None),
        tmp_password: Set(generate_password()),
        login_info_sent: Set(false),
        exported_to_csv: Set(false),
        canvas_status: Set(CanvasStatus::Unknown),
        student_status: Set(StudentStatus::Allowed),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("CREATED STUDENT -> {}", created.email);
    Ok((created, true))
}

pub async fn get_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<student::Model>> {
    Ok(Student::find()
        .filter(student::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn get_by_name(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
) -> Result<Option<student::Model>> {
    Ok(Student::find()
        .filter(student::Column::FirstName.eq(first_name))
        .filter(student::Column::LastName.eq(last_name))
        .one(db)
        .await?)
}

/// Looks a student up by "First Last". The last space splits the name, so
/// double first names stay part of the first name.
pub async fn get_by_full_name(
    db: &DatabaseConnection,
    full_name: &str,
) -> Result<Option<student::Model>> {
    match full_name.trim().rsplit_once(' ') {
        Some((first_name, last_name)) => get_by_name(db, first_name, last_name).await,
        None => Ok(None),
    }
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Ok(Student::find()
        .order_by_asc(student::Column::LastName)
        .order_by_asc(student::Column::FirstName)
        .all(db)
        .await?)
}

/// Fills in the birth date when the parsed value is the first one we have.
pub async fn set_birth_date(
    db: &DatabaseConnection,
    student: student::Model,
    birth_date: NaiveDate,
) -> Result<student::Model> {
    let mut active: student::ActiveModel = student.into();
    active.birth_date = Set(Some(birth_date));
    Ok(active.update(db).await?)
}

pub async fn save_changes(
    db: &DatabaseConnection,
    student: student::ActiveModel,
) -> Result<student::Model> {
    Ok(student.update(db).await?)
}

/// Exports the classroom's students that Canvas does not know yet as a SIS
/// user-import CSV. Runs the read-only Canvas sync first so the selection
/// works on fresh flags.
pub async fn export_students_to_csv(
    db: &DatabaseConnection,
    canvas_client: &CanvasClient,
    classroom: &classroom::Model,
    path: &Path,
) -> Result<bool> {
    canvas::sync_users_read_only(db, canvas_client, classroom).await?;
    export_pending_students(db, classroom, path).await
}

/// Writes the classroom's not-yet-exported, Canvas-missing students to the
/// CSV file and flips their export flag. Reports `false` when the file
/// could not be written; everything already known to Canvas counts as
/// success. Split from [`export_students_to_csv`] so the selection and
/// flag handling can run without a live Canvas endpoint.
pub(crate) async fn export_pending_students(
    db: &DatabaseConnection,
    classroom: &classroom::Model,
    path: &Path,
) -> Result<bool> {
    let enrolled = enrollment::students_in_classroom(db, classroom).await?;
    let pending: Vec<student::Model> = enrolled
        .into_iter()
        .filter(|s| !s.exported_to_csv && s.canvas_status == CanvasStatus::Missing)
        .collect();

    if pending.is_empty() {
        debug!(
            "All students in '{}' already exists in Canvas LMS.",
            classroom.short_name
        );
        return Ok(true);
    }

    let mut exported = Vec::with_capacity(pending.len());
    for student in pending {
        let mut active: student::ActiveModel = student.into();
        active.exported_to_csv = Set(true);
        exported.push(active.update(db).await?);
    }

    match export::write_students_csv(path, &exported) {
        Ok(()) => {
            info!(
                "Exported {} students from '{}' to {}",
                exported.len(),
                classroom.short_name,
                path.display()
            );
            Ok(true)
        }
        Err(e) => {
            error!("Failed to create CSV file: {}", e);
            Ok(false)
        }
    }
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TMP_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::generate_password;

    #[test]
    fn test_generated_passwords_are_alphanumeric() {
        let password = generate_password();
        assert_eq!(password.len(), 10);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));

        // Two draws colliding would mean the generator is broken
        assert_ne!(generate_password(), generate_password());
    }
}
