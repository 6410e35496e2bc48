use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use model::entities::course_application::{self, ApplicationStatus};
use model::entities::prelude::{Classroom, CourseApplication, StudentSubject, Subject};
use model::entities::{classroom, student, student_subject, subject};

use crate::error::{GatevasError, Result};

pub async fn find_by_short_name(
    db: &DatabaseConnection,
    short_name: &str,
) -> Result<Option<subject::Model>> {
    Ok(Subject::find()
        .filter(subject::Column::ShortName.eq(short_name))
        .one(db)
        .await?)
}

pub async fn find_by_long_name(
    db: &DatabaseConnection,
    long_name: &str,
) -> Result<Option<subject::Model>> {
    Ok(Subject::find()
        .filter(subject::Column::LongName.eq(long_name))
        .one(db)
        .await?)
}

/// Resolves a subject by its short name first and its long name second.
pub async fn find_subject(db: &DatabaseConnection, name: &str) -> Result<Option<subject::Model>> {
    if let Some(found) = find_by_short_name(db, name).await? {
        return Ok(Some(found));
    }
    find_by_long_name(db, name).await
}

pub async fn list_subjects(db: &DatabaseConnection) -> Result<Vec<subject::Model>> {
    Ok(Subject::find()
        .order_by_asc(subject::Column::ShortName)
        .all(db)
        .await?)
}

/// Creates a subject unless its short name is already taken, in which case
/// the existing row is returned untouched.
pub async fn create_subject(
    db: &DatabaseConnection,
    short_name: &str,
    long_name: &str,
    google_sheet_id: Option<String>,
) -> Result<subject::Model> {
    if let Some(existing) = find_by_short_name(db, short_name).await? {
        debug!("SUBJECT ALREADY EXIST -> {}", existing.short_name);
        return Ok(existing);
    }

    let created = subject::ActiveModel {
        short_name: Set(short_name.to_string()),
        long_name: Set(long_name.to_string()),
        google_sheet_id: Set(google_sheet_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("CREATED SUBJECT -> {}", created.short_name);
    Ok(created)
}

pub async fn list_classrooms(db: &DatabaseConnection) -> Result<Vec<classroom::Model>> {
    Ok(Classroom::find()
        .order_by_asc(classroom::Column::ShortName)
        .all(db)
        .await?)
}

pub async fn find_classroom_by_short_name(
    db: &DatabaseConnection,
    short_name: &str,
) -> Result<Option<classroom::Model>> {
    Ok(Classroom::find()
        .filter(classroom::Column::ShortName.eq(short_name))
        .one(db)
        .await?)
}

/// Creates a classroom under the named subject, reusing an existing row
/// with the same short name.
pub async fn create_classroom(
    db: &DatabaseConnection,
    subject_name: &str,
    short_name: &str,
    canvas_course_id: Option<i64>,
) -> Result<classroom::Model> {
    let subject = find_subject(db, subject_name)
        .await?
        .ok_or_else(|| GatevasError::NotFound(format!("subject '{subject_name}'")))?;

    if let Some(existing) = find_classroom_by_short_name(db, short_name).await? {
        debug!("CLASSROOM ALREADY EXIST -> {}", existing.short_name);
        return Ok(existing);
    }

    let created = classroom::ActiveModel {
        short_name: Set(short_name.to_string()),
        subject_id: Set(subject.id),
        canvas_course_id: Set(canvas_course_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("CREATED CLASSROOM -> {}", created.short_name);
    Ok(created)
}

pub async fn find_application(
    db: &DatabaseConnection,
    student: &student::Model,
    subject: &subject::Model,
) -> Result<Option<course_application::Model>> {
    Ok(CourseApplication::find()
        .filter(course_application::Column::StudentId.eq(student.id))
        .filter(course_application::Column::SubjectId.eq(subject.id))
        .one(db)
        .await?)
}

/// Registers an application from a student to a subject. An existing
/// application keeps its status; a fresh one starts out as applied. The
/// student/subject link table is updated either way so the relation query
/// side stays consistent.
pub async fn create_course_application(
    db: &DatabaseConnection,
    student: &student::Model,
    subject: &subject::Model,
) -> Result<course_application::Model> {
    link_student_subject(db, student, subject).await?;

    if let Some(existing) = find_application(db, student, subject).await? {
        debug!(
            "APPLICATION ALREADY EXIST -> {:?} for {}",
            existing.status, subject.short_name
        );
        return Ok(existing);
    }

    let created = course_application::ActiveModel {
        student_id: Set(student.id),
        subject_id: Set(subject.id),
        status: Set(ApplicationStatus::Applied),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(
        "CREATED APPLICATION -> {:?} for {}",
        created.status, subject.short_name
    );
    Ok(created)
}

pub async fn set_application_status(
    db: &DatabaseConnection,
    application: course_application::Model,
    status: ApplicationStatus,
) -> Result<course_application::Model> {
    let mut active: course_application::ActiveModel = application.into();
    active.status = Set(status);
    Ok(active.update(db).await?)
}

/// Counts the subjects whose Google sheet id matches the given one,
/// ignoring case. Sheet ids come out of hand-pasted URLs so the comparison
/// happens here rather than in SQL.
pub async fn subjects_sharing_sheet(db: &DatabaseConnection, sheet_id: &str) -> Result<usize> {
    let subjects = Subject::find()
        .filter(subject::Column::GoogleSheetId.is_not_null())
        .all(db)
        .await?;

    Ok(subjects
        .iter()
        .filter_map(|s| s.google_sheet_id.as_deref())
        .filter(|id| id.eq_ignore_ascii_case(sheet_id))
        .count())
}

async fn link_student_subject(
    db: &DatabaseConnection,
    student: &student::Model,
    subject: &subject::Model,
) -> Result<()> {
    let existing = StudentSubject::find()
        .filter(student_subject::Column::StudentId.eq(student.id))
        .filter(student_subject::Column::SubjectId.eq(subject.id))
        .one(db)
        .await?;

    if existing.is_none() {
        student_subject::ActiveModel {
            student_id: Set(student.id),
            subject_id: Set(subject.id),
        }
        .insert(db)
        .await?;
    }

    Ok(())
}
