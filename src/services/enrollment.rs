use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use tracing::{debug, info, warn};

use model::entities::course_application::{self, ApplicationStatus};
use model::entities::prelude::{CourseApplication, Enrollment, Student};
use model::entities::{classroom, enrollment, student, subject};

use crate::error::Result;

/// Places a student in a classroom. Re-enrolling is a no-op that hands back
/// the existing row; the flag tells whether a row was created.
pub async fn enroll_student(
    db: &DatabaseConnection,
    student: &student::Model,
    classroom: &classroom::Model,
) -> Result<(enrollment::Model, bool)> {
    let existing = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(student.id))
        .filter(enrollment::Column::ClassroomId.eq(classroom.id))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        debug!(
            "ENROLLMENT ALREADY EXIST -> {} in {}",
            student.email, classroom.short_name
        );
        return Ok((existing, false));
    }

    let created = enrollment::ActiveModel {
        student_id: Set(student.id),
        classroom_id: Set(classroom.id),
        email_sent: Set(false),
        text_sent: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(
        "CREATED ENROLLMENT -> {} in {}",
        student.email, classroom.short_name
    );
    Ok((created, true))
}

/// Enrolls every student with an accepted application for the subject into
/// the classroom. Returns how many enrollments were created.
pub async fn enroll_accepted(
    db: &DatabaseConnection,
    subject: &subject::Model,
    classroom: &classroom::Model,
) -> Result<usize> {
    let accepted = CourseApplication::find()
        .filter(course_application::Column::SubjectId.eq(subject.id))
        .filter(course_application::Column::Status.eq(ApplicationStatus::Accepted))
        .all(db)
        .await?;

    let mut enrolled = 0;
    for application in &accepted {
        let Some(student) = Student::find_by_id(application.student_id).one(db).await? else {
            warn!("Application {} points at a missing student.", application.id);
            continue;
        };

        let (_, created) = enroll_student(db, &student, classroom).await?;
        if created {
            enrolled += 1;
        }
    }

    info!(
        "Enrolled {} of {} accepted students into '{}'.",
        enrolled,
        accepted.len(),
        classroom.short_name
    );
    Ok(enrolled)
}

pub async fn students_in_classroom(
    db: &DatabaseConnection,
    classroom: &classroom::Model,
) -> Result<Vec<student::Model>> {
    Ok(classroom.find_related(Student).all(db).await?)
}

/// Enrollment rows of a classroom paired with their students, for flows
/// that need to flip per-enrollment flags.
pub async fn enrollments_with_students(
    db: &DatabaseConnection,
    classroom: &classroom::Model,
) -> Result<Vec<(enrollment::Model, student::Model)>> {
    let rows = Enrollment::find()
        .filter(enrollment::Column::ClassroomId.eq(classroom.id))
        .find_also_related(Student)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(enrollment, student)| student.map(|s| (enrollment, s)))
        .collect())
}

pub async fn mark_email_sent(
    db: &DatabaseConnection,
    enrollment: enrollment::Model,
) -> Result<enrollment::Model> {
    let mut active: enrollment::ActiveModel = enrollment.into();
    active.email_sent = Set(true);
    Ok(active.update(db).await?)
}
