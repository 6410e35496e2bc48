//! This file serves as the root for all SeaORM entity modules.
//! We define the data model for the course administration backend here:
//! students with their contact details, the course catalog, running
//! classrooms and the application/enrollment rows that tie them together.

pub mod classroom;
pub mod course_application;
pub mod enrollment;
pub mod home_address;
pub mod phone;
pub mod student;
pub mod student_subject;
pub mod subject;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::classroom::Entity as Classroom;
    pub use super::course_application::Entity as CourseApplication;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::home_address::Entity as HomeAddress;
    pub use super::phone::Entity as Phone;
    pub use super::student::Entity as Student;
    pub use super::student_subject::Entity as StudentSubject;
    pub use super::subject::Entity as Subject;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::prelude::*;
    use super::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        // Setup database
        let db = setup_db().await?;

        // Create contact rows
        let phone1 = phone::ActiveModel {
            phone_number: Set(Some(40612345)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let phone2 = phone::ActiveModel {
            phone_number: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let address = home_address::ActiveModel {
            street_address: Set("Storgata 1".to_string()),
            zip_code: Set(1607),
            city_name: Set("Fredrikstad".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create students
        let student1 = student::ActiveModel {
            first_name: Set("Ola".to_string()),
            last_name: Set("Nordmann".to_string()),
            email: Set("ola.nordmann@example.com".to_string()),
            phone_id: Set(phone1.id),
            home_address_id: Set(Some(address.id)),
            birth_date: Set(NaiveDate::from_ymd_opt(1990, 5, 17)),
            tmp_password: Set("s3cr3tPW".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(student::CanvasStatus::Unknown),
            student_status: Set(student::StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let student2 = student::ActiveModel {
            first_name: Set("Kari".to_string()),
            last_name: Set("Nordmann".to_string()),
            email: Set("kari.nordmann@example.com".to_string()),
            phone_id: Set(phone2.id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("s3cr3tPW".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(student::CanvasStatus::Unknown),
            student_status: Set(student::StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a subject and a classroom running it
        let subject = subject::ActiveModel {
            short_name: Set("REN".to_string()),
            long_name: Set("Renholdsoperatør".to_string()),
            google_sheet_id: Set(Some("1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let classroom = classroom::ActiveModel {
            short_name: Set("REN-H26".to_string()),
            subject_id: Set(subject.id),
            canvas_course_id: Set(Some(1042)),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Applications from the spreadsheet import
        let application1 = course_application::ActiveModel {
            student_id: Set(student1.id),
            subject_id: Set(subject.id),
            status: Set(course_application::ApplicationStatus::Applied),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        course_application::ActiveModel {
            student_id: Set(student2.id),
            subject_id: Set(subject.id),
            status: Set(course_application::ApplicationStatus::Accepted),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Link both students to the subject
        student_subject::ActiveModel {
            student_id: Set(student1.id),
            subject_id: Set(subject.id),
        }
        .insert(&db)
        .await?;

        student_subject::ActiveModel {
            student_id: Set(student2.id),
            subject_id: Set(subject.id),
        }
        .insert(&db)
        .await?;

        // Enroll the accepted student into the classroom
        let enrollment = enrollment::ActiveModel {
            student_id: Set(student2.id),
            classroom_id: Set(classroom.id),
            email_sent: Set(false),
            text_sent: Set(false),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data

        // Verify students
        let students = Student::find().all(&db).await?;
        assert_eq!(students.len(), 2);
        assert!(students.iter().any(|s| s.email == "ola.nordmann@example.com"));
        assert!(students.iter().any(|s| s.email == "kari.nordmann@example.com"));

        // Verify the generated keys and timestamps
        assert_ne!(student1.id, student2.id);
        assert!(students.iter().all(|s| s.created_at <= s.updated_at));

        // Verify the student -> phone / address relations
        let phone_of_student1 = student1.find_related(Phone).one(&db).await?;
        assert_eq!(phone_of_student1.map(|p| p.phone_number), Some(Some(40612345)));

        let address_of_student1 = student1.find_related(HomeAddress).one(&db).await?;
        assert_eq!(address_of_student1.map(|a| a.zip_code), Some(1607));

        // Verify the many-to-many link between students and subjects
        let subjects_of_student1 = student1.find_related(Subject).all(&db).await?;
        assert_eq!(subjects_of_student1.len(), 1);
        assert_eq!(subjects_of_student1[0].short_name, "REN");

        let students_of_subject = subject.find_related(Student).all(&db).await?;
        assert_eq!(students_of_subject.len(), 2);

        // Verify classroom membership through enrollments
        let students_of_classroom = classroom.find_related(Student).all(&db).await?;
        assert_eq!(students_of_classroom.len(), 1);
        assert_eq!(students_of_classroom[0].email, "kari.nordmann@example.com");

        let classroom_of_enrollment = enrollment.find_related(Classroom).one(&db).await?;
        assert_eq!(classroom_of_enrollment.map(|c| c.short_name), Some("REN-H26".to_string()));

        // Verify applications
        let applications = CourseApplication::find()
            .filter(course_application::Column::SubjectId.eq(subject.id))
            .all(&db)
            .await?;
        assert_eq!(applications.len(), 2);
        assert!(applications.iter().any(|a| a.id == application1.id));
        assert!(applications
            .iter()
            .any(|a| a.status == course_application::ApplicationStatus::Accepted));

        // Verify the classroom -> subject relation
        let subject_of_classroom = classroom.find_related(Subject).one(&db).await?;
        assert_eq!(subject_of_classroom.map(|s| s.long_name), Some("Renholdsoperatør".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_email_is_enforced() -> Result<(), DbErr> {
        let db = setup_db().await?;

        let phone = phone::ActiveModel {
            phone_number: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let phone_dup = phone::ActiveModel {
            phone_number: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        student::ActiveModel {
            first_name: Set("Ola".to_string()),
            last_name: Set("Nordmann".to_string()),
            email: Set("ola@example.com".to_string()),
            phone_id: Set(phone.id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("pw1".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(student::CanvasStatus::Unknown),
            student_status: Set(student::StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let duplicate = student::ActiveModel {
            first_name: Set("Ola".to_string()),
            last_name: Set("Dahl".to_string()),
            email: Set("ola@example.com".to_string()),
            phone_id: Set(phone_dup.id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("pw2".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(student::CanvasStatus::Unknown),
            student_status: Set(student::StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await;

        assert!(duplicate.is_err());

        Ok(())
    }
}
