#[cfg(test)]
pub mod test_utils {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

    use model::entities::student::{CanvasStatus, StudentStatus};
    use model::entities::{classroom, phone, student, subject};

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Insert a student directly, bypassing the service-level deduplication.
    pub async fn seed_student(
        db: &DatabaseConnection,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> student::Model {
        let phone = phone::ActiveModel {
            phone_number: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test phone");

        student::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            email: Set(email.to_string()),
            phone_id: Set(phone.id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("testpass99".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(CanvasStatus::Unknown),
            student_status: Set(StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test student")
    }

    pub async fn seed_subject(
        db: &DatabaseConnection,
        short_name: &str,
        long_name: &str,
        google_sheet_id: Option<&str>,
    ) -> subject::Model {
        subject::ActiveModel {
            short_name: Set(short_name.to_string()),
            long_name: Set(long_name.to_string()),
            google_sheet_id: Set(google_sheet_id.map(str::to_string)),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test subject")
    }

    pub async fn seed_classroom(
        db: &DatabaseConnection,
        subject: &subject::Model,
        short_name: &str,
        canvas_course_id: Option<i64>,
    ) -> classroom::Model {
        classroom::ActiveModel {
            short_name: Set(short_name.to_string()),
            subject_id: Set(subject.id),
            canvas_course_id: Set(canvas_course_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create test classroom")
    }
}
