use super::{course_application, enrollment, home_address, phone, student_subject, subject};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Whether the student has a matching user in Canvas LMS, as of the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum CanvasStatus {
    /// No sync has looked this student up yet.
    #[sea_orm(string_value = "Unknown")]
    Unknown,
    /// The last sync found no Canvas user for this student.
    #[sea_orm(string_value = "Missing")]
    Missing,
    /// A Canvas user with this student's email exists.
    #[sea_orm(string_value = "Exists")]
    Exists,
}

/// Administrative standing of the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum StudentStatus {
    #[sea_orm(string_value = "Allowed")]
    Allowed,
    #[sea_orm(string_value = "Blocked")]
    Blocked,
}

/// A person who has applied for or attends one of our courses.
/// Spreadsheet imports, Canvas sync and the CSV export all revolve
/// around this row. Corresponds to the Canvas SIS notion of a user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Primary identity; imports deduplicate on this before anything else.
    #[sea_orm(unique)]
    pub email: String,
    pub phone_id: Uuid,
    pub home_address_id: Option<Uuid>,
    pub birth_date: Option<NaiveDate>,
    /// Generated at creation time and sent out with the login information.
    pub tmp_password: String,
    pub login_info_sent: bool,
    pub exported_to_csv: bool,
    pub canvas_status: CanvasStatus,
    pub student_status: StudentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "phone::Entity",
        from = "Column::PhoneId",
        to = "phone::Column::Id"
    )]
    Phone,
    #[sea_orm(
        belongs_to = "home_address::Entity",
        from = "Column::HomeAddressId",
        to = "home_address::Column::Id"
    )]
    HomeAddress,
    #[sea_orm(has_many = "enrollment::Entity")]
    Enrollment,
    #[sea_orm(has_many = "course_application::Entity")]
    CourseApplication,
    /// Relation for the many-to-many relationship with subjects.
    #[sea_orm(has_many = "student_subject::Entity")]
    StudentSubject,
}

impl Related<phone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Phone.def()
    }
}

impl Related<home_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HomeAddress.def()
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<course_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseApplication.def()
    }
}

impl Related<subject::Entity> for Entity {
    fn to() -> RelationDef {
        student_subject::Relation::Subject.def()
    }

    fn via() -> Option<RelationDef> {
        Some(student_subject::Relation::Student.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().naive_utc();
        if insert {
            if self.id.is_not_set() {
                self.id = Set(Uuid::new_v4());
            }
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Model {
    /// First and last name joined with a single space, the way the
    /// spreadsheets and log messages refer to a student.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::SqliteQueryBuilder;
    use sea_orm::{Database, DatabaseConnection, DbBackend, Schema, Statement};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        // The students table carries FK clauses, so its targets have to
        // exist before it does
        let schema = Schema::new(DbBackend::Sqlite);
        for stmt in [
            schema.create_table_from_entity(phone::Entity),
            schema.create_table_from_entity(home_address::Entity),
            schema.create_table_from_entity(Entity),
        ] {
            let statement =
                Statement::from_string(DbBackend::Sqlite, stmt.to_string(SqliteQueryBuilder));
            db.execute(statement).await.unwrap();
        }

        db
    }

    async fn seed_phone(db: &DatabaseConnection) -> Uuid {
        phone::ActiveModel {
            phone_number: Set(Some(41234567)),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_insert_fills_id_and_timestamps() {
        let db = setup_test_db().await;
        let phone_id = seed_phone(&db).await;

        let student = ActiveModel {
            first_name: Set("Ola".to_string()),
            last_name: Set("Nordmann".to_string()),
            email: Set("ola.nordmann@example.com".to_string()),
            phone_id: Set(phone_id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("hunter2".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(CanvasStatus::Unknown),
            student_status: Set(StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        assert_ne!(student.id, Uuid::nil());
        assert!(student.created_at <= student.updated_at);
        assert_eq!(student.full_name(), "Ola Nordmann");
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at_only() {
        let db = setup_test_db().await;
        let phone_id = seed_phone(&db).await;

        let student = ActiveModel {
            first_name: Set("Kari".to_string()),
            last_name: Set("Nordmann".to_string()),
            email: Set("kari.nordmann@example.com".to_string()),
            phone_id: Set(phone_id),
            home_address_id: Set(None),
            birth_date: Set(None),
            tmp_password: Set("hunter2".to_string()),
            login_info_sent: Set(false),
            exported_to_csv: Set(false),
            canvas_status: Set(CanvasStatus::Unknown),
            student_status: Set(StudentStatus::Allowed),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let created_at = student.created_at;

        let mut active: ActiveModel = student.into();
        active.login_info_sent = Set(true);
        let updated = active.update(&db).await.unwrap();

        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at >= created_at);
        assert!(updated.login_info_sent);
    }
}
