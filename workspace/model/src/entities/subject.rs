use super::{classroom, course_application, student, student_subject};
use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// A course in the catalog, e.g. "REN" / "Renholdsoperatør".
/// Carries the id of the Google spreadsheet its applications arrive in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub short_name: String,
    #[sea_orm(unique)]
    pub long_name: String,
    /// Spreadsheet the applications for this subject are collected in.
    /// Subjects without an application form leave this unset.
    pub google_sheet_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "classroom::Entity")]
    Classroom,
    #[sea_orm(has_many = "course_application::Entity")]
    CourseApplication,
    /// Relation for the many-to-many relationship with students.
    #[sea_orm(has_many = "student_subject::Entity")]
    StudentSubject,
}

impl Related<classroom::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<course_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseApplication.def()
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef {
        student_subject::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(student_subject::Relation::Subject.def().rev())
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
