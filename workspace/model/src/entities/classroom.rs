use super::{enrollment, student, subject};
use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// One running class of a subject, usually mirrored by a Canvas course.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub short_name: String,
    pub subject_id: Uuid,
    /// Id of the matching course in Canvas LMS, once one exists.
    pub canvas_course_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "subject::Entity",
        from = "Column::SubjectId",
        to = "subject::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "enrollment::Entity")]
    Enrollment,
}

impl Related<subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<student::Entity> for Entity {
    fn to() -> RelationDef {
        enrollment::Relation::Student.def()
    }

    fn via() -> Option<RelationDef> {
        Some(enrollment::Relation::Classroom.def().rev())
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
