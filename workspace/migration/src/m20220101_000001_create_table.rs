use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create phones table
        manager
            .create_table(
                Table::create()
                    .table(Phones::Table)
                    .if_not_exists()
                    .col(pk_uuid(Phones::Id))
                    .col(integer_null(Phones::PhoneNumber))
                    .col(date_time(Phones::CreatedAt))
                    .col(date_time(Phones::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create home_addresses table
        manager
            .create_table(
                Table::create()
                    .table(HomeAddresses::Table)
                    .if_not_exists()
                    .col(pk_uuid(HomeAddresses::Id))
                    .col(string(HomeAddresses::StreetAddress))
                    .col(integer(HomeAddresses::ZipCode))
                    .col(string(HomeAddresses::CityName))
                    .col(date_time(HomeAddresses::CreatedAt))
                    .col(date_time(HomeAddresses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk_uuid(Subjects::Id))
                    .col(string(Subjects::ShortName).unique_key())
                    .col(string(Subjects::LongName).unique_key())
                    .col(string_null(Subjects::GoogleSheetId))
                    .col(date_time(Subjects::CreatedAt))
                    .col(date_time(Subjects::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_uuid(Students::Id))
                    .col(string(Students::FirstName))
                    .col(string(Students::LastName))
                    .col(string(Students::Email).unique_key())
                    .col(uuid(Students::PhoneId))
                    .col(uuid_null(Students::HomeAddressId))
                    .col(date_null(Students::BirthDate))
                    .col(string(Students::TmpPassword))
                    .col(boolean(Students::LoginInfoSent).default(false))
                    .col(boolean(Students::ExportedToCsv).default(false))
                    .col(string_len(Students::CanvasStatus, 20))
                    .col(string_len(Students::StudentStatus, 20))
                    .col(date_time(Students::CreatedAt))
                    .col(date_time(Students::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_phone")
                            .from(Students::Table, Students::PhoneId)
                            .to(Phones::Table, Phones::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_home_address")
                            .from(Students::Table, Students::HomeAddressId)
                            .to(HomeAddresses::Table, HomeAddresses::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create classrooms table
        manager
            .create_table(
                Table::create()
                    .table(Classrooms::Table)
                    .if_not_exists()
                    .col(pk_uuid(Classrooms::Id))
                    .col(string(Classrooms::ShortName).unique_key())
                    .col(uuid(Classrooms::SubjectId))
                    .col(big_integer_null(Classrooms::CanvasCourseId))
                    .col(date_time(Classrooms::CreatedAt))
                    .col(date_time(Classrooms::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_classroom_subject")
                            .from(Classrooms::Table, Classrooms::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create students_subjects table (join table)
        manager
            .create_table(
                Table::create()
                    .table(StudentsSubjects::Table)
                    .if_not_exists()
                    .col(uuid(StudentsSubjects::StudentId))
                    .col(uuid(StudentsSubjects::SubjectId))
                    .primary_key(
                        Index::create()
                            .name("pk_students_subjects")
                            .col(StudentsSubjects::StudentId)
                            .col(StudentsSubjects::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_subjects_student")
                            .from(StudentsSubjects::Table, StudentsSubjects::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_subjects_subject")
                            .from(StudentsSubjects::Table, StudentsSubjects::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create course_applications table
        manager
            .create_table(
                Table::create()
                    .table(CourseApplications::Table)
                    .if_not_exists()
                    .col(pk_uuid(CourseApplications::Id))
                    .col(uuid(CourseApplications::StudentId))
                    .col(uuid(CourseApplications::SubjectId))
                    .col(string_len(CourseApplications::Status, 20))
                    .col(date_time(CourseApplications::CreatedAt))
                    .col(date_time(CourseApplications::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_applications_student")
                            .from(CourseApplications::Table, CourseApplications::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_applications_subject")
                            .from(CourseApplications::Table, CourseApplications::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One application per student and subject
        manager
            .create_index(
                Index::create()
                    .name("idx_course_applications_student_subject")
                    .table(CourseApplications::Table)
                    .col(CourseApplications::StudentId)
                    .col(CourseApplications::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create enrollments table
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(pk_uuid(Enrollments::Id))
                    .col(uuid(Enrollments::StudentId))
                    .col(uuid(Enrollments::ClassroomId))
                    .col(boolean(Enrollments::EmailSent).default(false))
                    .col(boolean(Enrollments::TextSent).default(false))
                    .col(date_time(Enrollments::CreatedAt))
                    .col(date_time(Enrollments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_classroom")
                            .from(Enrollments::Table, Enrollments::ClassroomId)
                            .to(Classrooms::Table, Classrooms::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One enrollment per student and classroom
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_student_classroom")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ClassroomId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to avoid foreign key constraints
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(StudentsSubjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classrooms::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(HomeAddresses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Phones::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Phones {
    Table,
    Id,
    PhoneNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomeAddresses {
    Table,
    Id,
    StreetAddress,
    ZipCode,
    CityName,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    ShortName,
    LongName,
    GoogleSheetId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PhoneId,
    HomeAddressId,
    BirthDate,
    TmpPassword,
    LoginInfoSent,
    ExportedToCsv,
    CanvasStatus,
    StudentStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classrooms {
    Table,
    Id,
    ShortName,
    SubjectId,
    CanvasCourseId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentsSubjects {
    Table,
    StudentId,
    SubjectId,
}

#[derive(DeriveIden)]
enum CourseApplications {
    Table,
    Id,
    StudentId,
    SubjectId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    ClassroomId,
    EmailSent,
    TextSent,
    CreatedAt,
    UpdatedAt,
}
