//! SIS user-import CSV for Canvas.
//!
//! Canvas provisions accounts from SIS CSV batches. We emit the `users.csv`
//! flavor with the email doubling as both `user_id` and `login_id`, the
//! generated temporary password and the row status fixed to `active`.

use std::path::Path;

use csv::Writer;

use model::entities::student;

use crate::error::Result;

const HEADER: [&str; 7] = [
    "user_id",
    "login_id",
    "password",
    "first_name",
    "last_name",
    "email",
    "status",
];

pub fn write_students_csv(path: &Path, students: &[student::Model]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(HEADER)?;

    for student in students {
        writer.write_record([
            student.email.as_str(),
            student.email.as_str(),
            student.tmp_password.as_str(),
            student.first_name.as_str(),
            student.last_name.as_str(),
            student.email.as_str(),
            "active",
        ])?;
    }

    writer.flush()?;
    Ok(())
}
