use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

use model::entities::course_application::ApplicationStatus;
use model::entities::{student, subject};

use crate::error::Result;
use crate::services::{course, home_address, student as student_service};
use crate::sheets::client::{RowColorRequest, SheetsClient};
use crate::sheets::parser;

/// Row colors signalling the application status back to the coordinators
/// reading the sheet.
const COLOR_ACCEPTED: (f32, f32, f32) = (0.76, 0.153, 0.0);
const COLOR_REJECTED: (f32, f32, f32) = (255.0, 51.0, 51.0);
const COLOR_PENDING: (f32, f32, f32) = (255.0, 255.0, 102.0);

/// Imports every signup row of the subject's Google sheet.
///
/// Each row becomes a student (or resolves to an existing one), birth date
/// and address details are refreshed from the cells that parse, and an
/// application to the subject is registered. Broken cells are logged and
/// skipped so one bad row never stops the import. New applications are only
/// written when the sheet id maps to exactly one subject; otherwise rows
/// would be credited to the wrong course. Rows whose application already
/// exists are still colored by status.
pub async fn process_sheet(
    db: &DatabaseConnection,
    client: &SheetsClient,
    subject: &subject::Model,
) -> Result<Vec<student::Model>> {
    let Some(sheet_id) = subject.google_sheet_id.as_deref() else {
        warn!(
            "Subject '{}' has no Google sheet attached.",
            subject.short_name
        );
        return Ok(Vec::new());
    };

    let rows = client.get_values(sheet_id).await?;
    let (imported, color_requests) = process_rows(db, subject, &rows).await?;

    client.update_sheet_colors(sheet_id, color_requests).await?;

    info!(
        "Imported {} students into '{}'.",
        imported.len(),
        subject.short_name
    );
    Ok(imported)
}

/// Walks the fetched sheet rows and applies them to the database. Split
/// from [`process_sheet`] so the row semantics can run against plain
/// vectors, without a live Sheets endpoint.
pub(crate) async fn process_rows(
    db: &DatabaseConnection,
    subject: &subject::Model,
    rows: &[Vec<String>],
) -> Result<(Vec<student::Model>, Vec<RowColorRequest>)> {
    if rows.is_empty() {
        warn!("No data found in spreadsheet.");
        return Ok((Vec::new(), Vec::new()));
    }

    let mapping = parser::map_headers(&rows[0]);

    let sheet_is_unique = match subject.google_sheet_id.as_deref() {
        Some(sheet_id) => course::subjects_sharing_sheet(db, sheet_id).await? == 1,
        None => false,
    };
    if !sheet_is_unique {
        warn!(
            "Duplicate check for spreadsheet in '{}' failed.",
            subject.short_name
        );
    }

    let mut imported = Vec::new();
    let mut color_requests: Vec<RowColorRequest> = Vec::new();

    for (row_index, row) in rows.iter().enumerate().skip(1) {
        let data = parser::extract_row(&mapping, row);

        if data.email.is_empty() || data.first_name.is_empty() || data.last_name.is_empty() {
            debug!("Skipping row {}: missing name or email.", row_index);
            continue;
        }

        let phone = if data.phone.is_empty() {
            None
        } else {
            let parsed = parser::parse_phone_number(&data.phone);
            if parsed.is_none() {
                warn!(
                    "Invalid phone number '{}' for {} {}.",
                    data.phone, data.first_name, data.last_name
                );
            }
            parsed
        };

        let (mut student, _) = student_service::create_student(
            db,
            &data.first_name,
            &data.last_name,
            &data.email,
            phone,
        )
        .await?;

        // Re-imports refresh stored values; the warnings only fire while
        // the student still has nothing on file.
        if !data.birth_date.is_empty() {
            match parser::parse_birth_date(&data.birth_date) {
                Some(birth_date) => {
                    student = student_service::set_birth_date(db, student, birth_date).await?;
                }
                None if student.birth_date.is_none() => warn!(
                    "Invalid birth date '{}' for {} {}.",
                    data.birth_date, student.first_name, student.last_name
                ),
                None => {}
            }
        }

        if !data.street_address.is_empty() && !data.city_zipcode.is_empty() {
            match parser::parse_zip_city(&data.city_zipcode) {
                Some((zip_code, city_name)) => {
                    student = home_address::update_home_address(
                        db,
                        student,
                        &data.street_address,
                        zip_code,
                        &city_name,
                    )
                    .await?;
                }
                None if student.home_address_id.is_none() => warn!(
                    "Invalid home address for {} {}.",
                    student.first_name, student.last_name
                ),
                None => {}
            }
        }

        if sheet_is_unique {
            course::create_course_application(db, &student, subject).await?;
        }

        if let Some(application) = course::find_application(db, &student, subject).await? {
            let (red, green, blue) = match application.status {
                ApplicationStatus::Accepted | ApplicationStatus::Finished => COLOR_ACCEPTED,
                ApplicationStatus::Withdrawn | ApplicationStatus::Failed => COLOR_REJECTED,
                ApplicationStatus::Applied => COLOR_PENDING,
            };
            color_requests.push(SheetsClient::row_color_request(row_index, red, green, blue));
        }

        imported.push(student);
    }

    Ok((imported, color_requests))
}
