//! Login-info mail for newly provisioned students.

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use sea_orm::{DatabaseConnection, Set};
use tracing::{debug, info, warn};

use model::entities::{classroom, student};

use crate::config::SmtpSettings;
use crate::error::{GatevasError, Result};
use crate::services::{enrollment, student as student_service};

fn login_info_body(student: &student::Model) -> String {
    format!(
        "Hei {},\n\n\
         Du har fått en brukerkonto i kursportalen vår.\n\n\
         Brukernavn: {}\n\
         Midlertidig passord: {}\n\n\
         Logg inn og bytt passord ved første innlogging.\n\n\
         Vennlig hilsen\n\
         Kursadministrasjonen",
        student.first_name, student.email, student.tmp_password
    )
}

fn build_login_message(settings: &SmtpSettings, student: &student::Model) -> Result<Message> {
    let from: Mailbox = settings
        .from
        .parse()
        .map_err(|e: lettre::address::AddressError| GatevasError::Mail(e.to_string()))?;
    let to = Mailbox::new(
        Some(student.full_name()),
        student
            .email
            .parse()
            .map_err(|e: lettre::address::AddressError| GatevasError::Mail(e.to_string()))?,
    );

    Message::builder()
        .from(from)
        .to(to)
        .subject("Brukerkonto til kursportalen")
        .body(login_info_body(student))
        .map_err(|e| GatevasError::Mail(e.to_string()))
}

/// Mails one student their Canvas login and temporary password over a
/// STARTTLS relay.
pub fn send_login_info(settings: &SmtpSettings, student: &student::Model) -> Result<()> {
    let message = build_login_message(settings, student)?;

    let mailer = SmtpTransport::starttls_relay(&settings.host)
        .map_err(|e| GatevasError::Mail(e.to_string()))?
        .credentials(Credentials::new(
            settings.username.clone(),
            settings.password.clone(),
        ))
        .build();

    mailer
        .send(&message)
        .map_err(|e| GatevasError::Mail(e.to_string()))?;

    Ok(())
}

/// Records a delivered login mail on both sides, the enrollment row and
/// the student flag.
pub(crate) async fn record_login_info_sent(
    db: &DatabaseConnection,
    enrollment: model::entities::enrollment::Model,
    student: student::Model,
) -> Result<()> {
    enrollment::mark_email_sent(db, enrollment).await?;

    let mut active: student::ActiveModel = student.into();
    active.login_info_sent = Set(true);
    student_service::save_changes(db, active).await?;

    Ok(())
}

/// Sends login info to every enrolled student that has not gotten it yet.
/// A failed send is logged and skipped so the rest of the classroom still
/// gets their mail; the flags only flip on success.
pub async fn notify_enrolled(
    db: &DatabaseConnection,
    settings: &SmtpSettings,
    classroom: &classroom::Model,
) -> Result<usize> {
    let pairs = enrollment::enrollments_with_students(db, classroom).await?;

    let mut sent = 0;
    for (enrollment, student) in pairs {
        if enrollment.email_sent {
            debug!("Login info already sent to {}.", student.email);
            continue;
        }

        if let Err(e) = send_login_info(settings, &student) {
            warn!("Failed to send login info to {}: {}", student.email, e);
            continue;
        }

        record_login_info_sent(db, enrollment, student).await?;
        sent += 1;
    }

    info!(
        "Sent login info to {} students in '{}'.",
        sent, classroom.short_name
    );
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::prelude::Uuid;

    use model::entities::student::{CanvasStatus, StudentStatus};

    use super::*;

    fn sample_student() -> student::Model {
        let now = Utc::now().naive_utc();
        student::Model {
            id: Uuid::new_v4(),
            first_name: "Kari".to_string(),
            last_name: "Nordmann".to_string(),
            email: "kari@example.no".to_string(),
            phone_id: Uuid::new_v4(),
            home_address_id: None,
            birth_date: None,
            tmp_password: "secret1234".to_string(),
            login_info_sent: false,
            exported_to_csv: false,
            canvas_status: CanvasStatus::Missing,
            student_status: StudentStatus::Allowed,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.no".to_string(),
            username: "mailer".to_string(),
            password: "relaypass".to_string(),
            from: "Kursadministrasjonen <kurs@example.no>".to_string(),
        }
    }

    #[test]
    fn test_login_info_body_carries_credentials() {
        let student = sample_student();
        let body = login_info_body(&student);

        assert!(body.contains("Hei Kari,"));
        assert!(body.contains("Brukernavn: kari@example.no"));
        assert!(body.contains("Midlertidig passord: secret1234"));
    }

    #[test]
    fn test_build_login_message_addresses_the_student() {
        let message = build_login_message(&sample_settings(), &sample_student()).unwrap();

        let envelope = message.envelope();
        assert_eq!(envelope.from().unwrap().to_string(), "kurs@example.no");
        assert_eq!(envelope.to()[0].to_string(), "kari@example.no");
    }

    #[test]
    fn test_build_login_message_rejects_broken_addresses() {
        let mut student = sample_student();
        student.email = "not an address".to_string();

        assert!(build_login_message(&sample_settings(), &student).is_err());
    }
}
