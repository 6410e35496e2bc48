use anyhow::{Context, Result};
use sea_orm::{Database, EntityTrait};
use tracing::trace;

use model::entities::prelude::{HomeAddress, Phone};

use crate::cli::StudentCommand;
use crate::services::student;

pub async fn student_command(command: StudentCommand, database_url: &str) -> Result<()> {
    trace!("Entering student_command function");

    let db = Database::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match command {
        StudentCommand::List => {
            let students = student::list(&db).await?;
            for s in &students {
                println!("{:<30} {}", s.full_name(), s.email);
            }
            println!("{} students registered.", students.len());
        }
        StudentCommand::Info { query } => {
            let found = if query.contains('@') {
                student::get_by_email(&db, &query).await?
            } else {
                student::get_by_full_name(&db, &query).await?
            };

            let Some(s) = found else {
                anyhow::bail!("No student matching '{}'", query);
            };

            println!("Name:            {}", s.full_name());
            println!("Email:           {}", s.email);
            if let Some(phone) = Phone::find_by_id(s.phone_id).one(&db).await? {
                match phone.phone_number {
                    Some(number) => println!("Phone:           {}", number),
                    None => println!("Phone:           -"),
                }
            }
            if let Some(address_id) = s.home_address_id {
                if let Some(address) = HomeAddress::find_by_id(address_id).one(&db).await? {
                    println!(
                        "Address:         {}, {} {}",
                        address.street_address, address.zip_code, address.city_name
                    );
                }
            }
            if let Some(birth_date) = s.birth_date {
                println!("Born:            {}", birth_date);
            }
            println!("Canvas status:   {:?}", s.canvas_status);
            println!("Student status:  {:?}", s.student_status);
            println!("Login info sent: {}", s.login_info_sent);
            println!("Exported to CSV: {}", s.exported_to_csv);
        }
        StudentCommand::Create {
            first_name,
            last_name,
            email,
            phone,
        } => {
            let (s, created) =
                student::create_student(&db, &first_name, &last_name, &email, phone).await?;
            if created {
                println!("Created student {} <{}>.", s.full_name(), s.email);
            } else {
                println!("Student already registered as {} <{}>.", s.full_name(), s.email);
            }
        }
    }

    Ok(())
}
