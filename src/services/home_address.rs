use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::debug;

use model::entities::prelude::HomeAddress;
use model::entities::{home_address, student};

use crate::error::Result;

/// Writes a postal address for the student, updating the linked row when
/// one exists and otherwise creating and linking a new one. Returns the
/// student as stored afterwards.
pub async fn update_home_address(
    db: &DatabaseConnection,
    student: student::Model,
    street_address: &str,
    zip_code: i32,
    city_name: &str,
) -> Result<student::Model> {
    let existing = match student.home_address_id {
        Some(address_id) => HomeAddress::find_by_id(address_id).one(db).await?,
        None => None,
    };

    match existing {
        Some(address) => {
            let mut active: home_address::ActiveModel = address.into();
            active.street_address = Set(street_address.to_string());
            active.zip_code = Set(zip_code);
            active.city_name = Set(city_name.to_string());
            let updated = active.update(db).await?;
            debug!("UPDATED ADDRESS -> {} for {}", updated.id, student.email);
            Ok(student)
        }
        None => {
            let address = home_address::ActiveModel {
                street_address: Set(street_address.to_string()),
                zip_code: Set(zip_code),
                city_name: Set(city_name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;

            debug!("CREATED ADDRESS -> {} for {}", address.id, student.email);

            let mut active: student::ActiveModel = student.into();
            active.home_address_id = Set(Some(address.id));
            Ok(active.update(db).await?)
        }
    }
}
