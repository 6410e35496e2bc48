use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

use model::entities::phone;
use model::entities::prelude::Phone;

use crate::error::Result;

/// Returns a phone row holding the given number, reusing an existing row
/// when the number is already known. `None` always inserts an empty row,
/// so a student row can exist even when no number could be parsed.
pub async fn create_phone(
    db: &DatabaseConnection,
    number: Option<i32>,
) -> Result<phone::Model> {
    if let Some(number) = number {
        if let Some(existing) = Phone::find()
            .filter(phone::Column::PhoneNumber.eq(number))
            .one(db)
            .await?
        {
            debug!("PHONE ALREADY EXIST -> {}", number);
            return Ok(existing);
        }
    }

    let created = phone::ActiveModel {
        phone_number: Set(number),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("CREATED PHONE -> {:?}", created.phone_number);
    Ok(created)
}
