//! Database-facing service functions, one module per aggregate.
//! These are free async functions over a `DatabaseConnection`, shared by
//! the CLI commands and the spreadsheet/Canvas adapters.

pub mod course;
pub mod enrollment;
pub mod home_address;
pub mod phone;
pub mod student;
