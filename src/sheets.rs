//! Google Sheets import pipeline.
//!
//! Course applications arrive as rows in a shared signup spreadsheet. The
//! [`client`] talks to the Sheets REST API, the [`parser`] turns the loosely
//! formatted Norwegian signup columns into typed values and the [`import`]
//! flow writes the result into the database and colors the processed rows.

pub mod client;
pub mod import;
pub mod parser;
