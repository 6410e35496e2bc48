use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::GoogleSettings;
use crate::error::{GatevasError, Result};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// How many columns a row color stretches over, matching the widest signup
/// sheet layout in use.
const COLORED_COLUMNS: i64 = 12;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowColorRequest {
    repeat_cell: RepeatCell,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RepeatCell {
    range: GridRange,
    cell: CellData,
    fields: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GridRange {
    sheet_id: i64,
    start_row_index: i64,
    end_row_index: i64,
    start_column_index: i64,
    end_column_index: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellData {
    user_entered_format: CellFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CellFormat {
    background_color: Color,
}

#[derive(Debug, Serialize)]
struct Color {
    red: f32,
    green: f32,
    blue: f32,
}

#[derive(Debug, Serialize)]
struct BatchUpdateBody {
    requests: Vec<RowColorRequest>,
}

/// Pulls the row matrix out of a values-endpoint response body. A response
/// without a `values` key means the range is empty, not broken.
fn parse_value_range(body: &str) -> Result<Vec<Vec<String>>> {
    let range: ValueRange = serde_json::from_str(body)?;
    Ok(range.values)
}

pub struct SheetsClient {
    http: reqwest::Client,
    api_token: String,
}

impl SheetsClient {
    pub fn new(settings: &GoogleSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: settings.api_token.clone(),
        }
    }

    /// Fetches every populated row of the first sheet. An empty spreadsheet
    /// comes back as an empty vector rather than an error.
    pub async fn get_values(&self, spreadsheet_id: &str) -> Result<Vec<Vec<String>>> {
        trace!("Entering get_values function");

        let url = format!("{SHEETS_API_BASE}/{spreadsheet_id}/values/A:Z");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatevasError::Api {
                message: format!(
                    "Sheets values request for '{}' failed with status {}",
                    spreadsheet_id,
                    response.status()
                ),
            });
        }

        let body = response.text().await?;
        let values = parse_value_range(&body)?;
        debug!("Fetched {} rows from spreadsheet.", values.len());
        Ok(values)
    }

    /// Builds a request that paints one whole row with the given RGB color.
    /// Row indices are zero based and count the header row.
    pub fn row_color_request(row_index: usize, red: f32, green: f32, blue: f32) -> RowColorRequest {
        RowColorRequest {
            repeat_cell: RepeatCell {
                range: GridRange {
                    sheet_id: 0,
                    start_row_index: row_index as i64,
                    end_row_index: row_index as i64 + 1,
                    start_column_index: 0,
                    end_column_index: COLORED_COLUMNS,
                },
                cell: CellData {
                    user_entered_format: CellFormat {
                        background_color: Color { red, green, blue },
                    },
                },
                fields: "userEnteredFormat.backgroundColor".to_string(),
            },
        }
    }

    /// Applies the queued row colors in one batch update. Nothing is sent
    /// when the batch is empty.
    pub async fn update_sheet_colors(
        &self,
        spreadsheet_id: &str,
        requests: Vec<RowColorRequest>,
    ) -> Result<()> {
        trace!("Entering update_sheet_colors function");

        if requests.is_empty() {
            return Ok(());
        }

        let url = format!("{SHEETS_API_BASE}/{spreadsheet_id}:batchUpdate");
        let body = BatchUpdateBody { requests };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GatevasError::Api {
                message: format!(
                    "Sheets batch update for '{}' failed with status {}",
                    spreadsheet_id,
                    response.status()
                ),
            });
        }

        debug!("Updated row colors for {} rows.", body.requests.len());
        Ok(())
    }
}
