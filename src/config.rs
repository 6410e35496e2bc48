use serde::Deserialize;

use crate::error::Result;

/// Google Sheets access settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleSettings {
    /// Bearer token used for the Sheets API calls.
    pub api_token: String,
}

/// Canvas LMS access settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CanvasSettings {
    /// Base URL of the Canvas instance, e.g. "https://canvas.example.com".
    pub base_url: String,
    pub api_token: String,
}

/// SMTP relay used for the login-information mail.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. "Kursadministrasjon <kurs@example.com>".
    pub from: String,
}

/// External-service settings, loaded from `gatevas.toml` plus `GATEVAS_*`
/// environment overrides. The database URL is not part of this; every
/// command takes it as `--database-url` / `DATABASE_URL` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub google: GoogleSettings,
    pub canvas: CanvasSettings,
    pub smtp: SmtpSettings,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("gatevas").required(false))
            .add_source(config::Environment::with_prefix("GATEVAS").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
