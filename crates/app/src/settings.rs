//! Handles settings for the application.
//!
//! Values are read, lowest priority first, from built-in defaults, an optional
//! TOML file (`settings.toml` unless `--config` says otherwise) and
//! `RESELLER__*` environment variables (e.g. `RESELLER__PRICING__SELLING_MULTIPLIER=4.5`).
use config::{Config, Environment, File};
use engine::PricingSettings;
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "settings.toml";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    #[serde(default)]
    pub pricing: PricingSettings,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("database.sqlite", "./reseller.db")?
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("RESELLER").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
