use std::sync::{Arc, PoisonError, RwLock};

use sea_orm::DatabaseConnection;

use crate::{EngineError, PricingSettings, ResultEngine};

mod clients;
mod ledger;
mod orders;
mod placement;
mod shipments;

pub use placement::OrderPlacement;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
    settings: Arc<RwLock<PricingSettings>>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Snapshot of the pricing settings currently in force.
    pub fn pricing_settings(&self) -> PricingSettings {
        *self.settings.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the pricing settings used by subsequent calls.
    ///
    /// Calls already running keep the snapshot they started with.
    pub fn reload_settings(&self, settings: PricingSettings) -> ResultEngine<()> {
        settings.validate()?;
        let mut current = self.settings.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(
            conversion_rate = %settings.conversion_rate,
            selling_multiplier = %settings.selling_multiplier,
            "pricing settings reloaded"
        );
        *current = settings;
        Ok(())
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidField(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    settings: PricingSettings,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the pricing settings. Defaults to [`PricingSettings::default`].
    pub fn settings(mut self, settings: PricingSettings) -> EngineBuilder {
        self.settings = settings;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        self.settings.validate()?;
        Ok(Engine {
            database: self.database,
            settings: Arc::new(RwLock::new(self.settings)),
        })
    }
}
