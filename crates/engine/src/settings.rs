//! Pricing parameters.
//!
//! The engine never reads a process-wide singleton: the application passes a
//! [`PricingSettings`] value to the builder (and may replace it later with
//! [`Engine::reload_settings`](crate::Engine::reload_settings)). Each pricing
//! or aggregation call works on one snapshot taken when the call starts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// The two global numeric parameters driving every pricing formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Source currency to local currency rate. Only used for cost of goods.
    pub conversion_rate: Decimal,
    /// Factor turning a source currency unit price into a local selling price.
    pub selling_multiplier: Decimal,
}

impl PricingSettings {
    pub const DEFAULT_CONVERSION_RATE: Decimal = Decimal::from_parts(35, 0, 0, false, 1);
    pub const DEFAULT_SELLING_MULTIPLIER: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

    /// Builds validated settings.
    pub fn new(conversion_rate: Decimal, selling_multiplier: Decimal) -> ResultEngine<Self> {
        let settings = Self {
            conversion_rate,
            selling_multiplier,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Both rates must be strictly positive.
    pub fn validate(&self) -> ResultEngine<()> {
        if self.conversion_rate <= Decimal::ZERO {
            return Err(EngineError::InvalidSettings(
                "conversion_rate must be > 0".to_string(),
            ));
        }
        if self.selling_multiplier <= Decimal::ZERO {
            return Err(EngineError::InvalidSettings(
                "selling_multiplier must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            conversion_rate: Self::DEFAULT_CONVERSION_RATE,
            selling_multiplier: Self::DEFAULT_SELLING_MULTIPLIER,
        }
    }
}
