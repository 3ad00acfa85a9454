//! Shipments: batches of orders travelling together and sharing overhead.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Lifecycle label of a shipment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[default]
    Pending,
    InTransit,
    Arrived,
    Distributed,
}

impl ShipmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InTransit => "in_transit",
            Self::Arrived => "arrived",
            Self::Distributed => "distributed",
        }
    }
}

impl TryFrom<&str> for ShipmentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let key = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "pending" => Ok(Self::Pending),
            "in_transit" => Ok(Self::InTransit),
            "arrived" => Ok(Self::Arrived),
            "distributed" => Ok(Self::Distributed),
            _ => Err(EngineError::InvalidField(format!(
                "invalid shipment status: {}",
                value.trim()
            ))),
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for a new shipment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewShipment {
    pub batch_name: String,
    pub departure_country: Option<String>,
    pub arrival_country: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub arrival_date: Option<NaiveDate>,
    pub base_cost: Money,
    pub transportation_cost: Money,
    pub other_costs: Money,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Shipment {
    pub id: i64,
    pub batch_name: String,
    pub departure_country: Option<String>,
    pub arrival_country: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub arrival_date: Option<NaiveDate>,
    pub base_cost: Money,
    pub transportation_cost: Money,
    pub other_costs: Money,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub batch_name: String,
    pub departure_country: Option<String>,
    pub arrival_country: Option<String>,
    pub departure_date: Option<Date>,
    pub arrival_date: Option<Date>,
    pub base_cost_minor: i64,
    pub transportation_cost_minor: i64,
    pub other_costs_minor: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Shipment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            batch_name: model.batch_name,
            departure_country: model.departure_country,
            arrival_country: model.arrival_country,
            departure_date: model.departure_date,
            arrival_date: model.arrival_date,
            base_cost: Money::new(model.base_cost_minor),
            transportation_cost: Money::new(model.transportation_cost_minor),
            other_costs: Money::new(model.other_costs_minor),
            status: ShipmentStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}

/// Shipment costs can be zero but never negative.
pub(crate) fn validate_costs(costs: &[(Money, &str)]) -> ResultEngine<()> {
    for (amount, label) in costs {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!("{label} must be >= 0")));
        }
    }
    Ok(())
}
