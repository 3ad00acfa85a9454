//! Orders placed on behalf of clients.
//!
//! An [`Order`] carries the source currency unit price, the derived local
//! selling price and the derived [`PaymentStatus`]. The status is only
//! re-derived when a payment changes (or on explicit recalculation), so it can
//! be stale between those events.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// How the client chose to pay when the order was placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Half of the selling price up front.
    Deposit,
    /// Whole selling price up front.
    Full,
    /// Nothing up front.
    #[default]
    OnDelivery,
}

impl PaymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Full => "full",
            Self::OnDelivery => "on_delivery",
        }
    }
}

impl TryFrom<&str> for PaymentType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let key = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "deposit" => Ok(Self::Deposit),
            "full" | "full_payment" => Ok(Self::Full),
            "on_delivery" => Ok(Self::OnDelivery),
            _ => Err(EngineError::InvalidField(format!(
                "invalid payment type: {}",
                value.trim()
            ))),
        }
    }
}

/// Derived classification of an order's payments against its selling price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "partial" => Ok(Self::Partial),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidField(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// E-commerce platform the order was placed on.
///
/// Unrecognized input falls back to [`Platform::Other`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Shein,
    Temu,
    AliExpress,
    Amazon,
    Trendyol,
    #[default]
    Other,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shein => "shein",
            Self::Temu => "temu",
            Self::AliExpress => "aliexpress",
            Self::Amazon => "amazon",
            Self::Trendyol => "trendyol",
            Self::Other => "other",
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "shein" => Self::Shein,
            "temu" => Self::Temu,
            "aliexpress" | "ali express" => Self::AliExpress,
            "amazon" => Self::Amazon,
            "trendyol" => Self::Trendyol,
            _ => Self::Other,
        }
    }
}

/// Raw order submission, as collected by a form or the CLI.
///
/// `selling_price` is optional: when missing (or not positive) it is derived
/// from `original_price` and `quantity`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub client_id: i64,
    pub shipment_id: Option<i64>,
    pub delivery_option_id: Option<i64>,
    pub product: String,
    pub size: Option<String>,
    pub quantity: i32,
    pub original_price: Money,
    pub selling_price: Option<Money>,
    pub payment_type: PaymentType,
    pub platform: Platform,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub shipment_id: Option<i64>,
    pub delivery_option_id: Option<i64>,
    pub product: String,
    pub size: Option<String>,
    pub quantity: i32,
    /// Unit price in the source currency.
    pub original_price: Money,
    /// Total local price charged to the client.
    pub selling_price: Money,
    pub payment_type: PaymentType,
    pub payment_status: PaymentStatus,
    pub platform: Platform,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    pub shipment_id: Option<i64>,
    pub delivery_option_id: Option<i64>,
    pub product: String,
    pub size: Option<String>,
    pub quantity: i32,
    pub original_price_minor: i64,
    pub selling_price_minor: i64,
    pub payment_type: String,
    pub payment_status: String,
    pub platform: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::shipments::Entity",
        from = "Column::ShipmentId",
        to = "super::shipments::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Shipments,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::shipments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            client_id: model.client_id,
            shipment_id: model.shipment_id,
            delivery_option_id: model.delivery_option_id,
            product: model.product,
            size: model.size,
            quantity: model.quantity,
            original_price: Money::new(model.original_price_minor),
            selling_price: Money::new(model.selling_price_minor),
            payment_type: PaymentType::try_from(model.payment_type.as_str())?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            platform: Platform::from(model.platform.as_str()),
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

impl OrderDraft {
    /// Active model with every editable column set. `id`, `payment_status`
    /// and `created_at` are left to the caller.
    pub(crate) fn to_active_model(&self, selling_price: Money) -> ActiveModel {
        ActiveModel {
            client_id: ActiveValue::Set(self.client_id),
            shipment_id: ActiveValue::Set(self.shipment_id),
            delivery_option_id: ActiveValue::Set(self.delivery_option_id),
            product: ActiveValue::Set(self.product.trim().to_string()),
            size: ActiveValue::Set(self.size.clone()),
            quantity: ActiveValue::Set(self.quantity),
            original_price_minor: ActiveValue::Set(self.original_price.cents()),
            selling_price_minor: ActiveValue::Set(selling_price.cents()),
            payment_type: ActiveValue::Set(self.payment_type.as_str().to_string()),
            platform: ActiveValue::Set(self.platform.as_str().to_string()),
            notes: ActiveValue::Set(self.notes.clone()),
            ..Default::default()
        }
    }
}

pub(crate) fn require_positive_id(id: i64, label: &str) -> ResultEngine<()> {
    if id <= 0 {
        return Err(EngineError::InvalidId(format!("{label} id must be > 0")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_falls_back_to_other() {
        assert_eq!(Platform::from("SHEIN"), Platform::Shein);
        assert_eq!(Platform::from(" AliExpress "), Platform::AliExpress);
        assert_eq!(Platform::from("ebay"), Platform::Other);
        assert_eq!(Platform::from(""), Platform::Other);
    }

    #[test]
    fn payment_type_parses_form_labels() {
        assert_eq!(PaymentType::try_from("Deposit").unwrap(), PaymentType::Deposit);
        assert_eq!(PaymentType::try_from("Full Payment").unwrap(), PaymentType::Full);
        assert_eq!(
            PaymentType::try_from("On Delivery").unwrap(),
            PaymentType::OnDelivery
        );
        assert!(PaymentType::try_from("barter").is_err());
    }

    #[test]
    fn payment_status_round_trips_storage_form() {
        for status in [PaymentStatus::Unpaid, PaymentStatus::Partial, PaymentStatus::Paid] {
            assert_eq!(PaymentStatus::try_from(status.as_str()).unwrap(), status);
        }
    }
}
