use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, FinancialSummary, Money, NewShipment, ResultEngine, Shipment, ShipmentStatus,
    orders::require_positive_id, shipments, shipments::validate_costs,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Opens a new shipment in the `pending` state and returns its id.
    pub async fn new_shipment(&self, shipment: NewShipment) -> ResultEngine<i64> {
        let batch_name = normalize_required_text(&shipment.batch_name, "batch name")?;
        validate_costs(&[
            (shipment.base_cost, "base cost"),
            (shipment.transportation_cost, "transportation cost"),
            (shipment.other_costs, "other costs"),
        ])?;
        with_tx!(self, |db_tx| {
            let model = shipments::ActiveModel {
                id: ActiveValue::NotSet,
                batch_name: ActiveValue::Set(batch_name),
                departure_country: ActiveValue::Set(normalize_optional_text(
                    shipment.departure_country.as_deref(),
                )),
                arrival_country: ActiveValue::Set(normalize_optional_text(
                    shipment.arrival_country.as_deref(),
                )),
                departure_date: ActiveValue::Set(shipment.departure_date),
                arrival_date: ActiveValue::Set(shipment.arrival_date),
                base_cost_minor: ActiveValue::Set(shipment.base_cost.cents()),
                transportation_cost_minor: ActiveValue::Set(shipment.transportation_cost.cents()),
                other_costs_minor: ActiveValue::Set(shipment.other_costs.cents()),
                status: ActiveValue::Set(ShipmentStatus::Pending.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(shipment_id = model.id, batch = %model.batch_name, "shipment created");
            Ok(model.id)
        })
    }

    pub async fn shipment(&self, shipment_id: i64) -> ResultEngine<Shipment> {
        require_positive_id(shipment_id, "shipment")?;
        with_tx!(self, |db_tx| {
            let model = self.require_shipment(&db_tx, shipment_id).await?;
            Shipment::try_from(model)
        })
    }

    /// All shipments, newest first.
    pub async fn shipments(&self) -> ResultEngine<Vec<Shipment>> {
        with_tx!(self, |db_tx| {
            let models = shipments::Entity::find()
                .order_by_desc(shipments::Column::CreatedAt)
                .order_by_desc(shipments::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Shipment::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Replaces the three shipment level costs.
    pub async fn update_shipment_costs(
        &self,
        shipment_id: i64,
        base_cost: Money,
        transportation_cost: Money,
        other_costs: Money,
    ) -> ResultEngine<()> {
        require_positive_id(shipment_id, "shipment")?;
        validate_costs(&[
            (base_cost, "base cost"),
            (transportation_cost, "transportation cost"),
            (other_costs, "other costs"),
        ])?;
        with_tx!(self, |db_tx| {
            self.require_shipment(&db_tx, shipment_id).await?;
            shipments::ActiveModel {
                id: ActiveValue::Unchanged(shipment_id),
                base_cost_minor: ActiveValue::Set(base_cost.cents()),
                transportation_cost_minor: ActiveValue::Set(transportation_cost.cents()),
                other_costs_minor: ActiveValue::Set(other_costs.cents()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            Ok(())
        })
    }

    pub async fn set_shipment_status(
        &self,
        shipment_id: i64,
        status: ShipmentStatus,
    ) -> ResultEngine<()> {
        require_positive_id(shipment_id, "shipment")?;
        with_tx!(self, |db_tx| {
            self.require_shipment(&db_tx, shipment_id).await?;
            shipments::ActiveModel {
                id: ActiveValue::Unchanged(shipment_id),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            tracing::info!(shipment_id, status = status.as_str(), "shipment status changed");
            Ok(())
        })
    }

    /// Number of orders currently assigned to the shipment.
    pub async fn shipment_order_count(&self, shipment_id: i64) -> ResultEngine<u64> {
        require_positive_id(shipment_id, "shipment")?;
        with_tx!(self, |db_tx| {
            self.require_shipment(&db_tx, shipment_id).await?;
            let count = crate::orders::Entity::find()
                .filter(crate::orders::Column::ShipmentId.eq(shipment_id))
                .count(&db_tx)
                .await?;
            Ok(count)
        })
    }

    /// Cost, revenue and profit of a shipment, computed from its current
    /// orders and the settings in force when the call starts.
    pub async fn financial_summary(&self, shipment_id: i64) -> ResultEngine<FinancialSummary> {
        require_positive_id(shipment_id, "shipment")?;
        let settings = self.pricing_settings();
        with_tx!(self, |db_tx| {
            let shipment = Shipment::try_from(self.require_shipment(&db_tx, shipment_id).await?)?;
            let orders = self.shipment_orders(&db_tx, shipment_id).await?;
            let summary = FinancialSummary::compute(&shipment, &orders, &settings)?;
            tracing::debug!(
                shipment_id,
                orders = summary.total_orders,
                revenue = %summary.total_revenue,
                net_profit = %summary.net_profit,
                "shipment summary computed"
            );
            Ok(summary)
        })
    }

    pub(super) async fn require_shipment(
        &self,
        db_tx: &DatabaseTransaction,
        shipment_id: i64,
    ) -> ResultEngine<shipments::Model> {
        shipments::Entity::find_by_id(shipment_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("shipment not exists".to_string()))
    }
}
