use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    EngineError, Money, Order, OrderDraft, PaymentStatus, PricingSettings, ResultEngine, orders,
    orders::require_positive_id, payments, pricing,
};

use super::{Engine, with_tx};

/// Checks the draft and returns the selling price it must be stored with.
///
/// Constraints are checked in order and the first violation is returned:
/// client id, shipment assignment, quantity, unit price, product.
pub(super) fn price_and_validate(
    draft: &OrderDraft,
    settings: &PricingSettings,
) -> ResultEngine<Money> {
    require_positive_id(draft.client_id, "client")?;
    match draft.shipment_id {
        Some(id) if id > 0 => {}
        _ => return Err(EngineError::MissingShipment),
    }
    if draft.quantity <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity must be > 0, got {}",
            draft.quantity
        )));
    }
    if !draft.original_price.is_positive() {
        return Err(EngineError::InvalidAmount(
            "original price must be > 0".to_string(),
        ));
    }
    if draft.product.trim().is_empty() {
        return Err(EngineError::InvalidField(
            "product must not be empty".to_string(),
        ));
    }

    match draft.selling_price {
        Some(price) if price.is_positive() => Ok(price),
        _ => {
            let price =
                pricing::total_selling_price(draft.original_price, draft.quantity, settings)?;
            if !price.is_positive() {
                return Err(EngineError::InvalidAmount(format!(
                    "selling price of {} x {} rounds to {price}",
                    draft.original_price, draft.quantity
                )));
            }
            tracing::debug!(
                unit_price = %draft.original_price,
                quantity = draft.quantity,
                multiplier = %settings.selling_multiplier,
                selling_price = %price,
                "selling price derived"
            );
            Ok(price)
        }
    }
}

impl Engine {
    /// Validates a draft and returns its selling price, without storing
    /// anything.
    pub fn price_and_validate(&self, draft: &OrderDraft) -> ResultEngine<Money> {
        price_and_validate(draft, &self.pricing_settings())
    }

    /// Validates, prices and stores a new order as `unpaid`.
    ///
    /// No payment is recorded here, see [`Engine::place_order`] for that.
    pub async fn create_order(&self, draft: &OrderDraft) -> ResultEngine<i64> {
        let selling_price = self.price_and_validate(draft)?;
        with_tx!(self, |db_tx| {
            self.insert_order(&db_tx, draft, selling_price).await
        })
    }

    /// Edits an existing order.
    ///
    /// Fields are validated like on creation. The payment status is left as
    /// is and no payment is issued or removed, even if the payment type
    /// changed.
    pub async fn update_order(&self, order_id: i64, draft: &OrderDraft) -> ResultEngine<()> {
        require_positive_id(order_id, "order")?;
        let selling_price = self.price_and_validate(draft)?;
        with_tx!(self, |db_tx| {
            self.require_order(&db_tx, order_id).await?;
            self.require_client(&db_tx, draft.client_id).await?;
            if let Some(shipment_id) = draft.shipment_id {
                self.require_shipment(&db_tx, shipment_id).await?;
            }

            let mut active = draft.to_active_model(selling_price);
            active.id = ActiveValue::Unchanged(order_id);
            active.update(&db_tx).await?;
            tracing::info!(order_id, selling_price = %selling_price, "order updated");
            Ok(())
        })
    }

    pub async fn order(&self, order_id: i64) -> ResultEngine<Order> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            Order::try_from(self.require_order(&db_tx, order_id).await?)
        })
    }

    pub async fn orders_for_shipment(&self, shipment_id: i64) -> ResultEngine<Vec<Order>> {
        require_positive_id(shipment_id, "shipment")?;
        with_tx!(self, |db_tx| {
            self.require_shipment(&db_tx, shipment_id).await?;
            self.shipment_orders(&db_tx, shipment_id).await
        })
    }

    pub async fn orders_for_client(&self, client_id: i64) -> ResultEngine<Vec<Order>> {
        require_positive_id(client_id, "client")?;
        with_tx!(self, |db_tx| {
            self.require_client(&db_tx, client_id).await?;
            let models = orders::Entity::find()
                .filter(orders::Column::ClientId.eq(client_id))
                .order_by_desc(orders::Column::CreatedAt)
                .order_by_desc(orders::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Order::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Removes an order together with its payments.
    pub async fn delete_order(&self, order_id: i64) -> ResultEngine<()> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            self.require_order(&db_tx, order_id).await?;
            payments::Entity::delete_many()
                .filter(payments::Column::OrderId.eq(order_id))
                .exec(&db_tx)
                .await?;
            orders::Entity::delete_by_id(order_id).exec(&db_tx).await?;
            tracing::info!(order_id, "order deleted");
            Ok(())
        })
    }

    /// Selling price minus everything paid so far, never below zero.
    pub async fn remaining_amount(&self, order_id: i64) -> ResultEngine<Money> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            let order = self.require_order(&db_tx, order_id).await?;
            let paid = self.total_paid(&db_tx, order_id).await?;
            Ok(pricing::remaining(
                Money::new(order.selling_price_minor),
                paid,
            ))
        })
    }

    /// Re-derives and stores the payment status from the current payments.
    pub async fn recalculate_payment_status(&self, order_id: i64) -> ResultEngine<PaymentStatus> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            self.recompute_payment_status(&db_tx, order_id).await
        })
    }

    pub(super) async fn insert_order(
        &self,
        db_tx: &DatabaseTransaction,
        draft: &OrderDraft,
        selling_price: Money,
    ) -> ResultEngine<i64> {
        self.require_client(db_tx, draft.client_id).await?;
        if let Some(shipment_id) = draft.shipment_id {
            self.require_shipment(db_tx, shipment_id).await?;
        }

        let mut active = draft.to_active_model(selling_price);
        active.payment_status = ActiveValue::Set(PaymentStatus::Unpaid.as_str().to_string());
        active.created_at = ActiveValue::Set(Utc::now());
        let model = active.insert(db_tx).await?;
        tracing::info!(
            order_id = model.id,
            client_id = model.client_id,
            shipment_id = model.shipment_id,
            selling_price = %selling_price,
            "order created"
        );
        Ok(model.id)
    }

    pub(super) async fn require_order(
        &self,
        db_tx: &DatabaseTransaction,
        order_id: i64,
    ) -> ResultEngine<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))
    }

    pub(super) async fn shipment_orders(
        &self,
        db_tx: &DatabaseTransaction,
        shipment_id: i64,
    ) -> ResultEngine<Vec<Order>> {
        let models = orders::Entity::find()
            .filter(orders::Column::ShipmentId.eq(shipment_id))
            .order_by_asc(orders::Column::Id)
            .all(db_tx)
            .await?;
        models.into_iter().map(Order::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{PaymentType, Platform};

    fn draft() -> OrderDraft {
        OrderDraft {
            client_id: 1,
            shipment_id: Some(1),
            product: "Linen shirt".to_string(),
            quantity: 2,
            original_price: Money::new(1800),
            payment_type: PaymentType::Deposit,
            platform: Platform::Shein,
            ..Default::default()
        }
    }

    #[test]
    fn derives_selling_price_when_missing() {
        let price = price_and_validate(&draft(), &PricingSettings::default()).unwrap();
        assert_eq!(price, Money::new(18000));
    }

    #[test]
    fn keeps_an_explicit_selling_price() {
        let mut draft = draft();
        draft.selling_price = Some(Money::new(15000));
        let price = price_and_validate(&draft, &PricingSettings::default()).unwrap();
        assert_eq!(price, Money::new(15000));

        draft.selling_price = Some(Money::ZERO);
        let price = price_and_validate(&draft, &PricingSettings::default()).unwrap();
        assert_eq!(price, Money::new(18000));
    }

    #[test]
    fn reports_the_first_violation() {
        let settings = PricingSettings::default();

        let mut bad = draft();
        bad.client_id = 0;
        bad.shipment_id = None;
        assert_eq!(
            price_and_validate(&bad, &settings).unwrap_err(),
            EngineError::InvalidId("client id must be > 0".to_string())
        );

        let mut bad = draft();
        bad.shipment_id = None;
        bad.quantity = 0;
        assert_eq!(
            price_and_validate(&bad, &settings).unwrap_err(),
            EngineError::MissingShipment
        );

        let mut bad = draft();
        bad.shipment_id = Some(0);
        assert_eq!(
            price_and_validate(&bad, &settings).unwrap_err(),
            EngineError::MissingShipment
        );

        let mut bad = draft();
        bad.quantity = -1;
        assert_eq!(
            price_and_validate(&bad, &settings).unwrap_err(),
            EngineError::InvalidQuantity("quantity must be > 0, got -1".to_string())
        );

        let mut bad = draft();
        bad.original_price = Money::ZERO;
        assert_eq!(
            price_and_validate(&bad, &settings).unwrap_err(),
            EngineError::InvalidAmount("original price must be > 0".to_string())
        );
    }

    #[test]
    fn rejects_a_price_that_rounds_to_zero() {
        let settings = PricingSettings::new(dec!(3.5), dec!(0.4)).unwrap();
        let mut tiny = draft();
        tiny.original_price = Money::new(1);
        tiny.quantity = 1;
        assert_eq!(
            price_and_validate(&tiny, &settings).unwrap_err(),
            EngineError::InvalidAmount("selling price of 0.01 x 1 rounds to 0.00".to_string())
        );

        tiny.quantity = 3;
        assert_eq!(
            price_and_validate(&tiny, &settings).unwrap_err(),
            EngineError::InvalidAmount("selling price of 0.01 x 3 rounds to 0.00".to_string())
        );

        let half_cent = PricingSettings::new(dec!(3.5), dec!(0.5)).unwrap();
        tiny.quantity = 1;
        assert_eq!(price_and_validate(&tiny, &half_cent).unwrap(), Money::new(1));
    }
}
