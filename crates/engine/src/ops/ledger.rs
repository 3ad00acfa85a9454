//! Payment ledger.
//!
//! Each payment mutation and the re-derivation of the owning order's
//! [`PaymentStatus`] share one database transaction: the status written is
//! always the one implied by the payments committed with it.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};

use crate::{
    EngineError, Money, Payment, PaymentInput, PaymentStatus, ResultEngine, orders,
    orders::require_positive_id, payments, pricing,
};

use super::{Engine, normalize_optional_text, with_tx};

fn validate_payment(input: &PaymentInput) -> ResultEngine<()> {
    require_positive_id(input.order_id, "order")?;
    if !input.amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "payment amount must be > 0".to_string(),
        ));
    }
    if input.method.is_blank() {
        return Err(EngineError::InvalidField(
            "payment method must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Records a payment and refreshes the order's payment status.
    pub async fn add_payment(&self, input: &PaymentInput) -> ResultEngine<i64> {
        validate_payment(input)?;
        with_tx!(self, |db_tx| {
            self.require_order(&db_tx, input.order_id).await?;
            let payment_id = self.insert_payment(&db_tx, input).await?;
            self.recompute_payment_status(&db_tx, input.order_id).await?;
            Ok(payment_id)
        })
    }

    /// Edits amount, method, comment (and possibly the order) of a payment.
    ///
    /// The creation time never changes. Both the previous and the new owning
    /// order get their status refreshed.
    pub async fn update_payment(&self, payment_id: i64, input: &PaymentInput) -> ResultEngine<()> {
        require_positive_id(payment_id, "payment")?;
        validate_payment(input)?;
        with_tx!(self, |db_tx| {
            let existing = self.require_payment(&db_tx, payment_id).await?;
            self.require_order(&db_tx, input.order_id).await?;

            payments::ActiveModel {
                id: ActiveValue::Unchanged(payment_id),
                order_id: ActiveValue::Set(input.order_id),
                amount_minor: ActiveValue::Set(input.amount.cents()),
                method: ActiveValue::Set(input.method.as_str().to_string()),
                comment: ActiveValue::Set(normalize_optional_text(input.comment.as_deref())),
                ..Default::default()
            }
            .update(&db_tx)
            .await?;
            tracing::info!(
                payment_id,
                order_id = input.order_id,
                amount = %input.amount,
                "payment updated"
            );

            if existing.order_id != input.order_id {
                self.recompute_payment_status(&db_tx, existing.order_id)
                    .await?;
            }
            self.recompute_payment_status(&db_tx, input.order_id)
                .await?;
            Ok(())
        })
    }

    /// Deletes a payment of `order_id` and refreshes that order's status.
    pub async fn delete_payment(&self, payment_id: i64, order_id: i64) -> ResultEngine<()> {
        require_positive_id(payment_id, "payment")?;
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            let existing = self.require_payment(&db_tx, payment_id).await?;
            if existing.order_id != order_id {
                return Err(EngineError::InvalidId(format!(
                    "payment {payment_id} does not belong to order {order_id}"
                )));
            }
            payments::Entity::delete_by_id(payment_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(payment_id, order_id, "payment deleted");
            self.recompute_payment_status(&db_tx, order_id).await?;
            Ok(())
        })
    }

    /// Sum of all payments recorded for the order, zero when there are none.
    pub async fn total_paid_for_order(&self, order_id: i64) -> ResultEngine<Money> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| { self.total_paid(&db_tx, order_id).await })
    }

    /// Payment history of an order, oldest first.
    pub async fn payments_for_order(&self, order_id: i64) -> ResultEngine<Vec<Payment>> {
        require_positive_id(order_id, "order")?;
        with_tx!(self, |db_tx| {
            self.require_order(&db_tx, order_id).await?;
            let models = payments::Entity::find()
                .filter(payments::Column::OrderId.eq(order_id))
                .order_by_asc(payments::Column::CreatedAt)
                .order_by_asc(payments::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Payment::from).collect::<Vec<_>>())
        })
    }

    pub async fn payment(&self, payment_id: i64) -> ResultEngine<Payment> {
        require_positive_id(payment_id, "payment")?;
        with_tx!(self, |db_tx| {
            Ok(Payment::from(self.require_payment(&db_tx, payment_id).await?))
        })
    }

    pub(super) async fn insert_payment(
        &self,
        db_tx: &DatabaseTransaction,
        input: &PaymentInput,
    ) -> ResultEngine<i64> {
        validate_payment(input)?;
        let model = payments::ActiveModel {
            id: ActiveValue::NotSet,
            order_id: ActiveValue::Set(input.order_id),
            amount_minor: ActiveValue::Set(input.amount.cents()),
            method: ActiveValue::Set(input.method.as_str().to_string()),
            comment: ActiveValue::Set(normalize_optional_text(input.comment.as_deref())),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(db_tx)
        .await?;
        tracing::info!(
            payment_id = model.id,
            order_id = model.order_id,
            amount = %input.amount,
            method = %input.method,
            "payment recorded"
        );
        Ok(model.id)
    }

    pub(super) async fn total_paid(
        &self,
        db_tx: &DatabaseTransaction,
        order_id: i64,
    ) -> ResultEngine<Money> {
        let amounts: Vec<i64> = payments::Entity::find()
            .select_only()
            .column(payments::Column::AmountMinor)
            .filter(payments::Column::OrderId.eq(order_id))
            .into_tuple()
            .all(db_tx)
            .await?;
        Money::try_sum(amounts.into_iter().map(Money::new))
    }

    /// Derives the status from the stored payments and writes it on the order.
    pub(super) async fn recompute_payment_status(
        &self,
        db_tx: &DatabaseTransaction,
        order_id: i64,
    ) -> ResultEngine<PaymentStatus> {
        let order = self.require_order(db_tx, order_id).await?;
        let previous = PaymentStatus::try_from(order.payment_status.as_str())?;
        let selling_price = Money::new(order.selling_price_minor);
        let paid = self.total_paid(db_tx, order_id).await?;
        let status = pricing::payment_status(selling_price, paid);

        tracing::debug!(
            order_id,
            selling_price = %selling_price,
            paid = %paid,
            status = status.as_str(),
            "payment status recomputed"
        );

        if status != previous {
            orders::ActiveModel {
                id: ActiveValue::Unchanged(order_id),
                payment_status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            }
            .update(db_tx)
            .await?;

            if previous == PaymentStatus::Paid {
                tracing::warn!(
                    order_id,
                    to = status.as_str(),
                    "paid order is no longer fully paid"
                );
            } else {
                tracing::info!(
                    order_id,
                    from = previous.as_str(),
                    to = status.as_str(),
                    "payment status changed"
                );
            }
        }

        Ok(status)
    }

    async fn require_payment(
        &self,
        db_tx: &DatabaseTransaction,
        payment_id: i64,
    ) -> ResultEngine<payments::Model> {
        payments::Entity::find_by_id(payment_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment not exists".to_string()))
    }
}
