use sea_orm::TransactionTrait;
use serde::Serialize;

use crate::{
    EngineError, Money, OrderDraft, PaymentInput, PaymentMethod, PaymentStatus, PaymentType,
    ResultEngine, pricing,
};

use super::{Engine, orders::price_and_validate, with_tx};

/// Outcome of [`Engine::place_order`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OrderPlacement {
    pub order_id: i64,
    pub selling_price: Money,
    /// Payment issued because of the payment type, if any.
    pub payment_id: Option<i64>,
    pub payment_status: PaymentStatus,
}

/// Amount collected at order time for a given payment type.
///
/// A deposit defaults to half the selling price; `deposit_override` replaces
/// it (zero means no deposit was taken).
fn upfront_amount(
    payment_type: PaymentType,
    selling_price: Money,
    deposit_override: Option<Money>,
) -> ResultEngine<Option<(Money, PaymentMethod)>> {
    if !selling_price.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "selling price must be > 0, got {selling_price}"
        )));
    }
    match payment_type {
        PaymentType::OnDelivery => Ok(None),
        PaymentType::Full => Ok(Some((selling_price, PaymentMethod::FullPayment))),
        PaymentType::Deposit => {
            let amount = match deposit_override {
                Some(amount) if amount.is_negative() => {
                    return Err(EngineError::InvalidAmount(
                        "deposit must be >= 0".to_string(),
                    ));
                }
                Some(amount) if amount > selling_price => {
                    return Err(EngineError::InvalidAmount(format!(
                        "deposit {amount} exceeds selling price {selling_price}"
                    )));
                }
                Some(amount) => amount,
                None => pricing::deposit(selling_price)?,
            };
            Ok(amount
                .is_positive()
                .then_some((amount, PaymentMethod::Deposit)))
        }
    }
}

impl Engine {
    /// Creates an order and records the payment its payment type implies:
    ///
    /// - `Deposit`: a `Deposit` payment of half the selling price (or
    ///   `deposit_override`), leaving the order `partial`.
    /// - `Full`: a `Full Payment` of the whole selling price, leaving it `paid`.
    /// - `OnDelivery`: nothing, the order stays `unpaid`.
    ///
    /// Everything happens in one transaction.
    pub async fn place_order(
        &self,
        draft: &OrderDraft,
        deposit_override: Option<Money>,
    ) -> ResultEngine<OrderPlacement> {
        let selling_price = price_and_validate(draft, &self.pricing_settings())?;
        let upfront = upfront_amount(draft.payment_type, selling_price, deposit_override)?;

        with_tx!(self, |db_tx| {
            let order_id = self.insert_order(&db_tx, draft, selling_price).await?;

            let (payment_id, payment_status) = match &upfront {
                Some((amount, method)) => {
                    let input = PaymentInput::new(order_id, *amount, method.clone());
                    let payment_id = self.insert_payment(&db_tx, &input).await?;
                    let status = self.recompute_payment_status(&db_tx, order_id).await?;
                    (Some(payment_id), status)
                }
                None => (None, PaymentStatus::Unpaid),
            };

            Ok(OrderPlacement {
                order_id,
                selling_price,
                payment_id,
                payment_status,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_defaults_to_half() {
        let upfront = upfront_amount(PaymentType::Deposit, Money::new(18000), None).unwrap();
        assert_eq!(upfront, Some((Money::new(9000), PaymentMethod::Deposit)));
    }

    #[test]
    fn deposit_override_is_bounded() {
        assert_eq!(
            upfront_amount(PaymentType::Deposit, Money::new(18000), Some(Money::new(5000)))
                .unwrap(),
            Some((Money::new(5000), PaymentMethod::Deposit))
        );
        assert_eq!(
            upfront_amount(PaymentType::Deposit, Money::new(18000), Some(Money::ZERO)).unwrap(),
            None
        );
        assert!(
            upfront_amount(PaymentType::Deposit, Money::new(18000), Some(Money::new(-1))).is_err()
        );
        assert!(
            upfront_amount(PaymentType::Deposit, Money::new(100), Some(Money::new(101))).is_err()
        );
    }

    #[test]
    fn zero_selling_price_issues_no_payment() {
        for payment_type in [PaymentType::Full, PaymentType::Deposit, PaymentType::OnDelivery] {
            assert_eq!(
                upfront_amount(payment_type, Money::ZERO, None).unwrap_err(),
                EngineError::InvalidAmount("selling price must be > 0, got 0.00".to_string())
            );
        }
    }

    #[test]
    fn full_and_on_delivery() {
        assert_eq!(
            upfront_amount(PaymentType::Full, Money::new(4200), None).unwrap(),
            Some((Money::new(4200), PaymentMethod::FullPayment))
        );
        assert_eq!(
            upfront_amount(PaymentType::OnDelivery, Money::new(4200), Some(Money::new(10)))
                .unwrap(),
            None
        );
    }
}
