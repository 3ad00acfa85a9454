use rust_decimal_macros::dec;

use engine::{EngineError, Money, PaymentMethod, PaymentStatus, PaymentType, PricingSettings};

mod common;

use common::{client_and_shipment, count_rows, draft, engine_with_db, engine_with_settings};

#[tokio::test]
async fn deposit_order_records_half_and_is_partial() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    let placement = engine
        .place_order(
            &draft(client_id, shipment_id, Money::new(1800), 2, PaymentType::Deposit),
            None,
        )
        .await
        .unwrap();

    assert_eq!(placement.selling_price, Money::new(18000));
    assert_eq!(placement.payment_status, PaymentStatus::Partial);
    assert!(placement.payment_id.is_some());

    let payments = engine
        .payments_for_order(placement.order_id)
        .await
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, Money::new(9000));
    assert_eq!(payments[0].method, PaymentMethod::Deposit);

    let order = engine.order(placement.order_id).await.unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Partial);
    assert_eq!(
        engine.remaining_amount(placement.order_id).await.unwrap(),
        Money::new(9000)
    );
}

#[tokio::test]
async fn full_payment_order_is_paid() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    let placement = engine
        .place_order(
            &draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::Full),
            None,
        )
        .await
        .unwrap();

    assert_eq!(placement.payment_status, PaymentStatus::Paid);
    let payments = engine
        .payments_for_order(placement.order_id)
        .await
        .unwrap();
    assert_eq!(payments[0].method, PaymentMethod::FullPayment);
    assert_eq!(payments[0].amount, Money::new(5000));
    assert_eq!(
        engine.remaining_amount(placement.order_id).await.unwrap(),
        Money::ZERO
    );
}

#[tokio::test]
async fn on_delivery_order_has_no_payment() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    let placement = engine
        .place_order(
            &draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::OnDelivery),
            None,
        )
        .await
        .unwrap();

    assert_eq!(placement.payment_id, None);
    assert_eq!(placement.payment_status, PaymentStatus::Unpaid);
    assert!(
        engine
            .payments_for_order(placement.order_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn deposit_override_replaces_the_default_half() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;
    let order = draft(client_id, shipment_id, Money::new(2000), 1, PaymentType::Deposit);

    let custom = engine
        .place_order(&order, Some(Money::new(3000)))
        .await
        .unwrap();
    assert_eq!(
        engine.remaining_amount(custom.order_id).await.unwrap(),
        Money::new(7000)
    );

    let none_taken = engine.place_order(&order, Some(Money::ZERO)).await.unwrap();
    assert_eq!(none_taken.payment_id, None);
    assert_eq!(none_taken.payment_status, PaymentStatus::Unpaid);

    let err = engine
        .place_order(&order, Some(Money::new(10001)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn explicit_selling_price_is_kept() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;
    let mut order = draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::OnDelivery);
    order.selling_price = Some(Money::new(4500));

    let order_id = engine.create_order(&order).await.unwrap();
    let stored = engine.order(order_id).await.unwrap();
    assert_eq!(stored.selling_price, Money::new(4500));
    assert_eq!(stored.payment_status, PaymentStatus::Unpaid);
}

#[tokio::test]
async fn order_without_shipment_is_rejected_and_nothing_is_written() {
    let (engine, db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;
    let mut order = draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::Deposit);
    order.shipment_id = None;

    let err = engine.place_order(&order, None).await.unwrap_err();
    assert_eq!(err, EngineError::MissingShipment);

    order.shipment_id = Some(0);
    let err = engine.create_order(&order).await.unwrap_err();
    assert_eq!(err, EngineError::MissingShipment);

    assert_eq!(
        count_rows(&db, "orders").await,
        0,
        "no order row may be written"
    );
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_any_write() {
    let (engine, db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    let mut bad_quantity = draft(client_id, shipment_id, Money::new(1000), 0, PaymentType::Full);
    let err = engine.place_order(&bad_quantity, None).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidQuantity(_)));
    bad_quantity.quantity = -3;
    assert!(matches!(
        engine.create_order(&bad_quantity).await.unwrap_err(),
        EngineError::InvalidQuantity(_)
    ));

    let free = draft(client_id, shipment_id, Money::ZERO, 1, PaymentType::Full);
    assert!(matches!(
        engine.place_order(&free, None).await.unwrap_err(),
        EngineError::InvalidAmount(_)
    ));

    let mut blank = draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::Full);
    blank.product = "   ".to_string();
    assert!(matches!(
        engine.place_order(&blank, None).await.unwrap_err(),
        EngineError::InvalidField(_)
    ));

    assert_eq!(count_rows(&db, "orders").await, 0);
    assert_eq!(count_rows(&db, "payments").await, 0);
}

#[tokio::test]
async fn price_rounding_to_zero_is_rejected_before_any_write() {
    let settings = PricingSettings::new(dec!(3.5), dec!(0.4)).unwrap();
    let (engine, db) = engine_with_settings(settings).await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    for payment_type in [PaymentType::Full, PaymentType::Deposit, PaymentType::OnDelivery] {
        let err = engine
            .place_order(&draft(client_id, shipment_id, Money::new(1), 1, payment_type), None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("selling price of 0.01 x 1 rounds to 0.00".to_string())
        );
    }
    assert!(matches!(
        engine
            .create_order(&draft(client_id, shipment_id, Money::new(1), 2, PaymentType::Full))
            .await
            .unwrap_err(),
        EngineError::InvalidAmount(_)
    ));

    assert_eq!(count_rows(&db, "orders").await, 0);
    assert_eq!(count_rows(&db, "payments").await, 0);

    let placement = engine
        .place_order(
            &draft(client_id, shipment_id, Money::new(3), 1, PaymentType::Full),
            None,
        )
        .await
        .unwrap();
    assert_eq!(placement.selling_price, Money::new(1));
    assert_eq!(placement.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn unknown_client_or_shipment_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;

    let err = engine
        .create_order(&draft(client_id + 10, shipment_id, Money::new(1000), 1, PaymentType::Full))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("client not exists".to_string()));

    let err = engine
        .create_order(&draft(client_id, shipment_id + 10, Money::new(1000), 1, PaymentType::Full))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("shipment not exists".to_string()));

    let err = engine.order(999).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("order not exists".to_string()));
}

#[tokio::test]
async fn update_order_reprices_but_keeps_the_payment_status() {
    let (engine, _db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;
    let mut order = draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::Full);
    let placement = engine.place_order(&order, None).await.unwrap();
    assert_eq!(placement.payment_status, PaymentStatus::Paid);

    order.quantity = 3;
    order.payment_type = PaymentType::OnDelivery;
    engine.update_order(placement.order_id, &order).await.unwrap();

    let stored = engine.order(placement.order_id).await.unwrap();
    assert_eq!(stored.quantity, 3);
    assert_eq!(stored.selling_price, Money::new(15000));
    assert_eq!(stored.payment_type, PaymentType::OnDelivery);
    assert_eq!(stored.payment_status, PaymentStatus::Paid);
    assert_eq!(
        engine.payments_for_order(placement.order_id).await.unwrap().len(),
        1
    );

    assert_eq!(
        engine
            .recalculate_payment_status(placement.order_id)
            .await
            .unwrap(),
        PaymentStatus::Partial
    );
}

#[tokio::test]
async fn delete_order_removes_its_payments() {
    let (engine, db) = engine_with_db().await;
    let (client_id, shipment_id) = client_and_shipment(&engine).await;
    let placement = engine
        .place_order(
            &draft(client_id, shipment_id, Money::new(1000), 1, PaymentType::Deposit),
            None,
        )
        .await
        .unwrap();

    engine.delete_order(placement.order_id).await.unwrap();

    assert_eq!(count_rows(&db, "orders").await, 0);
    assert_eq!(count_rows(&db, "payments").await, 0);
    assert!(engine.orders_for_client(client_id).await.unwrap().is_empty());
}
