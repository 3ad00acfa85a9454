#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Engine, Money, NewShipment, OrderDraft, PaymentType, Platform, PricingSettings};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_settings(PricingSettings::default()).await
}

pub async fn engine_with_settings(settings: PricingSettings) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .settings(settings)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// A client and an empty shipment to hang orders on.
pub async fn client_and_shipment(engine: &Engine) -> (i64, i64) {
    let client_id = engine
        .new_client("Amira", Some("+213 555 01 02"), None)
        .await
        .unwrap();
    let shipment_id = engine
        .new_shipment(NewShipment {
            batch_name: "Batch 1".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    (client_id, shipment_id)
}

pub fn draft(
    client_id: i64,
    shipment_id: i64,
    unit_price: Money,
    quantity: i32,
    payment_type: PaymentType,
) -> OrderDraft {
    OrderDraft {
        client_id,
        shipment_id: Some(shipment_id),
        product: "Sneakers".to_string(),
        size: Some("42".to_string()),
        quantity,
        original_price: unit_price,
        payment_type,
        platform: Platform::Shein,
        ..Default::default()
    }
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_string(
            backend,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}
