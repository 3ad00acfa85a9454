//! Bookkeeping engine for a reseller: clients, orders bought on their behalf,
//! shipments batching those orders, and the payments collected toward them.
//!
//! The interesting parts are:
//!
//! - [`pricing`]: selling price, deposit, remaining balance and payment status
//!   rules.
//! - the payment ledger on [`Engine`]: every payment mutation re-derives the
//!   owning order's [`PaymentStatus`] in the same database transaction.
//! - order intake on [`Engine`]: validation, pricing and the payment implied
//!   by the chosen [`PaymentType`].
//! - [`summary`]: the per-shipment cost/revenue/profit rollup.

pub use clients::Client;
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder, OrderPlacement};
pub use orders::{Order, OrderDraft, PaymentStatus, PaymentType, Platform};
pub use payments::{Payment, PaymentInput, PaymentMethod};
pub use settings::PricingSettings;
pub use shipments::{NewShipment, Shipment, ShipmentStatus};
pub use summary::FinancialSummary;

mod clients;
mod error;
mod money;
mod ops;
mod orders;
mod payments;
pub mod pricing;
mod settings;
mod shipments;
pub mod summary;

pub type ResultEngine<T> = Result<T, EngineError>;
