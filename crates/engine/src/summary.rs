//! Shipment financial rollup.
//!
//! A [`FinancialSummary`] is a read-only view over the orders currently in a
//! shipment. It is rebuilt on every request with the pricing settings in
//! force at that moment, so figures drift if the settings change after the
//! orders were priced. Nothing here is persisted.

use serde::Serialize;

use crate::{Money, Order, PricingSettings, ResultEngine, Shipment, pricing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FinancialSummary {
    pub total_orders: u64,
    pub total_cost_of_goods: Money,
    pub transportation_cost: Money,
    pub other_costs: Money,
    pub total_revenue: Money,
    pub total_expenses: Money,
    /// Can be negative.
    pub net_profit: Money,
}

/// `Σ original_price × conversion_rate × quantity`, rounded per order.
pub fn total_cost_of_goods(orders: &[Order], settings: &PricingSettings) -> ResultEngine<Money> {
    orders.iter().try_fold(Money::ZERO, |acc, order| {
        let line = order
            .original_price
            .scale(settings.conversion_rate)?
            .times(i64::from(order.quantity))?;
        acc.try_add(line)
    })
}

/// `Σ total_selling_price(original_price, quantity)` with the current
/// multiplier. This ignores the selling price stored on each order.
pub fn total_revenue(orders: &[Order], settings: &PricingSettings) -> ResultEngine<Money> {
    orders.iter().try_fold(Money::ZERO, |acc, order| {
        let line = pricing::total_selling_price(order.original_price, order.quantity, settings)?;
        acc.try_add(line)
    })
}

/// Cost of goods plus the overhead shared by the whole shipment.
pub fn total_expenses(shipment: &Shipment, total_cost_of_goods: Money) -> ResultEngine<Money> {
    Money::try_sum([
        total_cost_of_goods,
        shipment.transportation_cost,
        shipment.other_costs,
    ])
}

pub fn net_profit(total_revenue: Money, total_expenses: Money) -> ResultEngine<Money> {
    total_revenue.try_sub(total_expenses)
}

impl FinancialSummary {
    /// Builds the summary of `shipment` from `orders`.
    ///
    /// A single order failing to compute (e.g. a non-positive quantity) fails
    /// the whole summary.
    pub fn compute(
        shipment: &Shipment,
        orders: &[Order],
        settings: &PricingSettings,
    ) -> ResultEngine<Self> {
        let total_cost_of_goods = total_cost_of_goods(orders, settings)?;
        let total_revenue = total_revenue(orders, settings)?;
        let total_expenses = total_expenses(shipment, total_cost_of_goods)?;

        Ok(Self {
            total_orders: orders.len() as u64,
            total_cost_of_goods,
            transportation_cost: shipment.transportation_cost,
            other_costs: shipment.other_costs,
            total_revenue,
            total_expenses,
            net_profit: net_profit(total_revenue, total_expenses)?,
        })
    }
}
