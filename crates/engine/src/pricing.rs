//! Pricing rules.
//!
//! Pure functions turning a source currency unit price into a local selling
//! price and deposit, and classifying how much of an order has been paid.
//! Nothing here touches the store.

use rust_decimal::Decimal;

use crate::{EngineError, Money, PaymentStatus, PricingSettings, ResultEngine};

/// Share of the selling price collected up front for a deposit order.
pub const DEPOSIT_RATIO: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Parses a non-negative amount typed by a user.
///
/// Surrounding whitespace is ignored and a decimal comma is accepted. Zero is
/// allowed: rejecting it is up to the caller.
///
/// ```rust
/// use engine::{Money, pricing::parse_price};
///
/// assert_eq!(parse_price("18,50").unwrap(), Money::new(1850));
/// assert!(parse_price("").is_err());
/// assert!(parse_price("-3").is_err());
/// ```
pub fn parse_price(text: &str) -> ResultEngine<Money> {
    let amount: Money = text.parse()?;
    if amount.is_negative() {
        return Err(EngineError::InvalidNumber(format!(
            "'{}' is negative",
            text.trim()
        )));
    }
    Ok(amount)
}

/// Same as [`parse_price`], falling back to `default` on any parse failure.
pub fn parse_price_or_default(text: &str, default: Money) -> Money {
    parse_price(text).unwrap_or(default)
}

/// Parses a quantity typed by a user. It must be a whole number above zero.
pub fn parse_quantity(text: &str) -> ResultEngine<i32> {
    let trimmed = text.trim();
    let quantity: i32 = trimmed
        .parse()
        .map_err(|_| EngineError::InvalidNumber(format!("'{trimmed}' is not a whole number")))?;
    if quantity <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity must be > 0, got {quantity}"
        )));
    }
    Ok(quantity)
}

/// Local selling price of one unit: `unit_price × selling_multiplier`.
pub fn selling_price(unit_price: Money, settings: &PricingSettings) -> ResultEngine<Money> {
    unit_price.scale(settings.selling_multiplier)
}

/// Local selling price of `quantity` units.
pub fn total_selling_price(
    unit_price: Money,
    quantity: i32,
    settings: &PricingSettings,
) -> ResultEngine<Money> {
    if quantity <= 0 {
        return Err(EngineError::InvalidQuantity(format!(
            "quantity must be > 0, got {quantity}"
        )));
    }
    selling_price(unit_price, settings)?.times(i64::from(quantity))
}

/// Half of the selling price. The ratio is fixed.
pub fn deposit(total_selling_price: Money) -> ResultEngine<Money> {
    total_selling_price.scale(DEPOSIT_RATIO)
}

/// What is still owed on an order. Overpayments clamp to zero.
#[must_use]
pub fn remaining(selling_price: Money, total_paid: Money) -> Money {
    selling_price.saturating_sub(total_paid).max(Money::ZERO)
}

/// Classifies `total_paid` against `selling_price`. Paying exactly the
/// selling price counts as [`PaymentStatus::Paid`].
#[must_use]
pub fn payment_status(selling_price: Money, total_paid: Money) -> PaymentStatus {
    if !total_paid.is_positive() {
        PaymentStatus::Unpaid
    } else if total_paid < selling_price {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    }
}

/// Display form with exactly two decimals.
#[must_use]
pub fn format_price(amount: Money) -> String {
    amount.to_string()
}
