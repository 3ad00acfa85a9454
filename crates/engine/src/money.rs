use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::{EngineError, ResultEngine};

/// Number of fraction digits kept for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Signed money amount represented as **integer minor units** (cents).
///
/// Every monetary value in the engine (unit prices, selling prices, payments,
/// shipment costs, summary figures) is a `Money`. Multiplication by a rate is
/// done in [`Decimal`] and rounded back to cents, midpoint away from zero.
///
/// There are no arithmetic operators: sums and differences go through
/// [`Money::try_add`], [`Money::try_sub`] and [`Money::try_sum`], which fail
/// with [`EngineError::InvalidAmount`] instead of overflowing.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(18_50);
/// assert_eq!(amount.cents(), 1850);
/// assert_eq!(amount.to_string(), "18.50");
/// ```
///
/// Parsing accepts `.` or `,` as decimal separator:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("ten".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Addition that reports overflow as an error.
    pub fn try_add(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_add(rhs).ok_or_else(too_large)
    }

    /// Subtraction that reports overflow as an error.
    pub fn try_sub(self, rhs: Money) -> ResultEngine<Money> {
        self.checked_sub(rhs).ok_or_else(too_large)
    }

    /// Sums `amounts`, failing on the first overflow. Zero when empty.
    pub fn try_sum<I>(amounts: I) -> ResultEngine<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.try_add(amount))
    }

    /// Subtraction clamped to the `i64` range.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Exact decimal value of the amount (`1850` cents is `18.50`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Rounds `value` to cents.
    pub fn from_decimal(value: Decimal) -> ResultEngine<Self> {
        let mut rounded =
            value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        i64::try_from(rounded.mantissa())
            .map(Money)
            .map_err(|_| too_large())
    }

    /// Multiplies the amount by a rate, rounding the result to cents.
    pub fn scale(self, rate: Decimal) -> ResultEngine<Self> {
        let product = self
            .to_decimal()
            .checked_mul(rate)
            .ok_or_else(too_large)?;
        Money::from_decimal(product)
    }

    /// Multiplies the amount by a whole quantity.
    pub fn times(self, quantity: i64) -> ResultEngine<Self> {
        self.0
            .checked_mul(quantity)
            .map(Money)
            .ok_or_else(too_large)
    }
}

fn too_large() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional sign. More
    /// than two fraction digits are rounded to cents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidNumber("empty amount".to_string()));
        }

        let normalized = trimmed.replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| EngineError::InvalidNumber(format!("'{trimmed}' is not a number")))?;
        Money::from_decimal(value)
            .map_err(|_| EngineError::InvalidNumber(format!("'{trimmed}' is too large")))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn display_uses_two_decimals() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.10");
        assert_eq!(Money::new(18000).to_string(), "180.00");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("18,50".parse::<Money>().unwrap(), Money::new(1850));
        assert_eq!("18.50".parse::<Money>().unwrap(), Money::new(1850));
        assert_eq!("  2.3 ".parse::<Money>().unwrap(), Money::new(230));
        assert_eq!("-0.01".parse::<Money>().unwrap(), Money::new(-1));
    }

    #[test]
    fn parse_rounds_extra_decimals() {
        assert_eq!("0.005".parse::<Money>().unwrap(), Money::new(1));
        assert_eq!("12.344".parse::<Money>().unwrap(), Money::new(1234));
    }

    #[test]
    fn scale_rounds_half_away_from_zero() {
        assert_eq!(Money::new(1000).scale(dec!(3.5)).unwrap(), Money::new(3500));
        assert_eq!(Money::new(5).scale(dec!(0.5)).unwrap(), Money::new(3));
        assert_eq!(Money::new(-5).scale(dec!(0.5)).unwrap(), Money::new(-3));
    }

    #[test]
    fn times_detects_overflow() {
        assert_eq!(Money::new(250).times(4).unwrap(), Money::new(1000));
        assert!(Money::new(i64::MAX).times(2).is_err());
    }

    #[test]
    fn sum_of_empty_is_zero() {
        assert_eq!(Money::try_sum(Vec::new()).unwrap(), Money::ZERO);
    }

    #[test]
    fn sums_and_differences_fail_instead_of_wrapping() {
        let half = Money::new(i64::MAX / 2 + 1);
        assert_eq!(
            Money::try_sum([half, half]).unwrap_err(),
            EngineError::InvalidAmount("amount too large".to_string())
        );
        assert!(Money::new(i64::MIN).try_sub(Money::new(1)).is_err());
        assert_eq!(
            Money::try_sum([Money::new(150), Money::new(250)]).unwrap(),
            Money::new(400)
        );
        assert_eq!(
            Money::new(i64::MIN).saturating_sub(Money::new(1)),
            Money::new(i64::MIN)
        );
    }
}
