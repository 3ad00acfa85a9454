//! Payments collected toward an order.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Serialize, Serializer};

use crate::{EngineError, Money, ResultEngine};

/// How a payment was collected.
///
/// The known methods keep their historical spelling (`cash`, `card`, `post`,
/// `Deposit`, `Full Payment`); anything else is kept verbatim in
/// [`PaymentMethod::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Cash,
    Card,
    Post,
    Deposit,
    FullPayment,
    Other(String),
}

impl PaymentMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Post => "post",
            Self::Deposit => "Deposit",
            Self::FullPayment => "Full Payment",
            Self::Other(text) => text.as_str(),
        }
    }

    /// Parses a method typed by a user. Empty input is rejected.
    pub fn parse(value: &str) -> ResultEngine<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidField(
                "payment method must not be empty".to_string(),
            ));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "cash" => Self::Cash,
            "card" => Self::Card,
            "post" => Self::Post,
            "deposit" => Self::Deposit,
            "full payment" | "full_payment" | "full" => Self::FullPayment,
            _ => Self::Other(trimmed.to_string()),
        })
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Input for recording or editing a payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentInput {
    pub order_id: i64,
    pub amount: Money,
    pub method: PaymentMethod,
    pub comment: Option<String>,
}

impl PaymentInput {
    pub fn new(order_id: i64, amount: Money, method: PaymentMethod) -> Self {
        Self {
            order_id,
            amount,
            method,
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub amount: Money,
    pub method: PaymentMethod,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub order_id: i64,
    pub amount_minor: i64,
    pub method: String,
    pub comment: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Orders,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        let method = PaymentMethod::parse(&model.method)
            .unwrap_or_else(|_| PaymentMethod::Other(model.method.clone()));
        Self {
            id: model.id,
            order_id: model.order_id,
            amount: Money::new(model.amount_minor),
            method,
            comment: model.comment,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_keep_their_spelling() {
        assert_eq!(PaymentMethod::parse("CASH").unwrap(), PaymentMethod::Cash);
        assert_eq!(
            PaymentMethod::parse("full payment").unwrap().as_str(),
            "Full Payment"
        );
        assert_eq!(PaymentMethod::Deposit.as_str(), "Deposit");
    }

    #[test]
    fn unknown_methods_are_kept_verbatim() {
        assert_eq!(
            PaymentMethod::parse(" Bank transfer ").unwrap(),
            PaymentMethod::Other("Bank transfer".to_string())
        );
    }

    #[test]
    fn empty_method_is_rejected() {
        assert_eq!(
            PaymentMethod::parse("  ").unwrap_err(),
            EngineError::InvalidField("payment method must not be empty".to_string())
        );
    }
}
