//! Core data models exchanged with the finance service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::types::TransactionType;

/// Opaque transaction identifier assigned by the service.
///
/// The service hands out integers today; any JSON integer or string is
/// accepted and kept as text so the client never does arithmetic on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<i64> for TransactionId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(id) => TransactionId::from(id),
            RawId::Text(id) => TransactionId(id),
        })
    }
}

/// A recorded income or expense, as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Calendar date (YYYY-MM-DD on the wire)
    pub date: NaiveDate,
    #[serde(default)]
    pub category: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Amount with the sign of its direction (expenses negative)
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// A validated draft ready to be submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTransaction {
    pub description: String,
    /// Sent as a JSON number
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub category: Option<String>,
}

/// Aggregate figures for one (month, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

impl Default for Summary {
    fn default() -> Self {
        Self::zero()
    }
}

impl Summary {
    pub fn zero() -> Self {
        Self {
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Whether `balance = total_income - total_expenses` holds
    pub fn is_consistent(&self) -> bool {
        self.balance == self.total_income - self.total_expenses
    }
}
