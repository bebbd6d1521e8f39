//! In-progress new-transaction form

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::NewTransaction;
use crate::types::TransactionType;

/// Fields of the "add transaction" form, edited one at a time.
///
/// `amount` is kept as typed so a half-entered value like `"12."` survives
/// until submission; it is parsed only by [`FormDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub description: String,
    pub amount: String,
    pub kind: TransactionType,
    pub date: Option<NaiveDate>,
    pub category: String,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            kind: TransactionType::Expense,
            date: Some(Local::now().date_naive()),
            category: String::new(),
        }
    }
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    pub fn set_kind(&mut self, kind: TransactionType) {
        self.kind = kind;
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Check the draft and build the request body.
    ///
    /// The draft itself is never modified here.
    pub fn validate(&self) -> Result<NewTransaction, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = parse_amount(&self.amount)?;
        let date = self.date.ok_or(ValidationError::MissingDate)?;

        let category = self.category.trim();
        Ok(NewTransaction {
            description: description.to_string(),
            amount,
            kind: self.kind,
            date,
            category: (!category.is_empty()).then(|| category.to_string()),
        })
    }

    /// Clear the per-entry fields after a successful submission.
    /// Type, date and category carry over to the next entry.
    pub fn reset_after_submit(&mut self) {
        self.description.clear();
        self.amount.clear();
    }
}

/// Parse a user-entered amount. Accepts plain and scientific notation.
fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = input.trim();
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidAmount {
            input: input.to_string(),
        })?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount {
            amount: trimmed.to_string(),
        });
    }

    Ok(amount)
}
