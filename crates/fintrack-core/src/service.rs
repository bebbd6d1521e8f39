//! Capabilities the engine is built on: the remote persistence service and
//! the user's confirmation before a destructive action.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::RemoteError;
use crate::filter::Period;
use crate::models::{NewTransaction, Summary, Transaction, TransactionId};

/// Service reference type
pub type ServiceRef = Arc<dyn FinanceService>;

/// Confirmation reference type
pub type ConfirmationRef = Arc<dyn Confirmation>;

/// Remote store of transactions. Storage, validation and id assignment
/// happen on the other side.
#[async_trait]
pub trait FinanceService: Send + Sync {
    /// Transactions dated within `period`, in the service's order
    async fn list_transactions(&self, period: Period) -> Result<Vec<Transaction>, RemoteError>;

    /// Income, expenses and balance for `period`
    async fn summary(&self, period: Period) -> Result<Summary, RemoteError>;

    /// Store a new transaction and return it with its assigned id
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction, RemoteError>;

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), RemoteError>;
}

/// What the user is asked to confirm
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRequest {
    pub message: String,
    pub transaction_id: TransactionId,
    /// The cached entry, when it is still in view
    pub transaction: Option<Transaction>,
}

impl ConfirmationRequest {
    pub fn delete(id: &TransactionId, transaction: Option<Transaction>) -> Self {
        let message = match &transaction {
            Some(tx) => format!(
                "Delete transaction '{}' of {} on {}?",
                tx.description, tx.amount, tx.date
            ),
            None => format!("Delete transaction {}?", id),
        };
        Self {
            message,
            transaction_id: id.clone(),
            transaction,
        }
    }
}

/// Asks the user a yes/no question
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}

/// Answers every request with the same value.
/// Used for non-interactive runs (`--yes`) and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirmation for FixedAnswer {
    async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
        self.0
    }
}
