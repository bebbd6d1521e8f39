//! Client-side state for the finance tracker: the month/year filter, the
//! cached transactions and summary, the new-transaction draft and the
//! engine that keeps them in step with the remote service.

pub mod draft;
pub mod engine;
pub mod error;
pub mod filter;
pub mod models;
pub mod notice;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod fake;

pub use draft::FormDraft;
pub use engine::{DeleteOutcome, Operation, OperationStatus, RefreshOutcome, SyncEngine};
pub use error::{ErrorCode, ErrorDetails, ErrorSeverity, RemoteError, SyncError, SyncResult, ValidationError};
pub use filter::{FilterState, Period, PeriodError};
pub use models::{NewTransaction, Summary, Transaction, TransactionId};
pub use notice::{Notice, NoticeBoard};
pub use service::{Confirmation, ConfirmationRef, ConfirmationRequest, FinanceService, FixedAnswer, ServiceRef};
pub use store::{SummarySnapshot, TransactionStore, ViewSnapshot};
pub use types::TransactionType;
