//! Synchronization engine
//!
//! `SyncEngine` owns the filter, the draft and the cached
//! transactions/summary pair, and is the only writer of the latter. Every
//! refresh draws a ticket from a monotonically increasing counter; a
//! response is applied only if its ticket is still the newest one issued
//! and the filter still matches the period it was fetched for. Anything
//! else is dropped on arrival.
//!
//! Engine state sits behind a `std::sync::RwLock` that is never held
//! across an `.await`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::draft::FormDraft;
use crate::error::{DefaultErrorLogger, ErrorContext, ErrorLogger, SyncError, SyncResult};
use crate::filter::{FilterState, Period};
use crate::models::{Summary, Transaction, TransactionId};
use crate::notice::{Notice, NoticeBoard};
use crate::service::{ConfirmationRef, ConfirmationRequest, ServiceRef};
use crate::store::ViewSnapshot;

/// Engine operations, each with its own status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Refresh,
    Create,
    Delete,
}

impl Operation {
    fn index(self) -> usize {
        match self {
            Operation::Refresh => 0,
            Operation::Create => 1,
            Operation::Delete => 2,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Refresh => write!(f, "refresh"),
            Operation::Create => write!(f, "create"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// `Idle → InFlight → Succeeded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// What happened to a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched pair replaced the cached one
    Applied,
    /// A newer refresh was issued meanwhile; the result was dropped
    Superseded,
    /// The selected period was already active and loaded; nothing was
    /// requested
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user said no; no request was made
    Declined,
}

#[derive(Debug, Clone, Copy, Default)]
struct Activity {
    in_flight: u32,
    last_success: Option<bool>,
}

impl Activity {
    fn status(&self) -> OperationStatus {
        if self.in_flight > 0 {
            return OperationStatus::InFlight;
        }
        match self.last_success {
            None => OperationStatus::Idle,
            Some(true) => OperationStatus::Succeeded,
            Some(false) => OperationStatus::Failed,
        }
    }
}

struct EngineState {
    filter: FilterState,
    draft: FormDraft,
    view: ViewSnapshot,
    notices: NoticeBoard,
    activity: [Activity; 3],
}

impl EngineState {
    fn activity_mut(&mut self, operation: Operation) -> &mut Activity {
        &mut self.activity[operation.index()]
    }
}

/// Marks an operation in flight until dropped, so a cancelled future
/// does not leave the status stuck.
struct InFlight<'a> {
    engine: &'a SyncEngine,
    operation: Operation,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.engine.write();
        let activity = state.activity_mut(self.operation);
        activity.in_flight = activity.in_flight.saturating_sub(1);
    }
}

/// Coordinates refresh, create and delete against a `FinanceService`
pub struct SyncEngine {
    service: ServiceRef,
    confirmation: ConfirmationRef,
    logger: Arc<dyn ErrorLogger>,
    state: RwLock<EngineState>,
    issued: AtomicU64,
}

impl SyncEngine {
    /// Create an engine filtered on the current month. Nothing is fetched
    /// until the first refresh.
    pub fn new(service: ServiceRef, confirmation: ConfirmationRef) -> Self {
        Self {
            service,
            confirmation,
            logger: Arc::new(DefaultErrorLogger),
            state: RwLock::new(EngineState {
                filter: FilterState::default(),
                draft: FormDraft::default(),
                view: ViewSnapshot::default(),
                notices: NoticeBoard::default(),
                activity: [Activity::default(); 3],
            }),
            issued: AtomicU64::new(0),
        }
    }

    /// Start on a given period instead of the current month
    pub fn with_period(mut self, period: Period) -> Self {
        self.state_mut().filter = FilterState::new(period);
        self
    }

    pub fn with_draft(mut self, draft: FormDraft) -> Self {
        self.state_mut().draft = draft;
        self
    }

    pub fn with_notice_capacity(mut self, capacity: usize) -> Self {
        self.state_mut().notices = NoticeBoard::with_capacity(capacity);
        self
    }

    // ==================== Readers ====================

    pub fn filter(&self) -> Period {
        self.read().filter.period()
    }

    /// Cached pair, cloned
    pub fn view(&self) -> ViewSnapshot {
        self.read().view.clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.read().view.transactions.as_slice().to_vec()
    }

    pub fn summary(&self) -> Summary {
        self.read().view.summary.summary().clone()
    }

    pub fn draft(&self) -> FormDraft {
        self.read().draft.clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.read().notices.to_vec()
    }

    pub fn operation_status(&self, operation: Operation) -> OperationStatus {
        self.read().activity[operation.index()].status()
    }

    /// Ticket of the most recently issued refresh (0 before the first)
    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    // ==================== Draft and notices ====================

    /// Edit the draft in place
    pub fn update_draft<R>(&self, edit: impl FnOnce(&mut FormDraft) -> R) -> R {
        edit(&mut self.write().draft)
    }

    pub fn dismiss_notice(&self, id: u64) -> bool {
        self.write().notices.dismiss(id)
    }

    pub fn clear_notices(&self) {
        self.write().notices.clear();
    }

    // ==================== Filter selection ====================

    /// Select a month of the current year; refreshes if it changed
    pub async fn select_month(&self, month: u32) -> SyncResult<RefreshOutcome> {
        let mut next = self.read().filter;
        if let Err(e) = next.set_month(month) {
            let context = ErrorContext::new("select_month").with_period(self.filter());
            return Err(self.fail(Operation::Refresh, SyncError::Validation(e.into()), &context));
        }
        self.select_period(next.period()).await
    }

    /// Select a year keeping the month; refreshes if it changed
    pub async fn select_year(&self, year: i32) -> SyncResult<RefreshOutcome> {
        let mut next = self.read().filter;
        next.set_year(year);
        self.select_period(next.period()).await
    }

    /// Refreshes unless `period` is both the filter and what the cached
    /// pair shows. After a failed refresh the two differ, so selecting the
    /// same period again retries.
    pub async fn select_period(&self, period: Period) -> SyncResult<RefreshOutcome> {
        let settled = {
            let state = self.read();
            state.filter.period() == period && state.view.shows(period)
        };
        if settled {
            return Ok(RefreshOutcome::Unchanged);
        }
        self.refresh(period).await
    }

    // ==================== Refresh ====================

    /// Re-fetch the pair for the active filter
    pub async fn refresh_current(&self) -> SyncResult<RefreshOutcome> {
        let period = self.filter();
        self.refresh(period).await
    }

    /// Make `period` the active filter and fetch its transactions and
    /// summary together.
    ///
    /// A stale result (a newer refresh was issued before this one
    /// finished) is dropped and reported as `Superseded`, also when the
    /// stale request failed.
    pub async fn refresh(&self, period: Period) -> SyncResult<RefreshOutcome> {
        let ticket = {
            let mut state = self.write();
            state.filter.set_period(period);
            self.issued.fetch_add(1, Ordering::SeqCst) + 1
        };
        let context = ErrorContext::new("refresh").with_period(period).with_ticket(ticket);
        let _flight = self.begin(Operation::Refresh);
        self.logger.log_debug("refresh issued", &context);

        let fetched = tokio::try_join!(
            self.service.list_transactions(period),
            self.service.summary(period),
        );

        match fetched {
            Ok((transactions, summary)) => {
                let view = ViewSnapshot::new(period, transactions, summary);
                self.check_view(period, &view, &context);
                let mut state = self.write();
                if !Self::is_current(&state, ticket, self.latest_ticket(), period) {
                    drop(state);
                    self.logger.log_debug("stale refresh dropped", &context);
                    return Ok(RefreshOutcome::Superseded);
                }
                state.view = view;
                state.activity_mut(Operation::Refresh).last_success = Some(true);
                drop(state);
                self.logger.log_debug("refresh applied", &context);
                Ok(RefreshOutcome::Applied)
            }
            Err(e) => {
                if !Self::is_current(&self.read(), ticket, self.latest_ticket(), period) {
                    self.logger.log_debug(&format!("stale refresh failed: {}", e), &context);
                    return Ok(RefreshOutcome::Superseded);
                }
                Err(self.fail(Operation::Refresh, e.into(), &context))
            }
        }
    }

    fn is_current(state: &EngineState, ticket: u64, latest: u64, period: Period) -> bool {
        ticket == latest && state.filter.period() == period
    }

    /// The pair is cached as received; contract violations are only logged
    fn check_view(&self, period: Period, view: &ViewSnapshot, context: &ErrorContext) {
        let stray = view.transactions.outside(&period).len();
        if stray > 0 {
            self.logger.log_warning(
                &format!("service returned {} transaction(s) outside {}", stray, period),
                context,
            );
        }

        let summary = view.summary.summary();
        if !summary.is_consistent() {
            self.logger.log_warning(
                &format!(
                    "summary balance {} != {} - {}",
                    summary.balance, summary.total_income, summary.total_expenses
                ),
                context,
            );
        } else if view.transactions.net() != summary.balance {
            // Possible when a write lands between the two reads
            self.logger.log_debug("list and summary disagree on the balance", context);
        }
    }

    // ==================== Create ====================

    /// Validate and submit the draft, then refresh.
    ///
    /// An invalid draft fails without any request. On success the draft's
    /// description and amount are cleared; a failure of the follow-up
    /// refresh is reported as a notice but does not fail the create.
    pub async fn create(&self) -> SyncResult<Transaction> {
        let context = ErrorContext::new("create").with_period(self.filter());
        let new = match self.draft().validate() {
            Ok(new) => new,
            Err(e) => return Err(self.fail(Operation::Create, e.into(), &context)),
        };

        let flight = self.begin(Operation::Create);
        let created = match self.service.create_transaction(&new).await {
            Ok(created) => created,
            Err(e) => return Err(self.fail(Operation::Create, e.into(), &context)),
        };

        {
            let mut state = self.write();
            state.draft.reset_after_submit();
            state.activity_mut(Operation::Create).last_success = Some(true);
        }
        drop(flight);
        self.logger.log_debug(&format!("created transaction {}", created.id), &context);

        if let Err(e) = self.refresh_current().await {
            self.logger.log_warning(&format!("refresh after create failed: {}", e), &context);
        }
        Ok(created)
    }

    // ==================== Delete ====================

    /// Ask for confirmation, delete, then refresh.
    ///
    /// The cached list is not touched locally; the entry disappears with
    /// the follow-up refresh.
    pub async fn delete(&self, id: &TransactionId) -> SyncResult<DeleteOutcome> {
        let context = ErrorContext::new("delete").with_period(self.filter());
        let cached = self.read().view.transactions.get(id).cloned();
        let request = ConfirmationRequest::delete(id, cached);

        if !self.confirmation.confirm(&request).await {
            self.logger.log_debug(&format!("delete of {} declined", id), &context);
            return Ok(DeleteOutcome::Declined);
        }

        let flight = self.begin(Operation::Delete);
        if let Err(e) = self.service.delete_transaction(id).await {
            return Err(self.fail(Operation::Delete, e.into(), &context));
        }

        self.write().activity_mut(Operation::Delete).last_success = Some(true);
        drop(flight);
        self.logger.log_debug(&format!("deleted transaction {}", id), &context);

        if let Err(e) = self.refresh_current().await {
            self.logger.log_warning(&format!("refresh after delete failed: {}", e), &context);
        }
        Ok(DeleteOutcome::Deleted)
    }

    // ==================== Internals ====================

    fn begin(&self, operation: Operation) -> InFlight<'_> {
        self.write().activity_mut(operation).in_flight += 1;
        InFlight { engine: self, operation }
    }

    /// Record a failure: status, notice, log. Returns the error for `?`.
    fn fail(&self, operation: Operation, error: SyncError, context: &ErrorContext) -> SyncError {
        {
            let mut state = self.write();
            state.activity_mut(operation).last_success = Some(false);
            state.notices.push(operation, &error);
        }
        self.logger.log_error(&error, context);
        error
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut EngineState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

// ==================== Tests ====================
