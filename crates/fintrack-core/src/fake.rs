//! In-memory `FinanceService` for tests: records calls, computes summaries
//! from its own data, injects failures and can hold requests for a period
//! until released.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use crate::error::RemoteError;
use crate::filter::Period;
use crate::models::{NewTransaction, Summary, Transaction, TransactionId};
use crate::service::FinanceService;
use crate::types::TransactionType;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Period),
    Summary(Period),
    Create(NewTransaction),
    Delete(TransactionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    List,
    Summary,
    Create,
    Delete,
}

struct Gate {
    remaining: usize,
    semaphore: Arc<Semaphore>,
}

#[derive(Default)]
pub struct FakeService {
    data: Mutex<Vec<Transaction>>,
    next_id: Mutex<i64>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<CallKind, RemoteError>>,
    gates: Mutex<HashMap<Period, Gate>>,
}

impl FakeService {
    pub fn seed(&self, description: &str, amount: &str, kind: TransactionType, date: NaiveDate) {
        let id = self.allocate_id();
        self.data.lock().unwrap().push(Transaction {
            id,
            description: description.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            kind,
            date,
            category: None,
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every later call of `kind` fails with `error`
    pub fn fail(&self, kind: CallKind, error: RemoteError) {
        self.failures.lock().unwrap().insert(kind, error);
    }

    pub fn recover(&self, kind: CallKind) {
        self.failures.lock().unwrap().remove(&kind);
    }

    /// The next `calls` list/summary requests for `period` wait for `release`
    pub fn hold_next(&self, period: Period, calls: usize) {
        self.gates.lock().unwrap().insert(period, Gate {
            remaining: calls,
            semaphore: Arc::new(Semaphore::new(0)),
        });
    }

    pub fn release(&self, period: Period) {
        if let Some(gate) = self.gates.lock().unwrap().get(&period) {
            gate.semaphore.add_permits(1024);
        }
    }

    pub fn summary_for(&self, period: Period) -> Summary {
        let data = self.data.lock().unwrap();
        let mut summary = Summary::zero();
        for tx in data.iter().filter(|t| period.contains(&t.date)) {
            match tx.kind {
                TransactionType::Income => summary.total_income += tx.amount,
                TransactionType::Expense => summary.total_expenses += tx.amount,
            }
        }
        summary.balance = summary.total_income - summary.total_expenses;
        summary
    }

    fn allocate_id(&self) -> TransactionId {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        TransactionId::from(*next)
    }

    async fn enter(&self, call: Call, kind: CallKind, period: Option<Period>) -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(call);

        let semaphore = period.and_then(|p| {
            let mut gates = self.gates.lock().unwrap();
            let gate = gates.get_mut(&p)?;
            if gate.remaining == 0 {
                return None;
            }
            gate.remaining -= 1;
            Some(gate.semaphore.clone())
        });
        if let Some(semaphore) = semaphore {
            semaphore.acquire().await.unwrap().forget();
        }

        match self.failures.lock().unwrap().get(&kind) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FinanceService for FakeService {
    async fn list_transactions(&self, period: Period) -> Result<Vec<Transaction>, RemoteError> {
        self.enter(Call::List(period), CallKind::List, Some(period)).await?;
        let data = self.data.lock().unwrap();
        Ok(data.iter().filter(|t| period.contains(&t.date)).cloned().collect())
    }

    async fn summary(&self, period: Period) -> Result<Summary, RemoteError> {
        self.enter(Call::Summary(period), CallKind::Summary, Some(period)).await?;
        Ok(self.summary_for(period))
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction, RemoteError> {
        self.enter(Call::Create(transaction.clone()), CallKind::Create, None).await?;
        let created = Transaction {
            id: self.allocate_id(),
            description: transaction.description.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
            date: transaction.date,
            category: transaction.category.clone(),
        };
        self.data.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_transaction(&self, id: &TransactionId) -> Result<(), RemoteError> {
        self.enter(Call::Delete(id.clone()), CallKind::Delete, None).await?;
        let mut data = self.data.lock().unwrap();
        let before = data.len();
        data.retain(|t| &t.id != id);
        if data.len() == before {
            return Err(RemoteError::Service {
                status: Some(404),
                message: "Transaction not found".to_string(),
            });
        }
        Ok(())
    }
}
