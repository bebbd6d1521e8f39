//! Cached transaction list and summary for the active filter

use rust_decimal::Decimal;

use crate::filter::Period;
use crate::models::{Summary, Transaction, TransactionId};

/// Transactions in the order the service returned them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.get(id).is_some()
    }

    /// Entries whose date lies outside `period`
    pub fn outside(&self, period: &Period) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| !period.contains(&t.date))
            .collect()
    }

    /// Sum of signed amounts, for cross-checking against the summary
    pub fn net(&self) -> Decimal {
        self.transactions.iter().map(Transaction::signed_amount).sum()
    }
}

impl<'a> IntoIterator for &'a TransactionStore {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Summary cached for the active filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummarySnapshot {
    summary: Summary,
}

impl SummarySnapshot {
    pub fn new(summary: Summary) -> Self {
        Self { summary }
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn total_income(&self) -> Decimal {
        self.summary.total_income
    }

    pub fn total_expenses(&self) -> Decimal {
        self.summary.total_expenses
    }

    pub fn balance(&self) -> Decimal {
        self.summary.balance
    }
}

/// The store and summary as one unit, tagged with the period they were
/// fetched for. `period` is `None` until the first successful refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub period: Option<Period>,
    pub transactions: TransactionStore,
    pub summary: SummarySnapshot,
}

impl ViewSnapshot {
    pub fn new(period: Period, transactions: Vec<Transaction>, summary: Summary) -> Self {
        Self {
            period: Some(period),
            transactions: TransactionStore::new(transactions),
            summary: SummarySnapshot::new(summary),
        }
    }

    /// Whether the cached pair was fetched for `period`
    pub fn shows(&self, period: Period) -> bool {
        self.period == Some(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use chrono::NaiveDate;

    fn tx(id: i64, amount: i64, kind: TransactionType, day: u32) -> Transaction {
        Transaction {
            id: TransactionId::from(id),
            description: format!("tx {}", id),
            amount: Decimal::from(amount),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            category: None,
        }
    }

    #[test]
    fn test_store_keeps_service_order() {
        let store = TransactionStore::new(vec![
            tx(3, 10, TransactionType::Expense, 20),
            tx(1, 50, TransactionType::Income, 2),
            tx(2, 5, TransactionType::Expense, 31),
        ]);
        let ids: Vec<&str> = store.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_store_lookup_and_net() {
        let store = TransactionStore::new(vec![
            tx(1, 100, TransactionType::Income, 1),
            tx(2, 30, TransactionType::Expense, 2),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.contains(&TransactionId::from(2)));
        assert!(!store.contains(&TransactionId::from(9)));
        assert_eq!(store.net(), Decimal::from(70));
    }

    #[test]
    fn test_store_outside_period() {
        let mut feb = tx(5, 1, TransactionType::Expense, 1);
        feb.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let store = TransactionStore::new(vec![tx(1, 1, TransactionType::Expense, 15), feb]);

        let jan = Period::new(1, 2024).unwrap();
        let stray: Vec<&str> = store.outside(&jan).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(stray, vec!["5"]);
    }

    #[test]
    fn test_empty_view_shows_no_period() {
        let view = ViewSnapshot::default();
        assert!(!view.shows(Period::new(1, 2024).unwrap()));
        assert!(view.transactions.is_empty());
        assert_eq!(view.summary.balance(), Decimal::ZERO);

        let jan = Period::new(1, 2024).unwrap();
        let loaded = ViewSnapshot::new(jan, Vec::new(), Summary::zero());
        assert!(loaded.shows(jan));
        assert!(!loaded.shows(Period::new(2, 2024).unwrap()));
    }
}
