//! Dismissible, non-fatal notices shown to the user after a failure

use std::collections::VecDeque;

use crate::error::{ErrorCode, ErrorSeverity, SyncError};
use crate::engine::Operation;

/// One failure report
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub operation: Operation,
    pub code: ErrorCode,
    pub severity: ErrorSeverity,
    pub message: String,
}

/// Bounded queue of notices; the oldest is dropped when full
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    notices: VecDeque<Notice>,
    capacity: usize,
    next_id: u64,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::with_capacity(20)
    }
}

impl NoticeBoard {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            notices: VecDeque::new(),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    pub fn push(&mut self, operation: Operation, error: &SyncError) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            id,
            operation,
            code: error.code(),
            severity: error.severity(),
            message: error.to_string(),
        });
        id
    }

    /// Returns false if the notice was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn clear(&mut self) {
        self.notices.clear();
    }

    pub fn to_vec(&self) -> Vec<Notice> {
        self.notices.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
