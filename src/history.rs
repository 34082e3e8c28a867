//! Caller-owned log of past queries

use std::collections::VecDeque;

use crate::models::Query;

/// Entries kept before the oldest is dropped
pub const HISTORY_CAPACITY: usize = 20;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<Query>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        HistoryLog::with_capacity(HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        HistoryLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a query, dropping the oldest entry when full
    pub fn append(&mut self, query: Query) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(query);
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Query> {
        self.entries.remove(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Query> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Query> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
