//! Per-user search session state

use crate::search::engine::SearchMode;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Query history and current mode of one interactive session
///
/// History is most recent first. Repeating a query moves it back to the
/// front instead of storing it twice.
#[derive(Debug, Clone)]
pub struct SessionContext {
    history: VecDeque<String>,
    capacity: usize,
    pub mode: SearchMode,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            mode: SearchMode::default(),
        }
    }

    /// Remember a submitted query; blank queries are ignored
    pub fn record_query(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.capacity == 0 {
            return;
        }

        if let Some(pos) = self.history.iter().position(|q| q == query) {
            self.history.remove(pos);
        }
        self.history.push_front(query.to_string());
        self.history.truncate(self.capacity);
    }

    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.history.iter().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
