//! Bounded, most-recent-first history of completed exchanges.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::category::ContentCategory;
use crate::types::GenerationResult;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub prompt: String,
    pub result: String,
    pub category: ContentCategory,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_result(prompt: impl Into<String>, result: &GenerationResult) -> Self {
        Self {
            prompt: prompt.into(),
            result: result.content().to_string(),
            category: result.category(),
            timestamp: result.timestamp(),
        }
    }
}

/// Keeps at most `limit` entries; the newest is at the front and the oldest is evicted first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// A zero limit is raised to one so the latest exchange is always kept.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(n: i64) -> HistoryEntry {
        HistoryEntry {
            prompt: format!("prompt {n}"),
            result: format!("result {n}"),
            category: ContentCategory::General,
            timestamp: Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap(),
        }
    }

    #[test]
    fn six_pushes_keep_five_newest_first() {
        let mut history = History::default();
        for n in 1..=6 {
            history.push(entry(n));
        }
        let prompts: Vec<&str> = history.iter().map(|e| e.prompt.as_str()).collect();
        assert_eq!(
            prompts,
            vec!["prompt 6", "prompt 5", "prompt 4", "prompt 3", "prompt 2"]
        );
    }

    #[test]
    fn never_exceeds_limit() {
        let mut history = History::new(3);
        for n in 0..50 {
            history.push(entry(n));
            assert!(history.len() <= 3);
        }
        let ts: Vec<_> = history.iter().map(|e| e.timestamp).collect();
        assert!(ts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn zero_limit_still_keeps_latest() {
        let mut history = History::new(0);
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.iter().next().unwrap().prompt, "prompt 2");
    }
}
