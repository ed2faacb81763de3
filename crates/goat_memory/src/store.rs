//! Append-only interaction log with keyword-overlap recall.
//!
//! Search is a linear scan: O(n·m) in record count × query words. That is
//! fine for the few hundred to few thousand records a session produces.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

// ============================================================================
// MemoryRecord
// ============================================================================

/// An immutable log entry. Build it with [`MemoryRecord::new`] and
/// [`MemoryRecord::with_field`], then hand it to [`MemoryStore::append`].
#[derive(Debug, Clone, Serialize)]
pub struct MemoryRecord {
    kind: String,
    fields: BTreeMap<String, Value>,
    importance: f64,
    timestamp: DateTime<Utc>,
    /// Lowercased `kind` + JSON fields, matched against query words.
    #[serde(skip)]
    haystack: String,
}

impl MemoryRecord {
    /// `importance` is clamped to [0, 1]; NaN becomes 0.
    pub fn new(kind: impl Into<String>, importance: f64) -> Self {
        let importance = if importance.is_nan() {
            0.0
        } else {
            importance.clamp(0.0, 1.0)
        };
        let mut record = Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
            importance,
            timestamp: Utc::now(),
            haystack: String::new(),
        };
        record.reindex();
        record
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self.reindex();
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn importance(&self) -> f64 {
        self.importance
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn reindex(&mut self) {
        let fields = serde_json::to_string(&self.fields).unwrap_or_default();
        self.haystack = format!("{} {}", self.kind, fields).to_lowercase();
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// A record paired with its recall score.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRecord<'a> {
    pub score: f64,
    pub record: &'a MemoryRecord,
    seq: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: VecDeque<MemoryRecord>,
    /// FIFO bound. `None` = unbounded.
    capacity: Option<usize>,
    evicted: u64,
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that evicts the oldest record once `capacity` is reached.
    /// A capacity of 0 means unbounded.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: (capacity > 0).then_some(capacity),
            evicted: 0,
        }
    }

    /// Append a record, preserving insertion order. Returns the evicted
    /// record when the store was full.
    pub fn append(&mut self, record: MemoryRecord) -> Option<MemoryRecord> {
        let evicted = match self.capacity {
            Some(cap) if self.records.len() >= cap => {
                self.evicted += 1;
                self.records.pop_front()
            }
            _ => None,
        };
        if let Some(old) = &evicted {
            tracing::debug!(kind = old.kind(), "memory full, evicted oldest record");
        }
        self.records.push_back(record);
        evicted
    }

    /// Rank records by keyword overlap with `query`.
    ///
    /// Each lowercase query word found as a substring of a record's search
    /// text adds 1 (repeated query words count again); the count is then
    /// multiplied by `1 + importance`. Only positive scores are returned,
    /// highest first, ties broken most-recent-first, at most `top_k`.
    pub fn search_similar(&self, query: &str, top_k: usize) -> Vec<ScoredRecord<'_>> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();
        if words.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredRecord<'_>> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(seq, record)| {
                let hits = words
                    .iter()
                    .filter(|w| record.haystack.contains(**w))
                    .count();
                (hits > 0).then(|| ScoredRecord {
                    score: hits as f64 * (1.0 + record.importance),
                    record,
                    seq,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(b.seq.cmp(&a.seq)));
        scored.truncate(top_k);
        scored
    }

    /// Record count per kind, ordered by kind.
    pub fn stats(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Total records dropped by the FIFO bound over the store's lifetime.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================
