//! Outcome aggregation and merging.
//!
//! Workers insert into three [`OutcomeCollection`]s concurrently without any
//! locking on their side: each collection is a sharded [`DashMap`] keyed by
//! module path. A run owns its [`OutcomeBuckets`]; nothing is shared between
//! runs.
//!
//! After the pool has joined, [`merge`] folds the buckets into one
//! [`MergedResults`] ordered by module path:
//!
//! 1. failed outcomes, when errors are shown
//! 2. special outcomes, always
//! 3. ordinary outcomes, unless only special branches were requested
//!
//! Later steps overwrite earlier entries with the same module path.

use dashmap::DashMap;
use std::collections::BTreeMap;

use crate::models::{ResolutionOutcome, RunConfiguration};

/// Concurrent map of outcomes keyed by module path. Last write wins.
#[derive(Debug, Default)]
pub struct OutcomeCollection {
    entries: DashMap<String, ResolutionOutcome>,
}

impl OutcomeCollection {
    pub fn insert(&self, outcome: ResolutionOutcome) {
        self.entries.insert(outcome.module_path().to_string(), outcome);
    }

    pub fn get(&self, module_path: &str) -> Option<ResolutionOutcome> {
        self.entries.get(module_path).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, module_path: &str) -> bool {
        self.entries.contains_key(module_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the current entries out, in no particular order.
    pub fn snapshot(&self) -> Vec<ResolutionOutcome> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }
}

/// The three outcome collections of one run.
#[derive(Debug, Default)]
pub struct OutcomeBuckets {
    pub ordinary: OutcomeCollection,
    pub special: OutcomeCollection,
    pub failed: OutcomeCollection,
}

impl OutcomeBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes an outcome into the collection matching its variant.
    pub fn record(&self, outcome: ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Ordinary {
                ..
            } => self.ordinary.insert(outcome),
            ResolutionOutcome::Special {
                ..
            } => self.special.insert(outcome),
            ResolutionOutcome::Failed {
                ..
            } => self.failed.insert(outcome),
        }
    }

    /// Number of entries across all three collections.
    pub fn total(&self) -> usize {
        self.ordinary.len() + self.special.len() + self.failed.len()
    }
}

/// Merged outcomes, iterated in module path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedResults {
    entries: BTreeMap<String, ResolutionOutcome>,
}

impl MergedResults {
    fn fold(&mut self, collection: &OutcomeCollection) {
        for outcome in collection.snapshot() {
            self.entries.insert(outcome.module_path().to_string(), outcome);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolutionOutcome> {
        self.entries.values()
    }

    pub fn get(&self, module_path: &str) -> Option<&ResolutionOutcome> {
        self.entries.get(module_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Special outcomes only, in module path order.
    pub fn special(&self) -> impl Iterator<Item = &ResolutionOutcome> {
        self.iter().filter(|outcome| outcome.is_special())
    }
}

/// Folds the buckets of a finished run into one ordered listing.
pub fn merge(buckets: &OutcomeBuckets, cfg: &RunConfiguration) -> MergedResults {
    let mut merged = MergedResults::default();
    if cfg.show_errors {
        merged.fold(&buckets.failed);
    }
    merged.fold(&buckets.special);
    if !cfg.special_only {
        merged.fold(&buckets.ordinary);
    }
    merged
}
