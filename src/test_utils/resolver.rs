//! In-memory resolvers and record builders for pipeline tests.

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::models::DependencyRecord;
use crate::resolver::BranchResolver;

enum Answer {
    Always(String),
    Failing,
    ByModule(HashMap<String, String>),
}

/// Resolver answering from a fixed table, recording every call.
pub struct StaticResolver {
    answer: Answer,
    delay: Option<Duration>,
    panic_on: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StaticResolver {
    fn with_answer(answer: Answer) -> Self {
        Self {
            answer,
            delay: None,
            panic_on: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every lookup returns `branch`.
    pub fn always(branch: &str) -> Self {
        Self::with_answer(Answer::Always(branch.to_string()))
    }

    /// Every lookup fails.
    pub fn failing() -> Self {
        Self::with_answer(Answer::Failing)
    }

    /// Lookups return the branch listed for the module and fail otherwise.
    pub fn by_module<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let table = entries
            .into_iter()
            .map(|(path, branch)| (path.to_string(), branch.to_string()))
            .collect();
        Self::with_answer(Answer::ByModule(table))
    }

    /// Sleeps for `delay` inside every lookup.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panics instead of answering when asked about `module_path`.
    #[must_use]
    pub fn panicking_on(mut self, module_path: &str) -> Self {
        self.panic_on = Some(module_path.to_string());
        self
    }

    /// `(module_path, commit)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Highest number of lookups that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl BranchResolver for StaticResolver {
    async fn resolve_branch(&self, module_path: &str, commit: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((module_path.to_string(), commit.to_string()));
        }

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panic_on.as_deref() == Some(module_path) {
            panic!("resolver crashed on {module_path}");
        }

        match &self.answer {
            Answer::Always(branch) => Ok(branch.clone()),
            Answer::Failing => Err(anyhow!("lookup failed for {module_path}")),
            Answer::ByModule(table) => table
                .get(module_path)
                .cloned()
                .ok_or_else(|| anyhow!("no reference for {commit} in {module_path}")),
        }
    }
}

/// `count` resolvable records `github.com/x/m0 ..` with ids starting at 1.
pub fn records(count: usize) -> Vec<DependencyRecord> {
    (0..count)
        .map(|i| {
            DependencyRecord::new(
                i + 1,
                format!("github.com/x/m{i}"),
                format!("v0.0.0-20240101000000-{i:012x}"),
            )
        })
        .collect()
}
