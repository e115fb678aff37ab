//! Generation counters for discarding stale query results
//!
//! Each query family takes a [`Ticket`] before it starts fetching. A config
//! change bumps every family, so results carrying an older ticket are dropped
//! instead of overwriting fresher state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The independent query families a dashboard render issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    Commits,
    PullRequests,
    Stats,
    Suggestions,
    Productivity,
}

impl QueryFamily {
    pub const ALL: [QueryFamily; 5] = [
        QueryFamily::Commits,
        QueryFamily::PullRequests,
        QueryFamily::Stats,
        QueryFamily::Suggestions,
        QueryFamily::Productivity,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueryFamily::Commits => "commits",
            QueryFamily::PullRequests => "prs",
            QueryFamily::Stats => "stats",
            QueryFamily::Suggestions => "suggestions",
            QueryFamily::Productivity => "productivity",
        }
    }
}

/// Shared per-family counters; clones observe the same counters
#[derive(Debug, Clone, Default)]
pub struct Generations {
    counters: Arc<[AtomicU64; 5]>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current generation of `family`
    pub fn begin(&self, family: QueryFamily) -> Ticket {
        Ticket {
            family,
            generation: self.current(family),
            counters: Arc::clone(&self.counters),
        }
    }

    pub fn current(&self, family: QueryFamily) -> u64 {
        self.counters[family.index()].load(Ordering::Acquire)
    }

    pub fn bump(&self, family: QueryFamily) {
        self.counters[family.index()].fetch_add(1, Ordering::AcqRel);
    }

    /// Invalidate every in-flight query (config changed)
    pub fn bump_all(&self) {
        for family in QueryFamily::ALL {
            self.bump(family);
        }
    }
}

/// Generation observed when a query started
#[derive(Debug, Clone)]
pub struct Ticket {
    family: QueryFamily,
    generation: u64,
    counters: Arc<[AtomicU64; 5]>,
}

impl Ticket {
    pub fn family(&self) -> QueryFamily {
        self.family
    }

    pub fn is_current(&self) -> bool {
        self.counters[self.family.index()].load(Ordering::Acquire) == self.generation
    }

    /// Keep `value` only if no newer generation started meanwhile
    pub fn accept<T>(&self, value: T) -> Option<T> {
        if self.is_current() {
            Some(value)
        } else {
            tracing::debug!(family = self.family.as_str(), "dropping stale result");
            None
        }
    }
}
