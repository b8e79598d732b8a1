//! Counter registry: the single source of truth for upload server counters.
//!
//! Fixed counters are allocated once at construction. Requests per method and
//! errors per (status, code) live in [`CounterGroup`]s (errors split by status
//! first) whose key sets grow as new values are observed.

use std::sync::Arc;

use dashmap::DashMap;

use crate::counter::{Counter, CounterGroup};

/// The statically known counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedCounter {
    BytesReceived,
    UploadsCreated,
    UploadsFinished,
    UploadsTerminated,
}

impl FixedCounter {
    pub const ALL: [FixedCounter; 4] = [
        FixedCounter::BytesReceived,
        FixedCounter::UploadsCreated,
        FixedCounter::UploadsFinished,
        FixedCounter::UploadsTerminated,
    ];
}

/// Key of the error counter group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorKey {
    pub status: u16,
    pub code: String,
}

impl ErrorKey {
    pub fn new(status: u16, code: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
        }
    }
}

/// Error counters, grouped by status then code.
///
/// Splitting the composite key lets lookups borrow the code as `&str`, so
/// incrementing an existing (status, code) pair never allocates.
#[derive(Default)]
pub struct ErrorCounters {
    by_status: DashMap<u16, Arc<CounterGroup<String>>>,
}

impl ErrorCounters {
    fn group(&self, status: u16) -> Arc<CounterGroup<String>> {
        if let Some(g) = self.by_status.get(&status) {
            return Arc::clone(g.value());
        }
        Arc::clone(
            self.by_status
                .entry(status)
                .or_insert_with(Default::default)
                .value(),
        )
    }

    /// Return the counter for (status, code), creating it on first use.
    pub fn counter(&self, status: u16, code: &str) -> Counter {
        self.group(status).counter(code)
    }

    pub fn inc(&self, status: u16, code: &str) {
        self.group(status).inc(code);
    }

    /// Value for (status, code) without creating it.
    pub fn get(&self, status: u16, code: &str) -> Option<u64> {
        self.by_status.get(&status).and_then(|g| g.value().get(code))
    }

    /// Number of distinct (status, code) pairs.
    pub fn len(&self) -> usize {
        self.by_status.iter().map(|g| g.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Vec<(ErrorKey, u64)> {
        let groups: Vec<_> = self
            .by_status
            .iter()
            .map(|r| (*r.key(), Arc::clone(r.value())))
            .collect();

        groups
            .into_iter()
            .flat_map(|(status, group)| {
                group
                    .values()
                    .into_iter()
                    .map(move |(code, v)| (ErrorKey { status, code }, v))
            })
            .collect()
    }
}

/// Point-in-time copy of every counter.
///
/// Each value was read atomically, but different counters may have been read
/// at slightly different instants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryValues {
    pub bytes_received: u64,
    pub uploads_created: u64,
    pub uploads_finished: u64,
    pub uploads_terminated: u64,
    /// Sorted by method.
    pub requests: Vec<(String, u64)>,
    /// Sorted by (status, code).
    pub errors: Vec<(ErrorKey, u64)>,
}

impl RegistryValues {
    pub fn fixed(&self, which: FixedCounter) -> u64 {
        match which {
            FixedCounter::BytesReceived => self.bytes_received,
            FixedCounter::UploadsCreated => self.uploads_created,
            FixedCounter::UploadsFinished => self.uploads_finished,
            FixedCounter::UploadsTerminated => self.uploads_terminated,
        }
    }
}

/// Process-wide counter registry.
/// Construct once at startup, then share via Arc.
#[derive(Default)]
pub struct CounterRegistry {
    bytes_received: Counter,
    uploads_created: Counter,
    uploads_finished: Counter,
    uploads_terminated: Counter,
    requests: CounterGroup<String>,
    errors: ErrorCounters,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to a fixed counter.
    pub fn fixed(&self, which: FixedCounter) -> &Counter {
        match which {
            FixedCounter::BytesReceived => &self.bytes_received,
            FixedCounter::UploadsCreated => &self.uploads_created,
            FixedCounter::UploadsFinished => &self.uploads_finished,
            FixedCounter::UploadsTerminated => &self.uploads_terminated,
        }
    }

    /// Increment a fixed counter by 1.
    pub fn increment(&self, which: FixedCounter) {
        self.fixed(which).inc();
    }

    pub fn add_bytes_received(&self, delta: u64) {
        self.bytes_received.add(delta);
    }

    pub fn increment_request(&self, method: &str) {
        self.requests.inc(method);
    }

    pub fn increment_error(&self, status: u16, code: &str) {
        self.errors.inc(status, code);
    }

    /// Stable handle for `method`; callers on a hot path may keep it.
    pub fn request_counter(&self, method: &str) -> Counter {
        self.requests.counter(method)
    }

    pub fn error_counter(&self, status: u16, code: &str) -> Counter {
        self.errors.counter(status, code)
    }

    pub fn requests(&self) -> &CounterGroup<String> {
        &self.requests
    }

    pub fn errors(&self) -> &ErrorCounters {
        &self.errors
    }

    pub fn read_all(&self) -> RegistryValues {
        let mut requests = self.requests.values();
        requests.sort();
        let mut errors = self.errors.values();
        errors.sort();

        RegistryValues {
            bytes_received: self.bytes_received.get(),
            uploads_created: self.uploads_created.get(),
            uploads_finished: self.uploads_finished.get(),
            uploads_terminated: self.uploads_terminated.get(),
            requests,
            errors,
        }
    }
}
