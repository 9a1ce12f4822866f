use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::Table;
use crate::error::{ScopeError, ScopeResult};

use super::DataSource;

#[derive(Debug)]
struct FeedState {
    table: Mutex<Table>,
    updates: AtomicUsize,
    closed: AtomicBool,
}

/// Producer-side handle of a [`MemorySource`].
///
/// Hosts append rows from any thread; the engine sees them on its next tick.
#[derive(Debug, Clone)]
pub struct MemoryFeed {
    state: Arc<FeedState>,
}

impl MemoryFeed {
    pub fn push_row(&self, row: &[f64]) -> ScopeResult<()> {
        self.lock()?.push_row(row)
    }

    /// Swaps in a whole new table.
    pub fn replace(&self, table: Table) -> ScopeResult<()> {
        *self.lock()? = table;
        Ok(())
    }

    /// Number of `update` calls served so far.
    #[must_use]
    pub fn update_count(&self) -> usize {
        self.state.updates.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    fn lock(&self) -> ScopeResult<MutexGuard<'_, Table>> {
        self.state
            .table
            .lock()
            .map_err(|_| ScopeError::DataSource("memory feed lock poisoned".to_owned()))
    }
}

/// In-process data source backed by a shared, append-only table.
#[derive(Debug)]
pub struct MemorySource {
    feed: MemoryFeed,
    fail_on_update: Option<(usize, String)>,
}

impl MemorySource {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            feed: MemoryFeed {
                state: Arc::new(FeedState {
                    table: Mutex::new(table),
                    updates: AtomicUsize::new(0),
                    closed: AtomicBool::new(false),
                }),
            },
            fail_on_update: None,
        }
    }

    /// Makes the `nth` update (1-based) fail with a data-source error.
    #[must_use]
    pub fn failing_on_update(mut self, nth: usize, message: impl Into<String>) -> Self {
        self.fail_on_update = Some((nth, message.into()));
        self
    }

    #[must_use]
    pub fn feed(&self) -> MemoryFeed {
        self.feed.clone()
    }
}

impl DataSource for MemorySource {
    fn init(&mut self) -> ScopeResult<Table> {
        if self.feed.is_closed() {
            return Err(ScopeError::DataSource("memory source is closed".to_owned()));
        }
        Ok(self.feed.lock()?.clone())
    }

    fn update(&mut self) -> ScopeResult<Table> {
        if self.feed.is_closed() {
            return Err(ScopeError::DataSource("memory source is closed".to_owned()));
        }
        let count = self.feed.state.updates.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some((nth, message)) = &self.fail_on_update {
            if *nth == count {
                return Err(ScopeError::DataSource(message.clone()));
            }
        }
        Ok(self.feed.lock()?.clone())
    }

    fn close(&mut self) -> ScopeResult<()> {
        self.feed.state.closed.store(true, Ordering::Release);
        Ok(())
    }
}
