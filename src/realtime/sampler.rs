use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ScopeError, ScopeResult};

/// Work performed by the background loop once per interval.
pub(crate) trait Tick: Send + Sync + 'static {
    fn tick(&self) -> ScopeResult<()>;

    /// Observes a fatal tick error on the sampling thread.
    fn tick_failed(&self, _error: &ScopeError) {}
}

/// Handle to a running sampling thread.
#[derive(Debug)]
pub(crate) struct Sampler {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<ScopeResult<()>>,
}

impl Sampler {
    pub(crate) fn spawn<T: Tick>(task: Arc<T>, interval: Duration) -> ScopeResult<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("scope-sampler".to_owned())
            .spawn(move || run(task.as_ref(), &flag, interval))?;
        debug!(interval_ms = interval.as_millis() as u64, "sampler started");
        Ok(Self { stop, handle })
    }

    #[must_use]
    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the loop and waits for it to exit.
    ///
    /// Blocks for at most one tick plus one interval. Returns the error that
    /// ended the loop, if any.
    pub(crate) fn stop(self) -> ScopeResult<()> {
        self.stop.store(true, Ordering::Release);
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_owned());
                Err(ScopeError::EngineFailed(message))
            }
        }
    }
}

fn run<T: Tick>(task: &T, stop: &AtomicBool, interval: Duration) -> ScopeResult<()> {
    while !stop.load(Ordering::Acquire) {
        if let Err(err) = task.tick() {
            warn!(error = %err, "tick failed, sampler stopping");
            task.tick_failed(&err);
            return Err(err);
        }
        thread::sleep(interval);
    }
    debug!("sampler stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter {
        ticks: AtomicUsize,
        fail_at: usize,
    }

    impl Tick for Counter {
        fn tick(&self) -> ScopeResult<()> {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if n == self.fail_at {
                return Err(ScopeError::DataSource("boom".to_owned()));
            }
            Ok(())
        }
    }

    #[test]
    fn stop_joins_a_healthy_loop() {
        let task = Arc::new(Counter {
            ticks: AtomicUsize::new(0),
            fail_at: usize::MAX,
        });
        let sampler = Sampler::spawn(Arc::clone(&task), Duration::from_millis(1)).expect("spawn");
        thread::sleep(Duration::from_millis(20));
        sampler.stop().expect("clean stop");
        assert!(task.ticks.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn fatal_tick_ends_loop_and_surfaces_on_stop() {
        let task = Arc::new(Counter {
            ticks: AtomicUsize::new(0),
            fail_at: 2,
        });
        let sampler = Sampler::spawn(Arc::clone(&task), Duration::from_millis(1)).expect("spawn");
        while !sampler.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        let err = sampler.stop().expect_err("fatal tick");
        assert!(matches!(err, ScopeError::DataSource(_)));
        assert_eq!(task.ticks.load(Ordering::SeqCst), 2);
    }
}
