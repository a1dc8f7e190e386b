//! The recurring poll scheduler.
//!
//! Each tracker owns one or two [`Poller`]s. A poller is a single
//! dedicated worker thread that runs the tick body synchronously and
//! only rearms the interval after the body returns — two ticks can
//! never overlap, by construction rather than by reentrancy guard.
//!
//! `start`/`stop` are reference counted so multiple logical owners
//! (e.g. two overlay windows showing the same tracker) can share one
//! poller without stopping it from under each other. `shutdown` is
//! unconditional and terminal.
//!
//! A tick body that fails or panics is logged and the poller rearms; a
//! single bad tick must never silently disable all future tracking.

use parking_lot::{Condvar, Mutex};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollerStats {
    /// Total ticks executed.
    pub ticks: u64,
    /// Ticks that returned an error or panicked.
    pub failures: u64,
    /// Current start/stop reference count.
    pub active: usize,
}

#[derive(Default)]
struct State {
    active: usize,
    shutdown: bool,
    ticks: u64,
    failures: u64,
}

struct Shared {
    name: String,
    interval: Duration,
    state: Mutex<State>,
    wakeup: Condvar,
}

/// A refcounted single-worker recurring scheduler.
pub struct Poller {
    shared: Arc<Shared>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    /// Spawn the worker thread. The poller starts disarmed; no ticks
    /// run until [`start`](Self::start) is called.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to spawn a thread.
    #[must_use]
    pub fn spawn<F>(name: &str, interval: Duration, tick: F) -> Self
    where
        F: Fn() -> tyria_core::Result<()> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            name: name.to_string(),
            interval,
            state: Mutex::new(State::default()),
            wakeup: Condvar::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name(format!("poller-{name}"))
            .spawn(move || worker(&worker_shared, &tick))
            .expect("failed to spawn poller thread");

        Self {
            shared,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Arm the poller (or add another logical owner).
    pub fn start(&self) {
        let mut st = self.shared.state.lock();
        st.active += 1;
        debug!(poller = %self.shared.name, active = st.active, "Poller started");
        self.shared.wakeup.notify_all();
    }

    /// Release one logical owner; the poller disarms when the count
    /// reaches zero. Calling `stop` more times than `start` is a no-op.
    pub fn stop(&self) {
        let mut st = self.shared.state.lock();
        st.active = st.active.saturating_sub(1);
        debug!(poller = %self.shared.name, active = st.active, "Poller stopped");
        self.shared.wakeup.notify_all();
    }

    /// Terminally shut the poller down, regardless of the reference
    /// count, and join the worker. Safe to call without a prior
    /// `start`; idempotent.
    pub fn shutdown(&self) {
        {
            let mut st = self.shared.state.lock();
            st.shutdown = true;
            self.shared.wakeup.notify_all();
        }
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                warn!(poller = %self.shared.name, "Poller worker terminated abnormally");
            }
            debug!(poller = %self.shared.name, "Poller shut down");
        }
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> PollerStats {
        let st = self.shared.state.lock();
        PollerStats {
            ticks: st.ticks,
            failures: st.failures,
            active: st.active,
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("name", &self.shared.name)
            .field("interval", &self.shared.interval)
            .finish_non_exhaustive()
    }
}

fn worker<F>(shared: &Arc<Shared>, tick: &F)
where
    F: Fn() -> tyria_core::Result<()>,
{
    loop {
        // Wait until armed (or shut down).
        {
            let mut st = shared.state.lock();
            while !st.shutdown && st.active == 0 {
                shared.wakeup.wait(&mut st);
            }
            if st.shutdown {
                break;
            }
        }

        // Run one tick outside the lock.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| tick()));

        let mut st = shared.state.lock();
        st.ticks += 1;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                st.failures += 1;
                warn!(poller = %shared.name, error = %e, "Poll tick failed; rearming");
            }
            Err(_) => {
                st.failures += 1;
                warn!(poller = %shared.name, "Poll tick panicked; rearming");
            }
        }
        if st.shutdown {
            break;
        }
        // Rearm: sleep the interval, but wake early for stop/shutdown.
        if st.active > 0 {
            self::sleep_interval(shared, &mut st);
        }
        if st.shutdown {
            break;
        }
    }
    debug!(poller = %shared.name, "Poller worker exited");
}

fn sleep_interval(shared: &Shared, st: &mut parking_lot::MutexGuard<'_, State>) {
    // A wakeup during the wait (stop or shutdown) ends the sleep; the
    // outer loop re-checks the flags either way.
    let _ = shared.wakeup.wait_for(st, shared.interval);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tyria_core::OverlayError;

    const TICK: Duration = Duration::from_millis(2);
    const SETTLE: Duration = Duration::from_millis(60);

    fn counting_poller() -> (Poller, Arc<AtomicU64>) {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let poller = Poller::spawn("test", TICK, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (poller, count)
    }

    #[test]
    fn no_ticks_before_start() {
        let (poller, count) = counting_poller();
        std::thread::sleep(SETTLE);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        poller.shutdown();
    }

    #[test]
    fn ticks_while_armed_and_stop_disarms() {
        let (poller, count) = counting_poller();
        poller.start();
        std::thread::sleep(SETTLE);
        assert!(count.load(Ordering::SeqCst) > 0);

        poller.stop();
        std::thread::sleep(TICK * 4);
        let frozen = count.load(Ordering::SeqCst);
        std::thread::sleep(SETTLE);
        assert_eq!(count.load(Ordering::SeqCst), frozen);
        poller.shutdown();
    }

    #[test]
    fn refcount_keeps_poller_armed() {
        let (poller, count) = counting_poller();
        poller.start();
        poller.start();
        poller.stop();
        std::thread::sleep(SETTLE);
        assert!(
            count.load(Ordering::SeqCst) > 0,
            "one owner remains, poller must keep ticking"
        );

        poller.stop();
        std::thread::sleep(TICK * 4);
        let frozen = count.load(Ordering::SeqCst);
        std::thread::sleep(SETTLE);
        assert_eq!(count.load(Ordering::SeqCst), frozen);
        poller.shutdown();
    }

    #[test]
    fn shutdown_without_start_is_safe_and_idempotent() {
        let (poller, _count) = counting_poller();
        poller.shutdown();
        poller.shutdown();
    }

    #[test]
    fn no_ticks_after_shutdown() {
        let (poller, count) = counting_poller();
        poller.start();
        std::thread::sleep(SETTLE);
        poller.shutdown();
        let frozen = count.load(Ordering::SeqCst);
        std::thread::sleep(SETTLE);
        assert_eq!(count.load(Ordering::SeqCst), frozen);
        // Starting after shutdown must not resurrect the worker.
        poller.start();
        std::thread::sleep(SETTLE);
        assert_eq!(count.load(Ordering::SeqCst), frozen);
    }

    #[test]
    fn failing_ticks_keep_the_poller_alive() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let poller = Poller::spawn("failing", TICK, move || {
            c.fetch_add(1, Ordering::SeqCst);
            Err(OverlayError::Config("boom".to_string()))
        });
        poller.start();
        std::thread::sleep(SETTLE);
        let stats = poller.stats();
        assert!(stats.ticks > 1, "must keep ticking after failures");
        assert_eq!(stats.ticks, stats.failures);
        poller.shutdown();
    }

    #[test]
    fn panicking_ticks_keep_the_poller_alive() {
        let count = Arc::new(AtomicU64::new(0));
        let c = Arc::clone(&count);
        let poller = Poller::spawn("panicking", TICK, move || {
            c.fetch_add(1, Ordering::SeqCst);
            assert!(c.load(Ordering::SeqCst) > 1_000_000, "forced panic");
            Ok(())
        });
        poller.start();
        std::thread::sleep(SETTLE);
        assert!(
            count.load(Ordering::SeqCst) > 1,
            "must keep ticking after a panic"
        );
        poller.shutdown();
    }
}
