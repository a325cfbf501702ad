//! Timer scheduling for simulated typing delays.
//!
//! The session never sleeps; it hands callbacks to a [`Scheduler`] and keeps
//! the returned [`TimerHandle`]s so it can cancel them on teardown.
//! [`TokioScheduler`] runs callbacks on a tokio runtime. [`ManualScheduler`]
//! keeps a virtual clock that tests advance explicitly.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::debug;

use crate::error::ChatError;

/// A callback to run once its delay elapses.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Runs callbacks after a delay.
///
/// Implementations must not hold internal locks while a task runs: tasks
/// commonly schedule follow-up tasks.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Cancel a pending callback. Returns `false` if it already ran or was
    /// cancelled.
    fn cancel(&self, handle: TimerHandle) -> bool;

    /// Whether the callback is still waiting to run.
    fn is_pending(&self, handle: TimerHandle) -> bool;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// TokioScheduler
// =============================================================================

#[derive(Default)]
struct TokioTimers {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, AbortHandle>>,
}

/// Scheduler backed by `tokio::time::sleep`, one task per timer.
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    timers: Arc<TokioTimers>,
}

impl TokioScheduler {
    /// Create a scheduler on the runtime of the calling context.
    pub fn new() -> Result<Self, ChatError> {
        let runtime = Handle::try_current().map_err(|_| ChatError::NoRuntime)?;
        Ok(Self::with_handle(runtime))
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(TokioTimers::default()),
        }
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.timers.pending).len()
    }

    /// Cancel every pending timer.
    pub fn shutdown(&self) {
        let drained: Vec<_> = lock(&self.timers.pending).drain().collect();
        debug!(count = drained.len(), "Cancelling pending timers");
        for (_, abort) in drained {
            abort.abort();
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.timers.next_id.fetch_add(1, Ordering::Relaxed);
        let timers = Arc::clone(&self.timers);

        // Hold the map while spawning so the timer cannot fire before its
        // abort handle is registered.
        let mut pending = lock(&self.timers.pending);
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let still_pending = lock(&timers.pending).remove(&id).is_some();
            if still_pending {
                task();
            }
        });
        pending.insert(id, join.abort_handle());
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        match lock(&self.timers.pending).remove(&handle.0) {
            Some(abort) => {
                abort.abort();
                true
            }
            None => false,
        }
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        lock(&self.timers.pending).contains_key(&handle.0)
    }
}

// =============================================================================
// ManualScheduler
// =============================================================================

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    /// Keyed by (due time, id) so equal due times fire in scheduling order.
    queue: BTreeMap<(Duration, u64), Task>,
}

impl ManualState {
    fn due_key(&self, id: u64) -> Option<(Duration, u64)> {
        self.queue.keys().find(|(_, i)| *i == id).copied()
    }
}

/// Deterministic scheduler driven by a virtual clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        lock(&self.state).now
    }

    pub fn pending(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Move the clock forward by `by`, running every task that falls due in
    /// due-time order, including tasks scheduled by those tasks.
    /// Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = lock(&self.state).now + by;
        let mut ran = 0;
        loop {
            let next = {
                let mut state = lock(&self.state);
                let next_due = state.queue.keys().next().map(|(due, _)| *due);
                match next_due {
                    Some(due) if due <= target => {
                        state.now = due;
                        state.queue.pop_first().map(|(_, task)| task)
                    }
                    _ => {
                        state.now = target;
                        None
                    }
                }
            };
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Run tasks until the queue is empty, jumping the clock to each due time.
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = {
                let mut state = lock(&self.state);
                match state.queue.pop_first() {
                    Some(((due, _), task)) => {
                        state.now = state.now.max(due);
                        Some(task)
                    }
                    None => None,
                }
            };
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        let due = state.now + delay;
        state.queue.insert((due, id), task);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut state = lock(&self.state);
        match state.due_key(handle.0) {
            Some(key) => state.queue.remove(&key).is_some(),
            None => false,
        }
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        lock(&self.state).due_key(handle.0).is_some()
    }
}
