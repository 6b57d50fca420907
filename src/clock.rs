//! Time sources with timer queues.
//!
//! The scheduler never reads wall time directly. It is handed a [`Clock`],
//! which makes animations deterministic under test ([`ManualClock`]) and
//! frame-loop driven in real hosts ([`FrameClock`]).
//!
//! Both clocks share a [`TimerQueue`]: timers fire in due-time order, ties in
//! scheduling order. Firing never holds a borrow of the queue, so callbacks may
//! freely schedule or clear other timers.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

/// Identifier returned by [`Clock::set_timeout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// One-shot timer callback.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Monotonic millisecond clock with one-shot timers.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> f64;

    /// Run `callback` once, `delay_ms` from now.
    fn set_timeout(
        &self,
        callback: TimerCallback,
        delay_ms: f64,
    ) -> TimerId;

    /// Forget a pending timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(
        &self,
        id: TimerId,
    );
}

// =============================================================================
// Timer Queue
// =============================================================================

struct PendingTimer {
    id: TimerId,
    due_ms: f64,
    callback: TimerCallback,
}

/// Pending one-shot timers, ordered on demand.
#[derive(Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl TimerQueue {
    pub fn new() -> Self { Self::default() }

    pub fn schedule(
        &mut self,
        callback: TimerCallback,
        due_ms: f64,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer { id, due_ms, callback });
        id
    }

    pub fn cancel(
        &mut self,
        id: TimerId,
    ) {
        self.pending.retain(|t| t.id != id);
    }

    /// Earliest due time among pending timers.
    pub fn next_due(&self) -> Option<f64> { self.pending.iter().map(|t| t.due_ms).reduce(f64::min) }

    /// Remove and return the earliest timer due at or before `limit_ms`.
    pub fn pop_due(
        &mut self,
        limit_ms: f64,
    ) -> Option<(f64, TimerCallback)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= limit_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.id.cmp(&b.id)))
            .map(|(i, _)| i)?;
        let timer = self.pending.swap_remove(index);
        Some((timer.due_ms, timer.callback))
    }

    #[inline]
    pub fn len(&self) -> usize { self.pending.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }
}

// =============================================================================
// Manual Clock
// =============================================================================

/// Clock that only moves when told to.
///
/// `advance` walks time forward timer by timer, so a callback observes
/// `now()` equal to its own due time and timers it schedules fire within the
/// same `advance` call when they fall inside the window.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<f64>,
    queue: RefCell<TimerQueue>,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    pub fn starting_at(now_ms: f64) -> Self { Self { now: Cell::new(now_ms), queue: RefCell::default() } }

    /// Move time forward by `ms`, firing every timer that comes due.
    pub fn advance(
        &self,
        ms: f64,
    ) {
        let target = self.now.get() + ms.max(0.0);
        loop {
            // Borrow ends before the callback runs
            let next = self.queue.borrow_mut().pop_due(target);
            let Some((due_ms, callback)) = next else { break };
            self.now.set(due_ms.max(self.now.get()));
            callback();
        }
        self.now.set(target);
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize { self.queue.borrow().len() }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 { self.now.get() }

    fn set_timeout(
        &self,
        callback: TimerCallback,
        delay_ms: f64,
    ) -> TimerId {
        let due = self.now.get() + delay_ms.max(0.0);
        self.queue.borrow_mut().schedule(callback, due)
    }

    fn clear_timeout(
        &self,
        id: TimerId,
    ) {
        self.queue.borrow_mut().cancel(id);
    }
}

// =============================================================================
// Frame Clock
// =============================================================================

/// Real-time clock for host frame loops.
///
/// Time is measured from creation with [`Instant`]. Timers only fire from
/// [`FrameClock::poll`] (call it once per frame) or
/// [`FrameClock::run_until_idle`].
pub struct FrameClock {
    origin: Instant,
    queue: RefCell<TimerQueue>,
}

impl Default for FrameClock {
    fn default() -> Self { Self::new() }
}

impl FrameClock {
    pub fn new() -> Self { Self { origin: Instant::now(), queue: RefCell::default() } }

    /// Fire every timer due by now. Returns how many fired.
    pub fn poll(&self) -> usize {
        let mut fired = 0;
        loop {
            let next = self.queue.borrow_mut().pop_due(self.now());
            let Some((_, callback)) = next else { break };
            callback();
            fired += 1;
        }
        fired
    }

    /// Block, sleeping between deadlines, until no timers remain.
    pub fn run_until_idle(&self) {
        loop {
            let next_due = self.queue.borrow().next_due();
            let Some(due) = next_due else { break };
            let wait = due - self.now();
            if wait > 0.0 {
                std::thread::sleep(Duration::from_secs_f64(wait / 1_000.0));
            }
            self.poll();
        }
    }

    pub fn pending(&self) -> usize { self.queue.borrow().len() }
}

impl Clock for FrameClock {
    fn now(&self) -> f64 { self.origin.elapsed().as_secs_f64() * 1_000.0 }

    fn set_timeout(
        &self,
        callback: TimerCallback,
        delay_ms: f64,
    ) -> TimerId {
        let due = self.now() + delay_ms.max(0.0);
        self.queue.borrow_mut().schedule(callback, due)
    }

    fn clear_timeout(
        &self,
        id: TimerId,
    ) {
        self.queue.borrow_mut().cancel(id);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
