//! Frame scheduler driving timelines against a [`Clock`].
//!
//! [`AnimationScheduler::run`] anchors a timeline at `clock.now()`, emits the
//! time-zero sample right away and then samples once every `frame_ms` until
//! the timeline is done. The returned [`AnimationRunHandle`] cancels the run.
//!
//! # Run Lifecycle
//!
//! ```text
//! run() --> [running] --tick (not done)--> [running]
//!              |   \--tick (done)--> finalize --> on_complete --> [finished]
//!              \--cancel()--> [cancelled]
//! ```
//!
//! - At most one timer is pending per run.
//! - The run is finalized (not running, no timer) *before* `on_complete`, so
//!   `is_running()` is already false inside the completion callback.
//! - Cancelling from inside `on_update` or `on_complete` is honored
//!   immediately; no further frame is scheduled.
//! - Scheduled frames hold only a weak reference. Dropping every handle
//!   abandons the run: the pending frame wakes up, finds nothing and returns.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::clock::{Clock, TimerId};
use crate::config::DEFAULT_FRAME_MS;
use crate::easing::Easing;
use crate::error::{GaugeError, Result};
use crate::timeline::{Timeline, TimelineSample};

type UpdateFn = Box<dyn FnMut(&TimelineSample)>;
type CompleteFn = Box<dyn FnOnce(&TimelineSample)>;

/// Parameters for one animation run.
pub struct AnimationConfig {
    from: f64,
    to: f64,
    duration_ms: f64,
    easing: Easing,
    frame_ms: f64,
    on_update: UpdateFn,
    on_complete: Option<CompleteFn>,
}

impl AnimationConfig {
    pub fn new(
        from: f64,
        to: f64,
        duration_ms: f64,
    ) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: Easing::default(),
            frame_ms: DEFAULT_FRAME_MS,
            on_update: Box::new(|_| {}),
            on_complete: None,
        }
    }

    #[must_use]
    pub fn easing(
        mut self,
        easing: Easing,
    ) -> Self {
        self.easing = easing;
        self
    }

    /// Interval between frames in milliseconds (default 16).
    #[must_use]
    pub fn frame_ms(
        mut self,
        frame_ms: f64,
    ) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    /// Called with every sample, including the first and the final one.
    #[must_use]
    pub fn on_update(
        mut self,
        callback: impl FnMut(&TimelineSample) + 'static,
    ) -> Self {
        self.on_update = Box::new(callback);
        self
    }

    /// Called once with the final sample.
    #[must_use]
    pub fn on_complete(
        mut self,
        callback: impl FnOnce(&TimelineSample) + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// Starts animation runs on a shared clock.
#[derive(Clone)]
pub struct AnimationScheduler {
    clock: Rc<dyn Clock>,
}

impl AnimationScheduler {
    pub fn new(clock: Rc<dyn Clock>) -> Self { Self { clock } }

    pub fn clock(&self) -> &Rc<dyn Clock> { &self.clock }

    /// Start a run.
    ///
    /// Fails with [`GaugeError::InvalidNumericInput`] when `frame_ms` is not a
    /// positive finite number or the timeline parameters are invalid. Nothing
    /// is scheduled or emitted on failure.
    pub fn run(
        &self,
        config: AnimationConfig,
    ) -> Result<AnimationRunHandle> {
        if !config.frame_ms.is_finite() || config.frame_ms <= 0.0 {
            return Err(GaugeError::InvalidNumericInput { name: "frame_ms", value: config.frame_ms });
        }
        let timeline = Timeline::new(config.from, config.to, config.duration_ms)?
            .starting_at(self.clock.now())?
            .with_easing(config.easing);

        log::debug!(
            "animation start: {} -> {} over {}ms ({:?})",
            timeline.from(),
            timeline.to(),
            timeline.duration_ms(),
            timeline.easing()
        );

        let shared = Rc::new(RunShared {
            clock: Rc::clone(&self.clock),
            state: RefCell::new(RunState { timeline, frame_ms: config.frame_ms, timer: None, running: true }),
            on_update: RefCell::new(config.on_update),
            on_complete: RefCell::new(config.on_complete),
        });
        RunShared::tick(&shared);
        Ok(AnimationRunHandle { shared })
    }
}

struct RunState {
    timeline: Timeline,
    frame_ms: f64,
    timer: Option<TimerId>,
    running: bool,
}

struct RunShared {
    clock: Rc<dyn Clock>,
    state: RefCell<RunState>,
    on_update: RefCell<UpdateFn>,
    on_complete: RefCell<Option<CompleteFn>>,
}

impl RunShared {
    fn tick(this: &Rc<Self>) {
        let sample = {
            let mut state = this.state.borrow_mut();
            if !state.running {
                return;
            }
            state.timer = None;
            state.timeline.sample(this.clock.now())
        };

        (this.on_update.borrow_mut())(&sample);

        if !this.state.borrow().running {
            // Cancelled from inside on_update
            return;
        }

        if sample.done {
            this.finalize();
            log::debug!("animation complete at {}", sample.value);
            let complete = this.on_complete.borrow_mut().take();
            if let Some(complete) = complete {
                complete(&sample);
            }
            return;
        }

        let weak: Weak<Self> = Rc::downgrade(this);
        let frame_ms = this.state.borrow().frame_ms;
        let id = this.clock.set_timeout(
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::tick(&shared);
                }
            }),
            frame_ms,
        );
        this.state.borrow_mut().timer = Some(id);
    }

    /// Leave the running state and drop any pending timer.
    fn finalize(&self) -> bool {
        let (was_running, timer) = {
            let mut state = self.state.borrow_mut();
            let was_running = state.running;
            state.running = false;
            (was_running, state.timer.take())
        };
        if let Some(id) = timer {
            self.clock.clear_timeout(id);
        }
        was_running
    }
}

/// Handle to one in-flight run.
///
/// Clones refer to the same run.
#[derive(Clone)]
pub struct AnimationRunHandle {
    shared: Rc<RunShared>,
}

impl AnimationRunHandle {
    /// Stop the run. Idempotent; a finished run is left as is.
    pub fn cancel(&self) {
        if self.shared.finalize() {
            log::debug!("animation cancelled");
        }
    }

    pub fn is_running(&self) -> bool { self.shared.state.borrow().running }
}

impl core::fmt::Debug for AnimationRunHandle {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("AnimationRunHandle").field("running", &self.is_running()).finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
