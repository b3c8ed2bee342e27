//! Cooperative periodic timer table.
//!
//! Timers are registered once at startup and live for the whole run. The
//! dispatcher calls [`Scheduler::handle`] with the current [`Instant`]; every
//! due, unpaused timer runs its task exactly once per call, in registration
//! order. A timer's next deadline advances by whole periods from its previous
//! deadline, so a late timer catches up one tick per pass instead of dropping
//! or merging ticks.

use embassy_time::{Duration, Instant};
use log::debug;
use thiserror_no_std::Error;

use crate::display_sink::DisplaySink;
use crate::tasks::PeriodicTask;
use crate::ui::WidgetTree;

/// Handle returned by [`Scheduler::create_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(usize);

impl TimerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Timer table is full ({max} timers)")]
    CapacityExceeded { max: usize },
    #[error("Timer period must be non-zero")]
    ZeroPeriod,
    #[error("No timer at index {index}")]
    UnknownTimer { index: usize },
}

#[derive(Debug)]
struct Timer<T> {
    task: T,
    period: Duration,
    next_due: Instant,
    paused: bool,
}

/// Fixed-capacity table of up to `N` periodic tasks.
#[derive(Debug)]
pub struct Scheduler<T, const N: usize> {
    timers: heapless::Vec<Timer<T>, N>,
}

impl<T, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Scheduler<T, N> {
    pub const fn new() -> Self {
        Self {
            timers: heapless::Vec::new(),
        }
    }

    /// Register a task to run every `period`, first due one period after `now`.
    pub fn create_timer(
        &mut self,
        task: T,
        period: Duration,
        now: Instant,
    ) -> Result<TimerId, SchedulerError> {
        if period == Duration::from_ticks(0) {
            return Err(SchedulerError::ZeroPeriod);
        }
        let id = TimerId(self.timers.len());
        self.timers
            .push(Timer {
                task,
                period,
                next_due: now + period,
                paused: false,
            })
            .map_err(|_| SchedulerError::CapacityExceeded { max: N })?;
        Ok(id)
    }

    fn timer_mut(&mut self, id: TimerId) -> Result<&mut Timer<T>, SchedulerError> {
        self.timers
            .get_mut(id.index())
            .ok_or(SchedulerError::UnknownTimer { index: id.index() })
    }

    /// Stop a timer from firing until [`resume`](Self::resume) is called.
    pub fn pause(&mut self, id: TimerId) -> Result<(), SchedulerError> {
        self.timer_mut(id)?.paused = true;
        Ok(())
    }

    /// Restart a paused timer. Its next tick is one period after `now`.
    pub fn resume(&mut self, id: TimerId, now: Instant) -> Result<(), SchedulerError> {
        let timer = self.timer_mut(id)?;
        if timer.paused {
            timer.paused = false;
            timer.next_due = now + timer.period;
        }
        Ok(())
    }

    pub fn is_paused(&self, id: TimerId) -> Option<bool> {
        self.timers.get(id.index()).map(|timer| timer.paused)
    }

    pub fn task(&self, id: TimerId) -> Option<&T> {
        self.timers.get(id.index()).map(|timer| &timer.task)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Earliest deadline among running timers.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .iter()
            .filter(|timer| !timer.paused)
            .map(|timer| timer.next_due)
            .min()
    }
}

impl<T: PeriodicTask, const N: usize> Scheduler<T, N> {
    /// Run every timer that is due at `now`. Returns how many ran.
    pub fn handle<S: DisplaySink + ?Sized>(&mut self, now: Instant, sink: &mut S) -> usize {
        let mut ran = 0;
        for timer in self.timers.iter_mut() {
            if timer.paused || now < timer.next_due {
                continue;
            }
            timer.task.tick(sink);
            timer.next_due += timer.period;
            ran += 1;

            if now >= timer.next_due {
                debug!("{} is behind schedule", timer.task.name());
            }
        }
        ran
    }
}

/// Anything the dispatcher can ask to run its due work.
pub trait TaskHandler {
    /// Run whatever is due at `now` against the widget tree. Returns how many
    /// callbacks ran.
    fn run_due(&mut self, now: Instant, tree: &mut WidgetTree) -> usize;
}

impl<T: PeriodicTask, const N: usize> TaskHandler for Scheduler<T, N> {
    fn run_due(&mut self, now: Instant, tree: &mut WidgetTree) -> usize {
        self.handle(now, tree)
    }
}

/// An application without timers.
impl TaskHandler for () {
    fn run_due(&mut self, _now: Instant, _tree: &mut WidgetTree) -> usize {
        0
    }
}
