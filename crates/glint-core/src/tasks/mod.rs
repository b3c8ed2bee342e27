// src/tasks/mod.rs
//! Periodic dashboard tasks and their type-erased wrapper.
//!
//! Each task owns a small piece of state and, on every tick, samples toggles
//! and writes values through a [`DisplaySink`]. The scheduler stores tasks as
//! [`DashboardTask`] so the timer table needs no trait objects.

pub mod countdown;
pub mod level_ramp;
pub mod sweep;

pub use countdown::{CountdownMode, CountdownSelector, CountdownWidgets, format_mm_ss};
pub use level_ramp::LevelRamp;
pub use sweep::{IdleBehavior, Sweep, SweepConfig};

use crate::display_sink::DisplaySink;

// ---------------------------------------------------------------------------
// PeriodicTask trait
// ---------------------------------------------------------------------------

/// A callback the scheduler runs once per period.
pub trait PeriodicTask {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Advance the task's state by one period and publish it.
    fn tick<S: DisplaySink + ?Sized>(&mut self, sink: &mut S);
}

// ---------------------------------------------------------------------------
// DashboardTask
// ---------------------------------------------------------------------------

/// Enum-based wrapper over the concrete dashboard tasks.
///
/// When adding a new task, add a variant here and extend the delegation in
/// the [`PeriodicTask`] impl below.
#[derive(Debug)]
pub enum DashboardTask {
    LevelRamp(LevelRamp),
    Sweep(Sweep),
    Countdown(CountdownSelector),
}

impl PeriodicTask for DashboardTask {
    fn name(&self) -> &'static str {
        match self {
            DashboardTask::LevelRamp(task) => task.name(),
            DashboardTask::Sweep(task) => task.name(),
            DashboardTask::Countdown(task) => task.name(),
        }
    }

    fn tick<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        match self {
            DashboardTask::LevelRamp(task) => task.tick(sink),
            DashboardTask::Sweep(task) => task.tick(sink),
            DashboardTask::Countdown(task) => task.tick(sink),
        }
    }
}

impl From<LevelRamp> for DashboardTask {
    fn from(task: LevelRamp) -> Self {
        DashboardTask::LevelRamp(task)
    }
}

impl From<Sweep> for DashboardTask {
    fn from(task: Sweep) -> Self {
        DashboardTask::Sweep(task)
    }
}

impl From<CountdownSelector> for DashboardTask {
    fn from(task: CountdownSelector) -> Self {
        DashboardTask::Countdown(task)
    }
}
