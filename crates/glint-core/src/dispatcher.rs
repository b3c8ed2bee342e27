//! One pass of the main loop
//!
//! The firmware and simulator loops both look like:
//!
//! ```text
//! loop {
//!     dispatcher.pass(Instant::now(), &mut app, &mut tree, &mut framebuffer)?;
//!     framebuffer.flush(&mut panel)?;
//!     Timer::after(dispatcher.idle()).await;
//! }
//! ```
//!
//! A pass runs every due timer to completion, then redraws the widget tree if
//! anything wrote to it. Nothing here sleeps; the caller owns the idle wait.

use embassy_time::{Duration, Instant};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::trace;

use crate::config::DISPATCH_IDLE;
use crate::scheduler::TaskHandler;
use crate::ui::WidgetTree;

/// What happened during one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassReport {
    /// Timers that fired
    pub ran: usize,
    /// Whether the widget tree was redrawn
    pub redrawn: bool,
}

#[derive(Debug)]
pub struct Dispatcher {
    idle: Duration,
    passes: u64,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub const fn new() -> Self {
        Self {
            idle: DISPATCH_IDLE,
            passes: 0,
        }
    }

    /// Wait between passes.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Run due timers, then redraw a dirty tree into `target`.
    pub fn pass<H, D>(
        &mut self,
        now: Instant,
        handler: &mut H,
        tree: &mut WidgetTree,
        target: &mut D,
    ) -> Result<PassReport, D::Error>
    where
        H: TaskHandler + ?Sized,
        D: DrawTarget<Color = Rgb565>,
    {
        self.passes = self.passes.wrapping_add(1);
        let ran = handler.run_due(now, tree);

        let redrawn = tree.is_dirty();
        if redrawn {
            tree.draw(target)?;
            tree.mark_clean();
        }

        if ran > 0 {
            trace!("Pass {}: {} timer(s) fired", self.passes, ran);
        }
        Ok(PassReport { ran, redrawn })
    }
}
