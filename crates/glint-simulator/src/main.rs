//! Desktop simulator for the glint dashboard and stock board.
//!
//! Runs the same widget tree, scheduler and dispatcher as the firmware in an
//! SDL2 window via `embedded-graphics-simulator`. The stock board reads a
//! canned quote response from `fixtures/` instead of the network.
//!
//! ```text
//! glint-simulator [dashboard|stock]
//! ```
//!
//! # Key bindings
//!
//! | Key | Action                                  |
//! |-----|-----------------------------------------|
//! | R   | Stock board: fetch again and redraw chart |
//! | C   | Stock board: clear the chart            |
//! | N   | Stock board: toggle simulated network   |
//! | Q   | Quit                                    |
//!
//! Mouse clicks are forwarded as touch events.

use std::time::{Duration as StdDuration, Instant as StdInstant};

use embassy_futures::block_on;
use embassy_time::Instant;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info};

use glint_core::bootstrap::{PanelDriver, Rotation, bring_up};
use glint_core::config::{DashboardConfig, QuoteConfig};
use glint_core::dispatcher::Dispatcher;
use glint_core::framebuffer::FrameBuffer;
use glint_core::pages::{Dashboard, StockBoard};
use glint_core::quotes::{HttpResponse, QuoteTransport, TransportError};
use glint_core::scheduler::TaskHandler;
use glint_core::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX, TouchEvent, TouchPoint, WidgetTree};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window. The panel is taller than
/// most laptop screens at 2x.
const WINDOW_SCALE: u32 = 1;

/// Minimum time between window refreshes (~30 FPS).
const FRAME_DURATION: StdDuration = StdDuration::from_millis(33);

/// Canned `TIME_SERIES_DAILY` response served by [`FixtureTransport`].
const DAILY_FIXTURE: &str = include_str!("../fixtures/tsla_daily.json");

// ---------------------------------------------------------------------------
// Simulated hardware
// ---------------------------------------------------------------------------

/// Stands in for the AMOLED controller; the SDL window needs no setup.
struct SimulatedPanel;

impl PanelDriver for SimulatedPanel {
    type Error = core::convert::Infallible;

    fn init(&mut self) -> Result<(), Self::Error> {
        info!(
            "Simulated panel {}x{}",
            DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX
        );
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Self::Error> {
        info!("Simulated panel rotation {:?} (ignored)", rotation);
        Ok(())
    }
}

/// Serves the fixture for every request while "online".
struct FixtureTransport {
    online: bool,
}

impl QuoteTransport for FixtureTransport {
    fn is_connected(&self) -> bool {
        self.online
    }

    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        info!("GET {}", url);
        Ok(HttpResponse::new(200, DAILY_FIXTURE))
    }
}

// ---------------------------------------------------------------------------
// Applications
// ---------------------------------------------------------------------------

/// The application selected on the command line.
enum App {
    Dashboard(Box<Dashboard>),
    Stock(Box<StockBoard>),
}

impl TaskHandler for App {
    fn run_due(&mut self, now: Instant, tree: &mut WidgetTree) -> usize {
        match self {
            App::Dashboard(dashboard) => dashboard.run_due(now, tree),
            // The stock board only changes on a fetch.
            App::Stock(_) => 0,
        }
    }
}

fn build_app(mode: &str, tree: &mut WidgetTree, transport: &mut FixtureTransport) -> Option<App> {
    match mode {
        "dashboard" => match Dashboard::build(tree, &DashboardConfig::default(), Instant::now()) {
            Ok(dashboard) => Some(App::Dashboard(Box::new(dashboard))),
            Err(e) => {
                error!("Dashboard setup failed: {}", e);
                None
            }
        },
        "stock" => {
            let mut board = StockBoard::build(tree);
            refresh_stock(&mut board, transport, tree);
            Some(App::Stock(Box::new(board)))
        }
        other => {
            error!("Unknown mode {:?}; expected \"dashboard\" or \"stock\"", other);
            None
        }
    }
}

/// Fetch once and, if that worked, redraw the chart.
fn refresh_stock(board: &mut StockBoard, transport: &mut FixtureTransport, tree: &mut WidgetTree) {
    let config = QuoteConfig::default();
    if block_on(board.refresh(transport, &config, tree)).is_ok() {
        let summary = board.render_chart(tree);
        info!(
            "Chart: {} primitives, range {:.2}..{:.2}",
            summary.primitives, summary.scale.min, summary.scale.max
        );
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let mode = std::env::args().nth(1).unwrap_or_else(|| "dashboard".into());
    info!("Starting glint simulator ({})", mode);
    info!("Keys: R=Refetch  C=Clear chart  N=Toggle network  Q=Quit");

    if let Err(e) = bring_up(&mut SimulatedPanel, Rotation::default()) {
        error!("{}", e);
        return;
    }

    let mut display = SimulatorDisplay::<Rgb565>::new(Size::new(
        DISPLAY_WIDTH_PX as u32,
        DISPLAY_HEIGHT_PX as u32,
    ));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("glint", &output_settings);

    let mut tree = WidgetTree::new();
    let mut transport = FixtureTransport { online: true };
    let Some(mut app) = build_app(&mode, &mut tree, &mut transport) else {
        return;
    };

    let mut framebuffer = FrameBuffer::new();
    let mut dispatcher = Dispatcher::new();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    let _ = display.clear(Rgb565::BLACK);
    window.update(&display);
    let mut last_frame = StdInstant::now();

    'running: loop {
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match (keycode, &mut app) {
                    (Keycode::Q | Keycode::Escape, _) => break 'running,
                    (Keycode::R, App::Stock(board)) => {
                        refresh_stock(board, &mut transport, &mut tree);
                    }
                    (Keycode::C, App::Stock(board)) => board.clear_chart(&mut tree),
                    (Keycode::N, App::Stock(_)) => {
                        transport.online = !transport.online;
                        info!("Network {}", if transport.online { "up" } else { "down" });
                    }
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let touch = TouchEvent::Press(TouchPoint::new(
                        point.x.max(0) as u16,
                        point.y.max(0) as u16,
                    ));
                    if let Some(id) = tree.handle_touch(touch) {
                        info!("Touch toggled widget {}", id);
                    }
                }

                _ => {}
            }
        }

        // Drawing into the framebuffer is infallible.
        let _ = dispatcher.pass(Instant::now(), &mut app, &mut tree, &mut framebuffer);

        if last_frame.elapsed() >= FRAME_DURATION {
            if framebuffer.dirty_area().is_some() {
                let _ = framebuffer.flush(&mut display);
            }
            window.update(&display);
            last_frame = StdInstant::now();
        }

        let idle = dispatcher.idle();
        std::thread::sleep(StdDuration::from_micros(idle.as_micros()));
    }

    info!("Simulator exiting after {} passes", dispatcher.passes());
}
