#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_time::{Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use glint_core::config::DashboardConfig;
use glint_core::dispatcher::Dispatcher;
use glint_core::framebuffer::FrameBuffer;
use glint_core::pages::Dashboard;
use glint_core::ui::WidgetTree;
use glint_firmware::app_state::{AppError, PanelPins, halt, init_panel};
use log::{error, info};

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(_spawner: Spawner) -> ! {
    rtt_target::rtt_init_log!();

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(#[esp_hal::ram(reclaimed)] size: 73744);
    // The 450 x 600 framebuffer lives in PSRAM.
    esp_alloc::psram_allocator!(peripherals.PSRAM, esp_hal::psram);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let pins = PanelPins {
        spi: peripherals.SPI2,
        sck: peripherals.GPIO15,
        cs: peripherals.GPIO11,
        sio0: peripherals.GPIO14,
        sio1: peripherals.GPIO10,
        sio2: peripherals.GPIO16,
        sio3: peripherals.GPIO12,
        reset: peripherals.GPIO13,
        power: peripherals.GPIO9,
    };
    let (mut panel, _power) = match init_panel(pins) {
        Ok(panel) => panel,
        Err(e) => halt(&e).await,
    };

    let mut tree = WidgetTree::new();
    let mut dashboard =
        match Dashboard::build(&mut tree, &DashboardConfig::default(), Instant::now()) {
            Ok(dashboard) => dashboard,
            Err(e) => halt(&AppError::from(e)).await,
        };

    let mut framebuffer = FrameBuffer::new();
    let mut dispatcher = Dispatcher::new();
    info!("Dashboard running");

    loop {
        // Drawing into the framebuffer cannot fail.
        let _ = dispatcher.pass(Instant::now(), &mut dashboard, &mut tree, &mut framebuffer);
        if let Err(e) = framebuffer.flush(&mut panel) {
            error!("Panel flush failed: {}", e);
        }
        Timer::after(dispatcher.idle()).await;
    }
}
