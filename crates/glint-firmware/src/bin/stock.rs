#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use embassy_executor::Spawner;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_time::{Instant, Timer};
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use glint_core::dispatcher::Dispatcher;
use glint_core::framebuffer::FrameBuffer;
use glint_core::pages::StockBoard;
use glint_core::quotes::QuoteError;
use glint_core::ui::WidgetTree;
use glint_firmware::app_state::{PanelPins, halt, init_panel};
use glint_firmware::https::{HttpsBuffers, HttpsTransport, TCP_RX_SIZE, TCP_SOCKETS, TCP_TX_SIZE};
use glint_firmware::{mk_static, secrets, wifi};
use log::{error, info, warn};
use static_cell::ConstStaticCell;

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    rtt_target::rprintln!("PANIC: {}", info);
    loop {}
}

extern crate alloc;

// This creates a default app-descriptor required by the esp-idf bootloader.
esp_bootloader_esp_idf::esp_app_desc!();

/// TLS and response buffers, too large for the task stack.
static HTTPS_BUFFERS: ConstStaticCell<HttpsBuffers> = ConstStaticCell::new(HttpsBuffers::new());

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
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
    let mut board = StockBoard::build(&mut tree);
    let mut framebuffer = FrameBuffer::new();
    let mut dispatcher = Dispatcher::new();

    // Show the empty layout while the network comes up.
    let _ = dispatcher.pass(Instant::now(), &mut (), &mut tree, &mut framebuffer);
    if let Err(e) = framebuffer.flush(&mut panel) {
        error!("Panel flush failed: {}", e);
    }

    let app_config = secrets::config();
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // The single fetch happens before the loop starts.
    match wifi::start(spawner, peripherals.WIFI, &app_config.internet, seed).await {
        Ok(network) => {
            let tcp_state = mk_static!(
                TcpClientState<TCP_SOCKETS, TCP_TX_SIZE, TCP_RX_SIZE>,
                TcpClientState::new()
            );
            let tcp_client = TcpClient::new(network.stack, tcp_state);
            let dns_socket = DnsSocket::new(network.stack);
            let buffers = HTTPS_BUFFERS.take();
            let mut transport =
                HttpsTransport::new(network.stack, &tcp_client, &dns_socket, buffers, seed);

            info!("Fetching {}", app_config.quotes.symbol);
            if board
                .refresh(&mut transport, &app_config.quotes, &mut tree)
                .await
                .is_ok()
            {
                let summary = board.render_chart(&mut tree);
                info!("Chart drawn with {} primitives", summary.primitives);
            }

            // Keep the association up for the lifetime of the board.
            let _ = mk_static!(wifi::Network, network);
        }
        Err(e) => {
            error!("{}", e);
            warn!("Quote update skipped: {}", QuoteError::NetworkUnavailable);
        }
    }

    info!("Stock board running");
    loop {
        let _ = dispatcher.pass(Instant::now(), &mut (), &mut tree, &mut framebuffer);
        if let Err(e) = framebuffer.flush(&mut panel) {
            error!("Panel flush failed: {}", e);
        }
        Timer::after(dispatcher.idle()).await;
    }
}
