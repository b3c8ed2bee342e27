//! Station-mode Wi-Fi and the embassy-net stack

use embassy_executor::Spawner;
use embassy_net::{Runner, Stack, StackResources};
use embassy_time::{Duration, Timer};
use esp_hal::peripherals::WIFI;
use esp_radio::Controller;
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};
use glint_core::app_state::{ErrorMessage, debug_message};
use glint_core::config::InternetConfig;
use log::{info, warn};
use thiserror_no_std::Error;

use crate::mk_static;

/// Join attempts before the board gives up and runs offline
pub const WIFI_CONNECT_ATTEMPTS: u32 = 10;

const RETRY_DELAY: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Polls of the link and DHCP state before giving up (20 s)
const ADDRESS_POLLS: u32 = 40;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Radio init failed: {0}")]
    Radio(ErrorMessage),
    #[error("Could not start the network task")]
    Spawn,
    #[error("Could not join {ssid} after {attempts} attempts")]
    Join { ssid: ErrorMessage, attempts: u32 },
    #[error("No IPv4 address from DHCP")]
    NoAddress,
}

/// A joined network. Dropping the controller tears the connection down.
pub struct Network {
    pub stack: Stack<'static>,
    pub controller: WifiController<'static>,
}

/// Bring the radio up, join the configured network and wait for an address.
pub async fn start(
    spawner: Spawner,
    wifi: WIFI<'static>,
    credentials: &InternetConfig<'_>,
    seed: u64,
) -> Result<Network, NetworkError> {
    let radio = esp_radio::init().map_err(|e| NetworkError::Radio(debug_message(&e)))?;
    let radio = &*mk_static!(Controller<'static>, radio);

    let (mut controller, interfaces) = esp_radio::wifi::new(radio, wifi, Default::default())
        .map_err(|e| NetworkError::Radio(debug_message(&e)))?;

    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        mk_static!(StackResources<3>, StackResources::<3>::new()),
        seed,
    );
    spawner
        .spawn(net_task(runner))
        .map_err(|_| NetworkError::Spawn)?;

    connect(&mut controller, credentials).await?;
    wait_for_ip(stack).await?;

    Ok(Network { stack, controller })
}

async fn connect(
    controller: &mut WifiController<'static>,
    credentials: &InternetConfig<'_>,
) -> Result<(), NetworkError> {
    if !matches!(controller.is_started(), Ok(true)) {
        let client_config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(credentials.ssid.into())
                .with_password(credentials.password.into()),
        );
        controller
            .set_config(&client_config)
            .map_err(|e| NetworkError::Radio(debug_message(&e)))?;
        controller
            .start_async()
            .await
            .map_err(|e| NetworkError::Radio(debug_message(&e)))?;
        info!("WiFi started");
    }

    info!("Connecting to {}...", credentials.ssid);
    for attempt in 1..=WIFI_CONNECT_ATTEMPTS {
        match controller.connect_async().await {
            Ok(()) => {
                info!("WiFi connected");
                return Ok(());
            }
            Err(e) => {
                warn!("Join attempt {}/{} failed: {:?}", attempt, WIFI_CONNECT_ATTEMPTS, e);
                Timer::after(RETRY_DELAY).await;
            }
        }
    }

    Err(NetworkError::Join {
        ssid: glint_core::app_state::truncated(credentials.ssid),
        attempts: WIFI_CONNECT_ATTEMPTS,
    })
}

async fn wait_for_ip(stack: Stack<'static>) -> Result<(), NetworkError> {
    for _ in 0..ADDRESS_POLLS {
        if let Some(config) = stack.config_v4() {
            info!("Got IP: {}", config.address);
            return Ok(());
        }
        Timer::after(POLL_INTERVAL).await;
    }
    Err(NetworkError::NoAddress)
}

#[embassy_executor::task]
async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}
