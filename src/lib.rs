pub mod config;
pub mod device;
pub mod input;
pub mod keymap;
pub mod lighting;
pub mod replay;

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use config::Config;
use device::DeviceManager;
use input::InputHandler;

const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Main application struct
pub struct App {
    config: Config,
    device: Option<DeviceManager>,
    input: InputHandler,
}

impl App {
    /// Create a new application instance
    pub async fn new(config: Config) -> Result<Self> {
        let device = match DeviceManager::connect().await {
            Ok(d) => {
                info!("Connected to device");
                Some(d)
            }
            Err(e) => {
                error!("Failed to connect to device: {}", e);
                None
            }
        };

        let input = InputHandler::new(&config)?;

        Ok(Self {
            config,
            device,
            input,
        })
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        self.wake_device().await;
        self.run_main_loop().await
    }

    /// Keep-alive plus initial brightness after (re)connecting
    async fn wake_device(&self) {
        let Some(device) = self.device.as_ref() else {
            return;
        };

        if let Err(e) = device.keep_alive().await {
            warn!("Keep-alive failed: {}", e);
        }

        let brightness = if self.config.device.mirror_lighting {
            self.input.lighting().panel_brightness()
        } else {
            self.config.device.brightness
        };
        if let Err(e) = device.set_brightness(brightness).await {
            warn!("Set brightness failed: {}", e);
        }
    }

    async fn run_main_loop(&mut self) -> Result<()> {
        info!("Running - keycodes will be sent to the focused window");

        let mut last_keepalive = Instant::now();
        let keepalive_interval = Duration::from_secs(self.config.device.keepalive_secs.max(1));

        loop {
            let event = if let Some(ref mut device) = self.device {
                if last_keepalive.elapsed() >= keepalive_interval {
                    if let Err(e) = device.keep_alive().await {
                        warn!("Keep-alive failed: {}", e);
                    }
                    last_keepalive = Instant::now();
                }

                match device.poll_event().await {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("{}, will try to reconnect...", e);
                        self.device = None;
                        None
                    }
                }
            } else {
                None
            };

            match event {
                Some(event) => self.input.handle_event(event),
                None => self.input.tick(),
            }

            self.sync_brightness().await;

            if self.device.is_none() {
                tokio::time::sleep(RECONNECT_INTERVAL).await;
                if let Ok(d) = DeviceManager::connect().await {
                    info!("Reconnected to device");
                    self.device = Some(d);
                    self.wake_device().await;
                }
            }
        }
    }

    /// Push lighting changes to the panel backlight
    async fn sync_brightness(&mut self) {
        let Some(brightness) = self.input.take_panel_brightness() else {
            return;
        };
        if let Some(device) = self.device.as_ref() {
            if let Err(e) = device.set_brightness(brightness).await {
                warn!("Set brightness failed: {}", e);
            }
        }
    }

    /// Graceful shutdown
    pub async fn shutdown(&mut self) {
        info!("Shutting down bigknob...");

        if let Some(device) = self.device.take() {
            device.disconnect().await;
        }

        info!("Shutdown complete");
    }
}
