use anyhow::{anyhow, Result};
use mirajazz::{
    device::{list_devices, Device},
    types::DeviceInput,
};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::protocol::*;

/// Input events from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ButtonDown(u8),
    ButtonUp(u8),
    EncoderRotate { encoder: u8, direction: i8 },
}

/// Device information
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub name: String,
    pub serial_number: String,
}

/// Manages connection to the AJAZZ AKP05E / Mirabox N4
pub struct DeviceManager {
    device: Device,
    /// Buttons currently down, in press order
    held: Vec<u8>,
}

impl DeviceManager {
    /// Find and return device info without connecting
    pub async fn find_device() -> Result<DeviceInfo> {
        let devices = list_devices(&[VENDOR_ID])
            .await
            .map_err(|e| anyhow!("Failed to enumerate devices: {}", e))?;

        devices
            .into_iter()
            .find(|(vid, pid, _)| *vid == VENDOR_ID && *pid == PRODUCT_ID)
            .map(|(_, _, serial)| DeviceInfo {
                name: "AJAZZ AKP05E".to_string(),
                serial_number: serial,
            })
            .ok_or_else(|| anyhow!("No compatible device found"))
    }

    /// Connect to the device
    pub async fn connect() -> Result<Self> {
        info!("Connecting to device...");

        let serial = Self::find_device().await?.serial_number;
        info!("Found device with serial: {}", serial);

        // N4/AKP05E: v2 protocol, supports both states
        let device = Device::connect(
            VENDOR_ID,
            PRODUCT_ID,
            serial,
            true, // is_v2 (1024-byte packets)
            true, // supports_both_states
            BUTTON_COUNT as usize,
            ENCODER_COUNT as usize,
        )
        .await
        .map_err(|e| anyhow!("Failed to connect to device: {}", e))?;

        info!("Connected to device");

        Ok(Self {
            device,
            held: Vec::new(),
        })
    }

    /// Send keep-alive to prevent device timeout
    pub async fn keep_alive(&self) -> Result<()> {
        self.device
            .keep_alive()
            .await
            .map_err(|e| anyhow!("Failed to send keep-alive: {}", e))
    }

    /// Set panel brightness (0-100)
    pub async fn set_brightness(&self, percent: u8) -> Result<()> {
        let percent = percent.min(100);
        debug!("Setting brightness to {}%", percent);
        self.device
            .set_brightness(percent)
            .await
            .map_err(|e| anyhow!("Failed to set brightness: {}", e))
    }

    /// Input processing function for mirajazz
    ///
    /// - event_type (data[9]): action identifier, see [`super::protocol`]
    /// - state (data[10]): 0x00 = release, non-zero = press
    fn process_input(
        event_type: u8,
        state: u8,
    ) -> Result<DeviceInput, mirajazz::error::MirajazzError> {
        debug!("HID: type=0x{:02x}, state=0x{:02x}", event_type, state);

        if let Some((encoder, direction)) = rotation_for_event(event_type) {
            let mut directions = vec![0i8; ENCODER_COUNT as usize];
            directions[encoder] = direction;
            return Ok(DeviceInput::EncoderTwist(directions));
        }

        match event_type {
            // Square buttons (IDs 1-10 → device buttons 0-9)
            0x01..=0x0a => {
                let mut buttons = vec![false; BUTTON_COUNT as usize];
                buttons[(event_type - 1) as usize] = state != 0;
                Ok(DeviceInput::ButtonStateChange(buttons))
            }

            // Knob presses, strip keys and swipes are not part of the keymap
            0x33 | 0x35 | 0x36 | 0x37 | 0x40..=0x43 => {
                debug!("Ignoring HID event 0x{:02x}", event_type);
                Ok(DeviceInput::NoData)
            }

            // Null/empty events (noise or padding)
            0x00 => Ok(DeviceInput::NoData),

            _ => {
                info!(
                    "Unknown HID event: type=0x{:02x}, state=0x{:02x}",
                    event_type, state
                );
                Ok(DeviceInput::NoData)
            }
        }
    }

    /// Poll for input events (1ms timeout so the tap-dance clock keeps ticking)
    pub async fn poll_event(&mut self) -> Result<Option<InputEvent>> {
        let timeout = Duration::from_millis(1);

        match self
            .device
            .read_input(Some(timeout), Self::process_input)
            .await
        {
            Ok(DeviceInput::ButtonStateChange(states)) => Ok(self.button_edge(&states)),
            Ok(DeviceInput::EncoderTwist(directions)) => Ok(directions
                .iter()
                .enumerate()
                .find(|(_, &dir)| dir != 0)
                .map(|(i, &dir)| InputEvent::EncoderRotate {
                    encoder: i as u8,
                    direction: dir,
                })),
            Ok(_) => Ok(None),
            Err(e) => {
                let error_str = format!("{}", e);
                if error_str.contains("Disconnected") {
                    warn!("Device disconnected");
                    return Err(anyhow!("Device disconnected"));
                }
                warn!("Error reading device input: {}", e);
                Ok(None)
            }
        }
    }

    /// Turn a button report into a press/release edge.
    ///
    /// A press report marks only the pressed button; a release report is all
    /// false. Releases are matched to the most recently pressed button that
    /// is still down.
    fn button_edge(&mut self, states: &[bool]) -> Option<InputEvent> {
        match states.iter().position(|&pressed| pressed) {
            Some(i) => {
                let button = i as u8;
                if self.held.contains(&button) {
                    return None;
                }
                self.held.push(button);
                Some(InputEvent::ButtonDown(button))
            }
            None => self.held.pop().map(InputEvent::ButtonUp),
        }
    }

    /// Disconnect from device gracefully
    pub async fn disconnect(self) {
        info!("Disconnecting from device...");
        // Dropping the device releases the HID connection
        drop(self.device);
        info!("Device disconnected");
    }
}
