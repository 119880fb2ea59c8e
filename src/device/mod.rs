mod manager;
mod protocol;

pub use manager::{DeviceInfo, DeviceManager, InputEvent};
pub use protocol::*;
