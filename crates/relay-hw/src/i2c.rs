//! Relay bus access through `/dev/i2c-*`

use linux_embedded_hal::{Delay, I2cdev};
use relay_protocol::RelayController;
use tracing::info;

use crate::error::HwError;

/// Relay controller on a Linux I2C character device
///
/// [`Delay`] sleeps the calling thread, so the settle wait never returns
/// early.
pub type LinuxRelay = RelayController<I2cdev, Delay>;

/// Open the relay board at `address` on the bus at `path`
pub fn open_relay(path: &str, address: u8) -> Result<LinuxRelay, HwError> {
    let i2c = I2cdev::new(path).map_err(|e| HwError::I2cOpen {
        path: path.to_string(),
        reason: e.to_string(),
    })?;

    info!("Opened relay board at 0x{:02X} on {}", address, path);
    Ok(RelayController::new_with_address(i2c, Delay, address))
}
