//! Storage bring-up
//!
//! Configures the SPI bus and mounts the card before any table is loaded.

use thermotable_hal::{SpiConfig, SpiPins, StorageBus};

/// Errors from bringing up the storage card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountError<E> {
    /// Bus could not be configured
    Bus(E),
    /// Card did not mount
    Mount(E),
}

/// Configure the bus on `pins` and mount the card behind `pins.cs`
///
/// The mount result is returned as-is; a failed mount is an error.
pub fn init_storage<B: StorageBus>(
    bus: &mut B,
    pins: SpiPins,
    config: SpiConfig,
) -> Result<(), MountError<B::Error>> {
    if let Err(e) = bus.configure(pins, config) {
        error!("storage bus setup failed");
        return Err(MountError::Bus(e));
    }

    if let Err(e) = bus.mount(pins.cs) {
        error!("storage card mount failed on cs {}", pins.cs);
        return Err(MountError::Mount(e));
    }

    info!("storage card mounted on cs {}", pins.cs);
    Ok(())
}
