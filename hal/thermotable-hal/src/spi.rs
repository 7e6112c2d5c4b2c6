//! SPI bus abstractions
//!
//! The storage card sits on a four-wire synchronous serial bus. Bringing
//! it up is a two-step affair: route the bus to the given pins, then
//! mount the card behind a chip-select line.

/// Pin assignment for a four-wire SPI bus
///
/// Pin numbers are the board's GPIO numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    /// Serial clock
    pub sck: u8,
    /// Data in (card to controller)
    pub miso: u8,
    /// Data out (controller to card)
    pub mosi: u8,
    /// Chip select for the storage card
    pub cs: u8,
}

impl SpiPins {
    /// Create a pin assignment
    pub const fn new(sck: u8, miso: u8, mosi: u8, cs: u8) -> Self {
        Self {
            sck,
            miso,
            mosi,
            cs,
        }
    }
}

impl Default for SpiPins {
    /// VSPI defaults on ESP32-class boards
    fn default() -> Self {
        Self::new(18, 19, 23, 5)
    }
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    /// SD cards must be initialised at or below 400 kHz in mode 0
    fn default() -> Self {
        Self {
            frequency: 400_000,
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        }
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// Bus that carries a removable storage card
///
/// Implemented by chip-specific glue. `configure` routes the peripheral to
/// the pins; `mount` brings the card up behind `cs` and activates its
/// filesystem.
pub trait StorageBus {
    /// Error type for bus and mount operations
    type Error;

    /// Route the SPI peripheral to the given pins
    fn configure(&mut self, pins: SpiPins, config: SpiConfig) -> Result<(), Self::Error>;

    /// Mount the storage medium behind the given chip-select line
    fn mount(&mut self, cs: u8) -> Result<(), Self::Error>;
}
