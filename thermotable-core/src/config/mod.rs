//! Lookup configuration
//!
//! Board-agnostic settings for locating and parsing the calibration table.
//! With the `serde` feature the configuration can be stored as postcard
//! binary data.

use heapless::String;
use thermotable_hal::SpiPins;

use crate::loader::{LoadMode, DEFAULT_DELIMITER};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum table file name length (including path)
pub const MAX_FILE_NAME_LEN: usize = 32;

/// Default table file on the card
pub const DEFAULT_TABLE_FILE: &str = "/ntc.csv";

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// File name exceeds `MAX_FILE_NAME_LEN`
    NameTooLong,
    /// File name is empty
    EmptyName,
    /// Delimiter is a line terminator
    InvalidDelimiter,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// SPI bus pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Clock pin
    pub sck: u8,
    /// Data-in pin
    pub miso: u8,
    /// Data-out pin
    pub mosi: u8,
    /// Card chip-select pin
    pub cs: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        let pins = SpiPins::default();
        Self {
            sck: pins.sck,
            miso: pins.miso,
            mosi: pins.mosi,
            cs: pins.cs,
        }
    }
}

impl From<BusConfig> for SpiPins {
    fn from(bus: BusConfig) -> Self {
        SpiPins::new(bus.sck, bus.miso, bus.mosi, bus.cs)
    }
}

/// Table lookup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LookupConfig {
    /// Table file on the card
    pub table_file: String<MAX_FILE_NAME_LEN>,
    /// Field delimiter
    pub delimiter: u8,
    /// Where the table header comes from
    pub load_mode: LoadMode,
    /// Bus carrying the card
    pub bus: BusConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        let mut table_file = String::new();
        // Fits by construction
        let _ = table_file.push_str(DEFAULT_TABLE_FILE);

        Self {
            table_file,
            delimiter: DEFAULT_DELIMITER,
            load_mode: LoadMode::default(),
            bus: BusConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Default configuration reading `name`
    pub fn with_table_file(name: &str) -> Result<Self, ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        let mut table_file = String::new();
        table_file
            .push_str(name)
            .map_err(|_| ConfigError::NameTooLong)?;

        Ok(Self {
            table_file,
            ..Self::default()
        })
    }

    /// Check the configuration for values the loader cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_file.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if matches!(self.delimiter, b'\n' | b'\r') {
            return Err(ConfigError::InvalidDelimiter);
        }
        Ok(())
    }

    /// Pins for the storage bus
    pub fn pins(&self) -> SpiPins {
        self.bus.into()
    }
}

#[cfg(feature = "serde")]
impl LookupConfig {
    /// Serialize to postcard into `buffer`, returning the used part
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize from postcard and validate
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LookupConfig::default();
        assert_eq!(config.table_file.as_str(), DEFAULT_TABLE_FILE);
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.load_mode, LoadMode::PresetHeader);
        assert!(config.validate().is_ok());
        assert_eq!(config.pins(), SpiPins::default());
    }

    #[test]
    fn test_with_table_file() {
        let config = LookupConfig::with_table_file("/cal/pt1000.csv").unwrap();
        assert_eq!(config.table_file.as_str(), "/cal/pt1000.csv");

        assert_eq!(
            LookupConfig::with_table_file(""),
            Err(ConfigError::EmptyName)
        );

        let long = "/a-very-long-directory-name/and-a-long-file.csv";
        assert_eq!(
            LookupConfig::with_table_file(long),
            Err(ConfigError::NameTooLong)
        );
    }

    #[test]
    fn test_validate_delimiter() {
        let config = LookupConfig {
            delimiter: b'\n',
            ..LookupConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDelimiter));
    }

    #[test]
    fn test_bus_pins() {
        let config = LookupConfig {
            bus: BusConfig {
                sck: 2,
                miso: 3,
                mosi: 4,
                cs: 5,
            },
            ..LookupConfig::default()
        };
        assert_eq!(config.pins(), SpiPins::new(2, 3, 4, 5));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let config = LookupConfig::with_table_file("/t.csv").unwrap();
        let mut buffer = [0u8; 64];
        let bytes = config.to_bytes(&mut buffer).unwrap();
        let decoded = LookupConfig::from_bytes(bytes).unwrap();
        assert_eq!(decoded, config);

        assert_eq!(
            LookupConfig::from_bytes(&[0xff]),
            Err(ConfigError::Deserialize)
        );
    }
}
