//! Board-agnostic core logic for thermistor calibration tables
//!
//! This crate contains everything that does not depend on a specific
//! board or storage card driver:
//!
//! - Calibration table model (header + bounded sample buffer)
//! - Line-oriented table loader over any [`FileStorage`]
//! - Bracket lookup and linear interpolation
//! - The fixed sensor divider transfer function
//! - Storage bus bring-up
//! - Configuration and sensor traits
//!
//! [`FileStorage`]: thermotable_hal::FileStorage

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go first so the logging macros are visible to every module.
mod fmt;

pub mod config;
pub mod divider;
pub mod interpolate;
pub mod loader;
pub mod storage;
pub mod table;
pub mod traits;

pub use interpolate::{map_range, Conversion, LookupError};
pub use loader::{LoadError, LoadMode, LoadReport, TableLoader};
pub use storage::{init_storage, MountError};
pub use table::{CalibrationTable, Sample, TableError, TableHeader, MAX_READINGS, MAX_SAMPLES};
