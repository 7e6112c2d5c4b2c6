//! Thermotable Hardware Abstraction Layer
//!
//! This crate defines the traits the table loader needs from the board:
//! a four-wire SPI bus that can mount a storage card, and a file store
//! that hands out sequential readers over named files.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (thermotable-core, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermotable-hal (this crate - traits)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  SD card      │       │  in-memory    │
//! │  (drivers)    │       │  (tests)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`spi::StorageBus`] - Bus bring-up and card mount
//! - [`storage::FileStorage`], [`storage::FileReader`] - Named file access

#![no_std]
#![deny(unsafe_code)]

pub mod spi;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use spi::{SpiConfig, SpiPins, StorageBus};
pub use storage::{FileReader, FileStorage};
