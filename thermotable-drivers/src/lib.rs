//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in thermotable-hal and thermotable-core:
//!
//! - SD card file storage (FAT, via embedded-sdmmc)
//! - Table-calibrated thermistor sensor

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
pub mod storage;
