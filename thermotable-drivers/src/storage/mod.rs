//! File storage implementations

pub mod sdcard;

pub use sdcard::{FixedTimeSource, SdCardFile, SdCardStorage};
