//! Hardware abstraction traits
//!
//! These traits define the interface between table lookups and the
//! sensors that use them.

pub mod sensor;

pub use sensor::{SensorError, TemperatureSensor};
