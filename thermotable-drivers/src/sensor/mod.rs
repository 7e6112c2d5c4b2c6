//! Temperature sensor implementations

pub mod table_thermistor;

pub use table_thermistor::{AdcReader, TableThermistor};
