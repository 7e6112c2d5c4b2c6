//! Temperature sensor trait

use crate::interpolate::LookupError;

/// Errors that can occur with temperature sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor disconnected (open circuit)
    OpenCircuit,
    /// Sensor shorted to ground
    ShortCircuit,
    /// Reading outside the calibration table
    OutOfRange,
    /// ADC conversion error
    ConversionError,
    /// Calibration table cannot answer the query
    BadTable,
}

impl From<LookupError> for SensorError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::OutOfRange => SensorError::OutOfRange,
            LookupError::DegenerateRange
            | LookupError::InvalidStep
            | LookupError::IndexOutOfTable => SensorError::BadTable,
        }
    }
}

/// Trait for temperature sensors
///
/// Implementations handle the specific sensor type and its calibration.
pub trait TemperatureSensor {
    /// Read the current temperature in degrees Celsius
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read_celsius(&mut self) -> Result<f32, SensorError>;

    /// Read the current temperature with 0.1°C resolution
    ///
    /// For example, 45.5°C is returned as 455. Rounds half away from zero.
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let t = self.read_celsius()? * 10.0;
        let rounded = if t < 0.0 { t - 0.5 } else { t + 0.5 };
        Ok(rounded as i16)
    }

    /// Check if the sensor reading is valid
    fn is_valid(&mut self) -> bool {
        self.read_celsius().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSensor(Result<f32, SensorError>);

    impl TemperatureSensor for FixedSensor {
        fn read_celsius(&mut self) -> Result<f32, SensorError> {
            self.0
        }
    }

    #[test]
    fn test_x10_rounding() {
        assert_eq!(FixedSensor(Ok(45.54)).read_celsius_x10(), Ok(455));
        assert_eq!(FixedSensor(Ok(45.56)).read_celsius_x10(), Ok(456));
        assert_eq!(FixedSensor(Ok(-12.36)).read_celsius_x10(), Ok(-124));
    }

    #[test]
    fn test_errors_pass_through() {
        let mut sensor = FixedSensor(Err(SensorError::OpenCircuit));
        assert_eq!(sensor.read_celsius_x10(), Err(SensorError::OpenCircuit));
        assert!(!sensor.is_valid());
    }

    #[test]
    fn test_lookup_error_mapping() {
        assert_eq!(
            SensorError::from(LookupError::OutOfRange),
            SensorError::OutOfRange
        );
        assert_eq!(
            SensorError::from(LookupError::DegenerateRange),
            SensorError::BadTable
        );
    }
}
