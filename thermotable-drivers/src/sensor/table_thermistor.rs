//! Table-calibrated thermistor
//!
//! Reads a thermistor through an ADC and converts the reading to a
//! temperature using a calibration table loaded from the card. Works for
//! NTC and PTC parts alike, since the table lookup does not assume a
//! direction.

use thermotable_core::traits::{SensorError, TemperatureSensor};
use thermotable_core::CalibrationTable;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Thermistor in a pull-up divider, calibrated by a table
///
/// Circuit: VCC -- pullup -- ADC_PIN -- thermistor -- GND
pub struct TableThermistor<'t, ADC, const N: usize> {
    adc: ADC,
    table: &'t CalibrationTable<N>,
    /// Pull-up resistor value in ohms
    pullup_ohms: u32,
    /// ADC full-scale count (4096 for 12-bit)
    adc_max: u16,
}

impl<'t, ADC, const N: usize> TableThermistor<'t, ADC, N> {
    /// Create a new sensor with a 12-bit ADC
    ///
    /// # Arguments
    /// - `adc`: ADC channel for reading the thermistor
    /// - `table`: loaded calibration table
    /// - `pullup_ohms`: pull-up resistor value
    pub fn new(adc: ADC, table: &'t CalibrationTable<N>, pullup_ohms: u32) -> Self {
        Self {
            adc,
            table,
            pullup_ohms,
            adc_max: 4096,
        }
    }

    /// Use a different ADC resolution
    pub fn with_adc_bits(mut self, bits: u8) -> Self {
        self.adc_max = 1u16 << bits.min(15);
        self
    }

    /// Calibration table in use
    pub fn table(&self) -> &CalibrationTable<N> {
        self.table
    }

    /// Convert ADC reading to resistance
    ///
    /// R = R_pullup * adc / (adc_max - adc)
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<f32, SensorError> {
        // Open circuit pulls the pin to the rail
        if adc_value >= self.adc_max.saturating_sub(10) {
            return Err(SensorError::OpenCircuit);
        }

        if adc_value < 10 {
            return Err(SensorError::ShortCircuit);
        }

        let numerator = self.pullup_ohms as f32 * adc_value as f32;
        let denominator = (self.adc_max - adc_value) as f32;

        Ok(numerator / denominator)
    }
}

impl<ADC: AdcReader, const N: usize> TemperatureSensor for TableThermistor<'_, ADC, N> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let adc_value = self.adc.read().map_err(|_| SensorError::ConversionError)?;

        let resistance = self.adc_to_resistance(adc_value)?;

        Ok(self.table.temperature_at_resistance(resistance)?)
    }
}

/// Dummy ADC for testing (returns a fixed value)
#[cfg(test)]
pub struct DummyAdc(pub Result<u16, ()>);

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermotable_core::{Sample, TableHeader};

    /// 10K NTC, B=3950, 0°C to 50°C
    fn ntc10k() -> CalibrationTable<8> {
        let mut table = CalibrationTable::new(TableHeader::new(10.0, 0.0, 50.0));
        let points = [
            (0.0, 32_650.0),
            (10.0, 19_900.0),
            (20.0, 12_490.0),
            (30.0, 8_057.0),
            (40.0, 5_327.0),
            (50.0, 3_603.0),
        ];
        for (i, (t, r)) in points.into_iter().enumerate() {
            table.write(i, Sample::new(t, r)).unwrap();
        }
        table
    }

    #[test]
    fn test_adc_to_resistance() {
        let table = ntc10k();
        let sensor = TableThermistor::new(DummyAdc(Ok(0)), &table, 10_000);

        // Mid-scale: thermistor equals pull-up
        let r = sensor.adc_to_resistance(2048).unwrap();
        assert!((r - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn test_open_and_short_circuit() {
        let table = ntc10k();
        let sensor = TableThermistor::new(DummyAdc(Ok(0)), &table, 10_000);

        assert!(matches!(
            sensor.adc_to_resistance(4095),
            Err(SensorError::OpenCircuit)
        ));
        assert!(matches!(
            sensor.adc_to_resistance(0),
            Err(SensorError::ShortCircuit)
        ));
    }

    #[test]
    fn test_read_celsius() {
        let table = ntc10k();
        // 12490 ohms against a 10K pull-up: adc = 4096 * 12490 / 22490 ≈ 2275
        let mut sensor = TableThermistor::new(DummyAdc(Ok(2275)), &table, 10_000);

        let t = sensor.read_celsius().unwrap();
        assert!((t - 20.0).abs() < 0.2);
        assert_eq!(sensor.read_celsius_x10().map(|t| (t - 200).abs() <= 2), Ok(true));
    }

    #[test]
    fn test_out_of_table() {
        let table = ntc10k();
        // ~1K ohms is far hotter than the table covers
        let mut sensor = TableThermistor::new(DummyAdc(Ok(372)), &table, 10_000);
        assert_eq!(sensor.read_celsius(), Err(SensorError::OutOfRange));
    }

    #[test]
    fn test_adc_failure() {
        let table = ntc10k();
        let mut sensor = TableThermistor::new(DummyAdc(Err(())), &table, 10_000);
        assert_eq!(sensor.read_celsius(), Err(SensorError::ConversionError));
        assert!(!sensor.is_valid());
    }

    #[test]
    fn test_adc_bits() {
        let table = ntc10k();
        let sensor = TableThermistor::new(DummyAdc(Ok(0)), &table, 10_000).with_adc_bits(10);
        let r = sensor.adc_to_resistance(512).unwrap();
        assert!((r - 10_000.0).abs() < 1.0);
    }
}
