//! Table lookup and linear interpolation
//!
//! Temperature queries use the table's uniform spacing to compute the
//! bracketing sample directly instead of searching. Reverse queries
//! (resistance or divider voltage to temperature) scan for the bracketing
//! pair, since neither column is evenly spaced.

use crate::divider;
use crate::table::{CalibrationTable, Sample};

/// Errors from table lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LookupError {
    /// Query lies outside the calibrated range
    OutOfRange,
    /// Bracketing samples share the same input value
    DegenerateRange,
    /// Header step is zero, negative or not a number
    InvalidStep,
    /// Computed bracket lies past the loaded samples
    IndexOutOfTable,
}

/// Result of a temperature lookup
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Conversion {
    /// Interpolated thermistor resistance (ohms)
    pub resistance: f32,
    /// Divider voltage for that resistance
    pub output: f32,
}

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// Values outside the input range are extrapolated.
pub fn map_range(
    x: f32,
    in_min: f32,
    in_max: f32,
    out_min: f32,
    out_max: f32,
) -> Result<f32, LookupError> {
    if in_max == in_min {
        return Err(LookupError::DegenerateRange);
    }
    Ok((x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min)
}

/// Truncate toward zero, as the range bounds are whole degrees
fn whole_degrees(value: f32) -> f32 {
    value as i32 as f32
}

impl<const N: usize> CalibrationTable<N> {
    /// Index of the sample at or below `temperature`
    ///
    /// Fails if the temperature lies outside the header range or the header
    /// step is unusable. The index is not checked against the loaded
    /// samples.
    pub fn bracket_index(&self, temperature: f32) -> Result<usize, LookupError> {
        let header = self.header();
        let step = header.step;
        if !(step.is_finite() && step > 0.0) {
            return Err(LookupError::InvalidStep);
        }

        let min = whole_degrees(header.min_temperature);
        let max = whole_degrees(header.max_temperature);
        // Written so that NaN falls through to OutOfRange
        if !(min <= temperature && temperature <= max) {
            return Err(LookupError::OutOfRange);
        }

        // Uniform spacing from `min`: samples ahead of the query
        let position = -min / step + temperature / step;
        Ok(position as usize)
    }

    /// Interpolated resistance at `temperature`
    pub fn resistance_at(&self, temperature: f32) -> Result<f32, LookupError> {
        let index = self.bracket_index(temperature)?;
        let samples = self.samples();
        let low = samples.get(index).ok_or(LookupError::IndexOutOfTable)?;

        match samples.get(index + 1) {
            Some(high) => map_range(
                temperature,
                low.temperature,
                high.temperature,
                low.resistance,
                high.resistance,
            ),
            // Top of the table: only an exact hit has a value
            None if temperature == low.temperature => Ok(low.resistance),
            None => Err(LookupError::IndexOutOfTable),
        }
    }

    /// Resistance and divider voltage at `temperature`
    pub fn convert(&self, temperature: f32) -> Result<Conversion, LookupError> {
        let resistance = self.resistance_at(temperature)?;
        Ok(Conversion {
            resistance,
            output: divider::output_voltage(resistance),
        })
    }

    /// Divider voltage at `temperature`
    pub fn output_at(&self, temperature: f32) -> Result<f32, LookupError> {
        self.convert(temperature).map(|c| c.output)
    }

    /// Temperature at which the thermistor shows `resistance`
    pub fn temperature_at_resistance(&self, resistance: f32) -> Result<f32, LookupError> {
        self.search(resistance, |s| s.resistance)
    }

    /// Temperature at which the divider reads `volts`
    pub fn temperature_at_output(&self, volts: f32) -> Result<f32, LookupError> {
        self.search(volts, |s| divider::output_voltage(s.resistance))
    }

    /// Find the sample pair whose `key` values bracket `value` and
    /// interpolate the temperature between them
    ///
    /// Works for keys that rise or fall along the table.
    fn search(&self, value: f32, key: impl Fn(&Sample) -> f32) -> Result<f32, LookupError> {
        if !value.is_finite() {
            return Err(LookupError::OutOfRange);
        }

        let samples = self.samples();
        if let [only] = samples {
            return if key(only) == value {
                Ok(only.temperature)
            } else {
                Err(LookupError::OutOfRange)
            };
        }

        for pair in samples.windows(2) {
            let (a, b) = (key(&pair[0]), key(&pair[1]));
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

            if lo <= value && value <= hi {
                if a == b {
                    return Ok(pair[0].temperature);
                }
                return map_range(value, a, b, pair[0].temperature, pair[1].temperature);
            }
        }

        Err(LookupError::OutOfRange)
    }
}
