//! Calibration table model
//!
//! A calibration table pairs temperature samples with the thermistor
//! resistance measured at each of them. On the card the table is a
//! two-column text file whose first two rows carry metadata rather than
//! samples; in memory that metadata lives in a [`TableHeader`] and only the
//! real samples are kept in the bounded sample buffer.
//!
//! Flat layout (column index on the left):
//!
//! ```text
//!        temperature        resistance
//! [0]    temperature step   step
//! [1]    min temperature    max temperature
//! [2..]  samples            samples
//! ```

use heapless::Vec;

/// Maximum number of rows in a table file, header rows included
pub const MAX_READINGS: usize = 400;

/// Number of leading rows reserved for the header
pub const HEADER_SLOTS: usize = 2;

/// Maximum number of samples a table holds
pub const MAX_SAMPLES: usize = MAX_READINGS - HEADER_SLOTS;

/// Errors from building or writing a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    /// Column slices have different lengths
    LengthMismatch,
    /// Columns are shorter than the two header rows
    MissingHeader,
    /// Sample buffer is full
    Full,
}

/// One calibration point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Temperature in °C
    pub temperature: f32,
    /// Thermistor resistance in ohms
    pub resistance: f32,
}

impl Sample {
    /// Create a new sample
    pub const fn new(temperature: f32, resistance: f32) -> Self {
        Self {
            temperature,
            resistance,
        }
    }
}

/// Table metadata
///
/// The range bounds are stored asymmetrically in the flat layout: the
/// minimum sits in the temperature column, the maximum in the resistance
/// column. Lookups only rely on `step`, `min_temperature` and
/// `max_temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TableHeader {
    /// Uniform temperature spacing between samples (resistance column, row 0)
    pub step: f32,
    /// Row 0 of the temperature column, carried for round-tripping
    pub temperature_step: f32,
    /// Lowest temperature covered (temperature column, row 1)
    pub min_temperature: f32,
    /// Highest temperature covered (resistance column, row 1)
    pub max_temperature: f32,
}

impl TableHeader {
    /// Create a header with the same step in both columns
    pub const fn new(step: f32, min_temperature: f32, max_temperature: f32) -> Self {
        Self {
            step,
            temperature_step: step,
            min_temperature,
            max_temperature,
        }
    }

    /// Set a header row from a flat `(temperature, resistance)` pair
    ///
    /// Rows past the header are ignored.
    pub fn set_row(&mut self, row: usize, temperature: f32, resistance: f32) {
        match row {
            0 => {
                self.temperature_step = temperature;
                self.step = resistance;
            }
            1 => {
                self.min_temperature = temperature;
                self.max_temperature = resistance;
            }
            _ => {}
        }
    }

    /// Get a header row as a flat `(temperature, resistance)` pair
    pub fn row(&self, row: usize) -> Option<(f32, f32)> {
        match row {
            0 => Some((self.temperature_step, self.step)),
            1 => Some((self.min_temperature, self.max_temperature)),
            _ => None,
        }
    }
}

/// Calibration table with a fixed sample capacity
///
/// `N` is the sample capacity; the default matches a full-size table file.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable<const N: usize = MAX_SAMPLES> {
    header: TableHeader,
    samples: Vec<Sample, N>,
}

impl<const N: usize> Default for CalibrationTable<N> {
    fn default() -> Self {
        Self::new(TableHeader::default())
    }
}

impl<const N: usize> CalibrationTable<N> {
    /// Create an empty table with the given header
    pub const fn new(header: TableHeader) -> Self {
        Self {
            header,
            samples: Vec::new(),
        }
    }

    /// Build a table from the two flat columns
    ///
    /// Rows 0 and 1 become the header, the rest become samples.
    pub fn from_columns(temperatures: &[f32], resistances: &[f32]) -> Result<Self, TableError> {
        if temperatures.len() != resistances.len() {
            return Err(TableError::LengthMismatch);
        }
        if temperatures.len() < HEADER_SLOTS {
            return Err(TableError::MissingHeader);
        }

        let mut table = Self::default();
        for (row, (&t, &r)) in temperatures.iter().zip(resistances).enumerate() {
            table.write_row(row, t, r)?;
        }
        Ok(table)
    }

    /// Write the table back into two flat columns
    ///
    /// Returns the number of rows written, which is limited by the shorter
    /// of the two output slices.
    pub fn write_columns(&self, temperatures: &mut [f32], resistances: &mut [f32]) -> usize {
        let rows = (HEADER_SLOTS + self.samples.len())
            .min(temperatures.len())
            .min(resistances.len());

        for row in 0..rows {
            let (t, r) = match self.header.row(row) {
                Some(pair) => pair,
                None => {
                    let s = self.samples[row - HEADER_SLOTS];
                    (s.temperature, s.resistance)
                }
            };
            temperatures[row] = t;
            resistances[row] = r;
        }
        rows
    }

    /// Table header
    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Replace the table header
    pub fn set_header(&mut self, header: TableHeader) {
        self.header = header;
    }

    /// Loaded samples in file order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of loaded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples are loaded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if the sample buffer is full
    pub fn is_full(&self) -> bool {
        self.samples.is_full()
    }

    /// Sample capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Drop all samples, keeping the header
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Write a sample at `index`
    ///
    /// Overwrites an existing sample or appends. Writing past the end pads
    /// the gap with zeroed samples, like a zero-initialised buffer would.
    pub fn write(&mut self, index: usize, sample: Sample) -> Result<(), TableError> {
        if index >= N {
            return Err(TableError::Full);
        }

        if let Some(slot) = self.samples.get_mut(index) {
            *slot = sample;
            return Ok(());
        }

        while self.samples.len() < index {
            self.samples
                .push(Sample::default())
                .map_err(|_| TableError::Full)?;
        }
        self.samples.push(sample).map_err(|_| TableError::Full)
    }

    /// Write a flat row: header for rows 0 and 1, sample otherwise
    pub fn write_row(
        &mut self,
        row: usize,
        temperature: f32,
        resistance: f32,
    ) -> Result<(), TableError> {
        if row < HEADER_SLOTS {
            self.header.set_row(row, temperature, resistance);
            Ok(())
        } else {
            self.write(row - HEADER_SLOTS, Sample::new(temperature, resistance))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_splits_header() {
        let t = [0.5, -40.0, -40.0, -39.5];
        let r = [0.5, 125.0, 336_000.0, 324_000.0];
        let table: CalibrationTable = CalibrationTable::from_columns(&t, &r).unwrap();

        let header = table.header();
        assert_eq!(header.step, 0.5);
        assert_eq!(header.temperature_step, 0.5);
        assert_eq!(header.min_temperature, -40.0);
        assert_eq!(header.max_temperature, 125.0);

        assert_eq!(
            table.samples(),
            &[Sample::new(-40.0, 336_000.0), Sample::new(-39.5, 324_000.0)]
        );
    }

    #[test]
    fn test_from_columns_rejects_bad_shapes() {
        let result = CalibrationTable::<4>::from_columns(&[1.0, 2.0], &[1.0]);
        assert_eq!(result, Err(TableError::LengthMismatch));

        let result = CalibrationTable::<4>::from_columns(&[1.0], &[1.0]);
        assert_eq!(result, Err(TableError::MissingHeader));

        let result = CalibrationTable::<1>::from_columns(&[1.0, 0.0, 0.0, 1.0], &[1.0, 1.0, 9.0, 8.0]);
        assert_eq!(result, Err(TableError::Full));
    }

    #[test]
    fn test_write_columns_restores_flat_layout() {
        let t = [10.0, 10.0, 10.0, 20.0];
        let r = [10.0, 20.0, 500.0, 600.0];
        let table = CalibrationTable::<8>::from_columns(&t, &r).unwrap();

        let mut t_out = [0.0f32; 6];
        let mut r_out = [0.0f32; 6];
        assert_eq!(table.write_columns(&mut t_out, &mut r_out), 4);
        assert_eq!(&t_out[..4], &t);
        assert_eq!(&r_out[..4], &r);

        // Output shorter than the table
        let mut t_short = [0.0f32; 3];
        let mut r_short = [0.0f32; 3];
        assert_eq!(table.write_columns(&mut t_short, &mut r_short), 3);
        assert_eq!(t_short, [10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_write_overwrites_and_pads() {
        let mut table = CalibrationTable::<4>::default();

        table.write(0, Sample::new(1.0, 10.0)).unwrap();
        table.write(0, Sample::new(2.0, 20.0)).unwrap();
        assert_eq!(table.samples(), &[Sample::new(2.0, 20.0)]);

        table.write(2, Sample::new(3.0, 30.0)).unwrap();
        assert_eq!(
            table.samples(),
            &[Sample::new(2.0, 20.0), Sample::default(), Sample::new(3.0, 30.0)]
        );

        assert_eq!(table.write(4, Sample::default()), Err(TableError::Full));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_clear_keeps_header() {
        let header = TableHeader::new(10.0, 10.0, 20.0);
        let mut table = CalibrationTable::<4>::new(header);
        table.write(0, Sample::new(10.0, 500.0)).unwrap();
        assert!(!table.is_empty());

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.header(), &header);
        assert_eq!(table.capacity(), 4);
    }
}
