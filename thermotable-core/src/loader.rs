//! Calibration table loader
//!
//! Reads a two-column table file from a [`FileStorage`] into a
//! [`CalibrationTable`].
//!
//! File format:
//! - One `temperature;resistance` pair per line
//! - Lines end in `\n` or `\r`; blank lines are ignored
//! - Lines without a delimiter are skipped
//! - Fields that do not start with a number read as 0.0
//!
//! The loader keeps a cursor in the flat row layout (header rows first).
//! The cursor survives between [`TableLoader::load`] calls, so several
//! files can be appended into one table; call [`TableLoader::reset`] to
//! start over.

use heapless::Vec;
use thermotable_hal::{FileReader, FileStorage};

use crate::config::LookupConfig;
use crate::table::{CalibrationTable, HEADER_SLOTS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default field delimiter
pub const DEFAULT_DELIMITER: u8 = b';';

/// Longest accepted line, in bytes
pub const MAX_LINE_LEN: usize = 64;

/// Bytes pulled from storage per read call
const READ_CHUNK: usize = 64;

/// Where the table header comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoadMode {
    /// Header is set by the caller; every line in the file is a sample
    #[default]
    PresetHeader,
    /// First two lines of the file are the header rows
    HeaderInFile,
}

impl LoadMode {
    /// Flat row the cursor starts at
    const fn first_row(self) -> usize {
        match self {
            LoadMode::PresetHeader => HEADER_SLOTS,
            LoadMode::HeaderInFile => 0,
        }
    }
}

/// Errors from loading a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError<E> {
    /// File could not be opened; the table was not touched
    Open(E),
    /// Read failed part way; lines before the failure were kept
    Read(E),
}

/// Summary of one load call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Lines written into the table (header rows included)
    pub written: usize,
    /// Lines skipped as malformed (no delimiter or too long)
    pub skipped: usize,
    /// Well-formed lines dropped because the table was full
    pub dropped: usize,
    /// Table reached capacity during this call
    pub capacity_reached: bool,
}

/// Line-oriented table loader
///
/// Owns the write cursor. One loader per table.
#[derive(Debug, Clone)]
pub struct TableLoader {
    /// Next flat row to write
    cursor: usize,
    delimiter: u8,
    mode: LoadMode,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableLoader {
    /// Create a loader for files without header rows
    pub const fn new() -> Self {
        Self {
            cursor: LoadMode::PresetHeader.first_row(),
            delimiter: DEFAULT_DELIMITER,
            mode: LoadMode::PresetHeader,
        }
    }

    /// Create a loader from configuration
    pub fn from_config(config: &LookupConfig) -> Self {
        Self::new()
            .with_mode(config.load_mode)
            .with_delimiter(config.delimiter)
    }

    /// Use a different field delimiter
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use a different header mode
    ///
    /// Resets the cursor to the first row of that mode.
    pub const fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self.cursor = mode.first_row();
        self
    }

    /// Next flat row the loader will write
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of samples written so far
    pub fn samples_written(&self) -> usize {
        self.cursor.saturating_sub(HEADER_SLOTS)
    }

    /// Rewind the cursor so the next load starts from the top
    pub fn reset(&mut self) {
        self.cursor = self.mode.first_row();
    }

    /// Load a table file into `table`
    ///
    /// Rows are written at the cursor and the cursor advances once per
    /// well-formed line. When the table is full the rest of the file is
    /// still read but discarded. The file is closed on every path.
    pub fn load<S: FileStorage, const N: usize>(
        &mut self,
        storage: &mut S,
        name: &str,
        table: &mut CalibrationTable<N>,
    ) -> Result<LoadReport, LoadError<S::Error>> {
        let mut file = match storage.open(name) {
            Ok(file) => file,
            Err(e) => {
                error!("error opening {}", name);
                return Err(LoadError::Open(e));
            }
        };
        info!("loading table {}", name);

        let result = self.read_lines(&mut file, table);

        if file.close().is_err() {
            warn!("failed to close {}", name);
        }

        match &result {
            Ok(report) => {
                debug!(
                    "{} lines written, {} skipped, {} dropped",
                    report.written,
                    report.skipped,
                    report.dropped
                );
                if report.capacity_reached {
                    warn!("table full after {} samples", table.len());
                }
            }
            Err(_) => error!("read error in {}", name),
        }

        result
    }

    /// Split the byte stream into lines and feed each to `process_line`
    fn read_lines<R: FileReader, const N: usize>(
        &mut self,
        file: &mut R,
        table: &mut CalibrationTable<N>,
    ) -> Result<LoadReport, LoadError<R::Error>> {
        let mut report = LoadReport::default();
        let mut line: Vec<u8, MAX_LINE_LEN> = Vec::new();
        let mut overlong = false;
        let mut chunk = [0u8; READ_CHUNK];

        while file.available() {
            let n = file.read(&mut chunk).map_err(LoadError::Read)?;
            if n == 0 {
                break;
            }

            for &byte in &chunk[..n] {
                if byte == b'\n' || byte == b'\r' {
                    if !line.is_empty() || overlong {
                        self.process_line(&line, overlong, table, &mut report);
                    }
                    line.clear();
                    overlong = false;
                } else if line.push(byte).is_err() {
                    overlong = true;
                }
            }
        }

        // Last line without a terminator
        if !line.is_empty() || overlong {
            self.process_line(&line, overlong, table, &mut report);
        }

        report.capacity_reached = self.cursor >= HEADER_SLOTS + N;
        Ok(report)
    }

    fn process_line<const N: usize>(
        &mut self,
        line: &[u8],
        overlong: bool,
        table: &mut CalibrationTable<N>,
        report: &mut LoadReport,
    ) {
        if overlong {
            warn!("skipping line longer than {} bytes", MAX_LINE_LEN);
            report.skipped += 1;
            return;
        }

        let Some((temperature, resistance)) = split_fields(line, self.delimiter) else {
            trace!("skipping line without delimiter");
            report.skipped += 1;
            return;
        };

        if self.cursor >= HEADER_SLOTS + N {
            report.dropped += 1;
            return;
        }

        match table.write_row(self.cursor, temperature, resistance) {
            Ok(()) => {
                self.cursor += 1;
                report.written += 1;
            }
            Err(_) => report.dropped += 1,
        }
    }
}

/// Split a line at the first delimiter and parse both fields
pub fn split_fields(line: &[u8], delimiter: u8) -> Option<(f32, f32)> {
    let at = line.iter().position(|&b| b == delimiter)?;
    Some((parse_number(&line[..at]), parse_number(&line[at + 1..])))
}

/// Parse the leading number of a field
///
/// Leading whitespace is skipped and anything after the number is ignored.
/// A field with no leading number reads as 0.0.
pub fn parse_number(field: &[u8]) -> f32 {
    let Ok(text) = core::str::from_utf8(field) else {
        return 0.0;
    };
    let text = text.trim_start();
    let len = numeric_prefix_len(text.as_bytes());
    text[..len].parse().unwrap_or(0.0)
}

/// Length of the `[sign] digits [. digits] [e [sign] digits]` prefix
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let int_end = digits_from(i);
    let mut mantissa_digits = int_end - i;
    i = int_end;

    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        mantissa_digits += frac_end - (i + 1);
        if mantissa_digits > 0 {
            i = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }

    i
}
