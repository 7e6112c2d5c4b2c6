//! Sensor divider transfer function
//!
//! The thermistor sits in a small resistor network: a fixed resistor in
//! series with the thermistor forms one leg, that leg is loaded by a bias
//! resistor in parallel, and the combination hangs below a series resistor
//! from the supply. [`output_voltage`] maps a thermistor resistance to the
//! voltage measured across the thermistor.
//!
//! The evaluation order and precision mirror the deployed firmware
//! exactly: the resistor arithmetic runs in single precision, the voltage
//! terms in double precision, and the result is rounded back to `f32`.
//! Readings compared against logged device output therefore match bit for
//! bit.

/// Supply voltage in volts
pub const SUPPLY_VOLTS: f64 = 5.0;

/// Fixed resistor in series with the thermistor (ohms)
pub const LEG_OHMS: f32 = 1000.0;

/// Bias resistor in parallel with the thermistor leg (ohms)
pub const BIAS_OHMS: f32 = 251_000.0;

/// Series resistor between the supply and the network (ohms)
pub const SERIES_OHMS: f32 = 5000.0;

/// Voltage across the thermistor for a given resistance
///
/// Pure function of its input; `output_voltage(0.0)` is exactly zero.
pub fn output_voltage(resistance: f32) -> f32 {
    let leg = LEG_OHMS + resistance;
    let network = leg * BIAS_OHMS / (leg + BIAS_OHMS);
    let loaded = network + SERIES_OHMS;

    let leg_volts =
        SUPPLY_VOLTS - f64::from(SERIES_OHMS) * (SUPPLY_VOLTS / f64::from(loaded));

    (leg_volts / f64::from(leg) * f64::from(resistance)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_resistance_gives_zero() {
        assert_eq!(output_voltage(0.0), 0.0);
    }

    #[test]
    fn test_known_points() {
        let points = [
            (550.0, 0.417_877_44),
            (600.0, 0.452_360_9),
            (1000.0, 0.710_243_3),
            (10_000.0, 3.082_780_6),
            (100_000.0, 4.629_117_5),
        ];

        for (resistance, expected) in points {
            let out = output_voltage(resistance);
            assert!(
                (out - expected).abs() < 1e-4,
                "R={} gave {}, expected {}",
                resistance,
                out,
                expected
            );
        }
    }

    #[test]
    fn test_deterministic() {
        for r in [0.0, 12.5, 1000.0, 47_000.0] {
            assert_eq!(output_voltage(r).to_bits(), output_voltage(r).to_bits());
        }
    }

    #[test]
    fn test_increases_with_resistance() {
        let mut last = output_voltage(0.0);
        for r in (1..200).map(|k| k as f32 * 500.0) {
            let out = output_voltage(r);
            assert!(out > last);
            last = out;
        }
    }

    #[test]
    fn test_bounded_by_supply() {
        assert!(output_voltage(10_000_000.0) < SUPPLY_VOLTS as f32);
    }
}
