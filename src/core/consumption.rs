use itertools::Itertools;

use crate::{
    core::{error::EstimateError, interval::Interval, reading::Reading},
    prelude::*,
    quantity::{power::Kilowatts, time::Hours},
};

/// Average consumption over a reading sequence.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct Estimate {
    pub average_power: Kilowatts,

    /// From the earliest to the latest reading.
    pub span: Interval,
}

impl Estimate {
    /// Estimate the average power implied by the readings.
    ///
    /// The readings may come in any order, they get sorted on a private copy.
    /// The average is the arithmetic mean of successive pairwise averages,
    /// deliberately **not** weighted by the pair's duration.
    #[instrument(skip_all, fields(n_readings = readings.len()))]
    pub fn try_from_readings(readings: &[Reading]) -> Result<Self, EstimateError> {
        let insufficient_data = || EstimateError::InsufficientData { n_readings: readings.len() };

        // Ties on timestamp are broken by power to keep the pairing independent of input order.
        let sorted = readings
            .iter()
            .sorted_by_key(|reading| (reading.timestamp, reading.power))
            .collect_vec();
        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Err(insufficient_data());
        };

        let mut elapsed = Hours::ZERO;
        let mut power_sum = Kilowatts::ZERO;
        let mut n_pairs = 0_u32;
        for (left, right) in sorted.iter().tuple_windows() {
            elapsed += Hours::from(right.timestamp - left.timestamp);
            power_sum += (left.power + right.power) / 2.0;
            n_pairs += 1;
        }
        if n_pairs == 0 || elapsed <= Hours::ZERO {
            return Err(insufficient_data());
        }

        let average_power = power_sum / f64::from(n_pairs);
        debug!(n_pairs, %elapsed, %average_power, "estimated");
        Ok(Self { average_power, span: Interval::new(first.timestamp, last.timestamp) })
    }

    #[must_use]
    pub fn span_hours(&self) -> Hours {
        Hours::from(self.span.duration())
    }
}
