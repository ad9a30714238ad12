use chrono::{DateTime, Local, TimeDelta};

use crate::{
    core::reading::{MeterId, Reading},
    prelude::*,
    quantity::power::Kilowatts,
    store::MemoryReadingStore,
};

/// Random reading generator for seeding a store.
#[derive(bon::Builder)]
#[must_use]
pub struct ReadingGenerator {
    /// Number of readings per meter.
    #[builder(default = 20)]
    count: u32,

    /// Time between successive readings.
    #[builder(default = TimeDelta::seconds(10))]
    interval: TimeDelta,

    #[builder(default = fastrand::Rng::new())]
    rng: fastrand::Rng,
}

impl ReadingGenerator {
    /// Generate readings ending at `until`, sorted by timestamp.
    ///
    /// Powers are uniformly distributed in `[0, 1)` kilowatts. Fails when the earliest
    /// timestamp falls outside the representable date range.
    pub fn generate(&mut self, until: DateTime<Local>) -> Result<Vec<Reading>> {
        (0..self.count)
            .rev()
            .map(|index| -> Result<Reading> {
                let timestamp = i32::try_from(index)
                    .ok()
                    .and_then(|index| self.interval.checked_mul(index))
                    .and_then(|offset| until.checked_sub_signed(offset))
                    .with_context(|| format!("reading #{index} before {until} is out of range"))?;
                Ok(Reading::new(timestamp, Kilowatts(self.rng.f64())))
            })
            .collect()
    }

    #[instrument(skip_all, fields(count = self.count))]
    pub fn generate_for<'a>(
        &mut self,
        meter_ids: impl IntoIterator<Item = &'a MeterId>,
        until: DateTime<Local>,
    ) -> Result<MemoryReadingStore> {
        meter_ids
            .into_iter()
            .map(|meter_id| -> Result<(MeterId, Vec<Reading>)> {
                debug!(%meter_id, "generating");
                Ok((meter_id.clone(), self.generate(until)?))
            })
            .collect()
    }
}
