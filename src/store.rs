use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    core::{
        provider::ReadingStore,
        reading::{MeterId, Reading},
    },
    prelude::*,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("meter ID must not be empty")]
    EmptyMeterId,

    #[error("no readings to store for meter `{meter_id}`")]
    NoReadings { meter_id: MeterId },

    #[error("invalid reading for meter `{meter_id}`: {reading:?}")]
    InvalidReading { meter_id: MeterId, reading: Reading },
}

/// Readings per meter, kept in the order they were stored.
#[derive(Default, Deserialize, Serialize)]
#[serde(transparent)]
#[must_use]
pub struct MemoryReadingStore(BTreeMap<MeterId, Vec<Reading>>);

impl MemoryReadingStore {
    /// Load the store from the JSON file, or start empty if there is no such file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        if path.is_file() {
            let contents =
                fs::read(path).with_context(|| format!("failed to read `{}`", path.display()))?;
            let store: Self = serde_json::from_slice(&contents)
                .with_context(|| format!("failed to parse `{}`", path.display()))?;
            info!(n_meters = store.0.len(), "loaded");
            Ok(store)
        } else {
            warn!("no readings file, starting empty");
            Ok(Self::default())
        }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) -> Result {
        fs::write(path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(n_meters = self.0.len(), "saved");
        Ok(())
    }

    /// Append the readings to the meter's history.
    ///
    /// Nothing is stored unless all the readings are valid.
    pub fn store_readings(
        &mut self,
        meter_id: MeterId,
        readings: Vec<Reading>,
    ) -> Result<(), StoreError> {
        if meter_id.is_empty() {
            return Err(StoreError::EmptyMeterId);
        }
        if readings.is_empty() {
            return Err(StoreError::NoReadings { meter_id });
        }
        if let Some(reading) =
            readings.iter().find(|reading| !reading.power.is_finite() || reading.power.0 < 0.0)
        {
            return Err(StoreError::InvalidReading { meter_id, reading: *reading });
        }
        debug!(%meter_id, n_readings = readings.len(), "storing");
        self.0.entry(meter_id).or_default().extend(readings);
        Ok(())
    }
}

impl ReadingStore for MemoryReadingStore {
    fn get_readings(&self, meter_id: &MeterId) -> Option<&[Reading]> {
        self.0.get_readings(meter_id)
    }
}

impl FromIterator<(MeterId, Vec<Reading>)> for MemoryReadingStore {
    fn from_iter<T: IntoIterator<Item = (MeterId, Vec<Reading>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
