use std::{
    fmt::{Debug, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{prelude::*, quantity::power::Kilowatts};

/// Smart meter identifier, for example `smart-meter-0`.
#[derive(
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct MeterId(String);

impl From<&str> for MeterId {
    fn from(meter_id: &str) -> Self {
        Self(meter_id.to_owned())
    }
}

impl MeterId {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Instantaneous power sample.
#[derive(Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[must_use]
pub struct Reading {
    #[serde(rename = "time")]
    pub timestamp: DateTime<Local>,

    /// Instantaneous power.
    #[serde(rename = "reading")]
    pub power: Kilowatts,
}

impl Debug for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{}", self.power, self.timestamp.to_rfc3339())
    }
}

impl Reading {
    pub const fn new(timestamp: DateTime<Local>, power: Kilowatts) -> Self {
        Self { timestamp, power }
    }
}

/// Parse `<RFC 3339 timestamp>=<kilowatts>`, as accepted on the command line.
impl FromStr for Reading {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (timestamp, power) =
            s.rsplit_once('=').with_context(|| format!("expected `<timestamp>=<kW>`: `{s}`"))?;
        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .with_context(|| format!("invalid timestamp: `{timestamp}`"))?
            .with_timezone(&Local);
        let power = power.parse().with_context(|| format!("invalid power: `{power}`"))?;
        Ok(Self { timestamp, power: Kilowatts(power) })
    }
}
