use chrono::{Datelike, Weekday};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    core::{
        error::{EstimateError, PlanDefect},
        interval::Interval,
    },
    quantity::{rate::KilowattHourRate, time::Hours},
};

/// Energy supplier identity.
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
)]
#[serde(transparent)]
pub struct Supplier(String);

impl From<&str> for Supplier {
    fn from(supplier: &str) -> Self {
        Self(supplier.to_owned())
    }
}

impl Supplier {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rate adjustment applied during a peak window.
///
/// The window is a whole day of the week. The cost calculator only asks a rule how much
/// of an interval it covers, so a finer window (for example, an hour range) only needs
/// to change this type.
#[serde_as]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PeakTimeMultiplier {
    #[serde_as(as = "DisplayFromStr")]
    pub day_of_week: Weekday,

    /// Factor applied to the unit rate, `1.0` means no effect.
    pub multiplier: f64,
}

impl PeakTimeMultiplier {
    pub const fn new(day_of_week: Weekday, multiplier: f64) -> Self {
        Self { day_of_week, multiplier }
    }

    /// Part of the interval that falls into the peak window.
    #[must_use]
    pub fn overlap(&self, interval: Interval) -> Hours {
        interval
            .split_by_days()
            .filter(|piece| piece.start.weekday() == self.day_of_week)
            .map(|piece| Hours::from(piece.duration()))
            .sum()
    }

    /// Whether both rules would apply to the same moment.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.day_of_week == other.day_of_week
    }
}

/// Supplier's pricing: base unit rate with optional peak-time multipliers.
#[derive(Clone, Debug, Deserialize, Serialize, bon::Builder)]
pub struct PricePlan {
    #[builder(into)]
    pub supplier: Supplier,

    pub unit_rate: KilowattHourRate,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    pub peak_time_multipliers: Vec<PeakTimeMultiplier>,
}

impl PricePlan {
    /// Check the rate and multiplier invariants.
    pub fn validate(&self) -> Result<(), EstimateError> {
        self.find_defect().map_or(Ok(()), |defect| {
            Err(EstimateError::InvalidPlan { supplier: self.supplier.clone(), defect })
        })
    }

    fn find_defect(&self) -> Option<PlanDefect> {
        if !is_positive(self.unit_rate.0) {
            return Some(PlanDefect::NonPositiveUnitRate(self.unit_rate));
        }
        if let Some(rule) =
            self.peak_time_multipliers.iter().find(|rule| !is_positive(rule.multiplier))
        {
            return Some(PlanDefect::NonPositiveMultiplier {
                day_of_week: rule.day_of_week,
                multiplier: rule.multiplier,
            });
        }
        self.peak_time_multipliers
            .iter()
            .tuple_combinations()
            .find(|(lhs, rhs)| lhs.conflicts_with(rhs))
            .map(|(rule, _)| PlanDefect::DuplicateMultiplier(rule.day_of_week))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
