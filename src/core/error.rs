use chrono::Weekday;

use crate::{
    core::{plan::Supplier, reading::MeterId},
    quantity::rate::KilowattHourRate,
};

/// Failure to estimate a cost for one reading sequence under one price plan.
#[derive(Clone, Debug, thiserror::Error)]
pub enum EstimateError {
    #[error("at least two readings spanning a non-zero time are required, got {n_readings}")]
    InsufficientData { n_readings: usize },

    #[error("invalid price plan of `{supplier}`: {defect}")]
    InvalidPlan { supplier: Supplier, defect: PlanDefect },
}

#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum PlanDefect {
    #[error("unit rate must be positive, got {0}")]
    NonPositiveUnitRate(KilowattHourRate),

    #[error("multiplier on {day_of_week} must be positive, got {multiplier}")]
    NonPositiveMultiplier { day_of_week: Weekday, multiplier: f64 },

    #[error("more than one multiplier on {0}")]
    DuplicateMultiplier(Weekday),
}

/// Failure of a whole per-meter request.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("no readings for meter `{meter_id}`")]
    UnknownMeter { meter_id: MeterId },

    #[error("no account for meter `{meter_id}`")]
    UnknownAccount { meter_id: MeterId },

    #[error("meter `{meter_id}` is subscribed to `{supplier}` that has no price plan")]
    UnknownPlan { meter_id: MeterId, supplier: Supplier },

    #[error("failed to estimate the cost for meter `{meter_id}`")]
    Estimate {
        meter_id: MeterId,

        #[source]
        source: EstimateError,
    },
}
