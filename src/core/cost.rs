use serde::Serialize;

use crate::{
    core::{
        consumption::Estimate,
        error::EstimateError,
        plan::{PricePlan, Supplier},
        reading::Reading,
    },
    prelude::*,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[must_use]
pub struct CostEstimate {
    pub supplier: Supplier,

    /// Rounded to cents.
    pub cost: Cost,
}

/// Estimate the cost of the readings under the price plan.
pub fn estimate_cost(
    readings: &[Reading],
    plan: &PricePlan,
) -> Result<CostEstimate, EstimateError> {
    Estimate::try_from_readings(readings)?.cost_under(plan)
}

impl Estimate {
    /// Price the estimated consumption according to the plan.
    ///
    /// Without peak-time multipliers, this is `average power × span × unit rate`.
    /// Otherwise, the unit rate is blended: each peak window contributes its multiplied rate
    /// proportionally to its share of the span, the rest is billed at the unit rate.
    #[instrument(skip_all, fields(supplier = %plan.supplier))]
    pub fn cost_under(&self, plan: &PricePlan) -> Result<CostEstimate, EstimateError> {
        plan.validate()?;
        let energy = self.average_power * self.span_hours();
        let rate = self.blended_rate(plan);
        let cost = energy * rate;
        debug!(%energy, %rate, %cost, "priced");
        Ok(CostEstimate { supplier: plan.supplier.clone(), cost: cost.round_to_cents() })
    }

    fn blended_rate(&self, plan: &PricePlan) -> KilowattHourRate {
        if plan.peak_time_multipliers.is_empty() {
            return plan.unit_rate;
        }
        let span_hours = self.span_hours();
        let (peak_share, weighted_multiplier) = plan.peak_time_multipliers.iter().fold(
            (0.0, 0.0),
            |(peak_share, weighted_multiplier), rule| {
                let share = rule.overlap(self.span) / span_hours;
                (peak_share + share, weighted_multiplier + share * rule.multiplier)
            },
        );
        plan.unit_rate * ((1.0 - peak_share) + weighted_multiplier)
    }
}
