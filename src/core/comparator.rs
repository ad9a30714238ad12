use crate::{
    core::{
        consumption::Estimate,
        cost::CostEstimate,
        error::{ComparisonError, EstimateError},
        plan::Supplier,
        provider::{AccountDirectory, Catalogue, ReadingStore},
        reading::{MeterId, Reading},
    },
    prelude::*,
};

/// Price plan excluded from a comparison.
#[derive(Clone, Debug)]
pub struct Exclusion {
    pub supplier: Supplier,
    pub reason: EstimateError,
}

#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Comparison {
    /// Cheapest first, ties keep the catalogue order.
    pub ranked: Vec<CostEstimate>,

    /// Plans that could not be priced.
    pub excluded: Vec<Exclusion>,
}

/// Runs the cost calculation for a meter across the price plan catalogue.
#[must_use]
pub struct Comparator<'a, R: ?Sized, C: ?Sized, A: ?Sized> {
    readings: &'a R,
    catalogue: &'a C,
    accounts: &'a A,
}

impl<'a, R, C, A> Comparator<'a, R, C, A>
where
    R: ReadingStore + ?Sized,
    C: Catalogue + ?Sized,
    A: AccountDirectory + ?Sized,
{
    pub const fn new(readings: &'a R, catalogue: &'a C, accounts: &'a A) -> Self {
        Self { readings, catalogue, accounts }
    }

    /// Price the meter's readings under every plan, cheapest first.
    ///
    /// A plan that fails to price is excluded from the ranking and reported in
    /// [`Comparison::excluded`], the rest of the plans are still ranked.
    #[instrument(skip_all, fields(meter_id = %meter_id))]
    pub fn compare_all_plans(&self, meter_id: &MeterId) -> Result<Comparison, ComparisonError> {
        let estimate = self.estimate(meter_id)?;
        let mut comparison = Comparison::default();
        for plan in self.catalogue.price_plans() {
            match estimate.cost_under(plan) {
                Ok(cost_estimate) => comparison.ranked.push(cost_estimate),
                Err(reason) => {
                    warn!(supplier = %plan.supplier, %reason, "excluding the price plan");
                    comparison.excluded.push(Exclusion { supplier: plan.supplier.clone(), reason });
                }
            }
        }
        comparison.ranked.sort_by_key(|cost_estimate| cost_estimate.cost);
        info!(
            n_ranked = comparison.ranked.len(),
            n_excluded = comparison.excluded.len(),
            "compared"
        );
        Ok(comparison)
    }

    /// The cheapest `limit` plans, or all of them when there is no limit.
    pub fn recommend(
        &self,
        meter_id: &MeterId,
        limit: Option<usize>,
    ) -> Result<Vec<CostEstimate>, ComparisonError> {
        let mut ranked = self.compare_all_plans(meter_id)?.ranked;
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }

    /// Cost under the plan the meter's account is currently subscribed to.
    #[instrument(skip_all, fields(meter_id = %meter_id))]
    pub fn current_plan_cost(&self, meter_id: &MeterId) -> Result<CostEstimate, ComparisonError> {
        let estimate = self.estimate(meter_id)?;
        let supplier = self
            .accounts
            .get_supplier(meter_id)
            .ok_or_else(|| ComparisonError::UnknownAccount { meter_id: meter_id.clone() })?;
        let plan = self
            .catalogue
            .price_plans()
            .iter()
            .find(|plan| plan.supplier == *supplier)
            .ok_or_else(|| ComparisonError::UnknownPlan {
                meter_id: meter_id.clone(),
                supplier: supplier.clone(),
            })?;
        estimate
            .cost_under(plan)
            .map_err(|source| ComparisonError::Estimate { meter_id: meter_id.clone(), source })
    }

    fn readings(&self, meter_id: &MeterId) -> Result<&'a [Reading], ComparisonError> {
        self.readings
            .get_readings(meter_id)
            .filter(|readings| !readings.is_empty())
            .ok_or_else(|| ComparisonError::UnknownMeter { meter_id: meter_id.clone() })
    }

    fn estimate(&self, meter_id: &MeterId) -> Result<Estimate, ComparisonError> {
        Estimate::try_from_readings(self.readings(meter_id)?)
            .map_err(|source| ComparisonError::Estimate { meter_id: meter_id.clone(), source })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Local, TimeZone, Weekday};

    use super::*;
    use crate::{
        core::plan::{PeakTimeMultiplier, PricePlan},
        quantity::{cost::Cost, power::Kilowatts, rate::KilowattHourRate},
    };

    fn readings() -> BTreeMap<MeterId, Vec<Reading>> {
        let meter_readings = [(2, 15.0), (0, 5.0), (1, 10.0)]
            .map(|(hour, kilowatts)| {
                Reading::new(
                    Local.with_ymd_and_hms(2025, 9, 22, hour, 0, 0).unwrap(),
                    Kilowatts(kilowatts),
                )
            })
            .to_vec();
        BTreeMap::from([
            (MeterId::from("smart-meter-0"), meter_readings),
            (MeterId::from("smart-meter-1"), vec![]),
            (
                MeterId::from("smart-meter-2"),
                vec![Reading::new(
                    Local.with_ymd_and_hms(2025, 9, 22, 0, 0, 0).unwrap(),
                    Kilowatts(1.0),
                )],
            ),
        ])
    }

    fn plan(supplier: &str, unit_rate: f64) -> PricePlan {
        PricePlan::builder().supplier(supplier).unit_rate(KilowattHourRate(unit_rate)).build()
    }

    /// Costs 40, 80, 25 and 40.
    fn catalogue() -> Vec<PricePlan> {
        vec![
            plan("A", 2.0),
            plan("B", 4.0),
            plan("C", 1.25),
            PricePlan::builder()
                .supplier("D")
                .unit_rate(KilowattHourRate(1.0))
                .peak_time_multipliers(vec![PeakTimeMultiplier::new(Weekday::Mon, 2.0)])
                .build(),
        ]
    }

    fn accounts() -> BTreeMap<MeterId, Supplier> {
        BTreeMap::from([
            (MeterId::from("smart-meter-0"), Supplier::from("B")),
            (MeterId::from("smart-meter-2"), Supplier::from("A")),
            (MeterId::from("smart-meter-3"), Supplier::from("A")),
        ])
    }

    fn suppliers_and_costs(ranked: &[CostEstimate]) -> Vec<(&str, f64)> {
        ranked.iter().map(|estimate| (estimate.supplier.as_str(), estimate.cost.0)).collect()
    }

    #[test]
    fn test_compare_all_plans() -> Result<(), ComparisonError> {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        let comparison = Comparator::new(&readings, &catalogue, &accounts)
            .compare_all_plans(&MeterId::from("smart-meter-0"))?;
        assert_eq!(
            suppliers_and_costs(&comparison.ranked),
            [("C", 25.0), ("A", 40.0), ("D", 40.0), ("B", 80.0)],
        );
        assert!(comparison.excluded.is_empty());
        Ok(())
    }

    #[test]
    fn test_ties_keep_catalogue_order() -> Result<(), ComparisonError> {
        let (readings, accounts) = (readings(), accounts());
        let catalogue = vec![plan("Z", 2.0), plan("Y", 2.0), plan("X", 2.0)];
        let comparison = Comparator::new(&readings, &catalogue, &accounts)
            .compare_all_plans(&MeterId::from("smart-meter-0"))?;
        assert_eq!(
            suppliers_and_costs(&comparison.ranked),
            [("Z", 40.0), ("Y", 40.0), ("X", 40.0)],
        );
        Ok(())
    }

    #[test]
    fn test_invalid_plan_is_excluded() -> Result<(), ComparisonError> {
        let (readings, accounts) = (readings(), accounts());
        let mut catalogue = catalogue();
        catalogue.insert(1, plan("Broken", -1.0));
        let comparison = Comparator::new(&readings, &catalogue, &accounts)
            .compare_all_plans(&MeterId::from("smart-meter-0"))?;
        assert_eq!(comparison.ranked.len(), 4);
        assert_eq!(comparison.excluded.len(), 1);
        assert_eq!(comparison.excluded[0].supplier, Supplier::from("Broken"));
        assert!(matches!(comparison.excluded[0].reason, EstimateError::InvalidPlan { .. }));
        Ok(())
    }

    #[test]
    fn test_unknown_meter() {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        let comparator = Comparator::new(&readings, &catalogue, &accounts);
        for meter_id in ["smart-meter-1", "smart-meter-3"] {
            assert!(matches!(
                comparator.compare_all_plans(&MeterId::from(meter_id)),
                Err(ComparisonError::UnknownMeter { meter_id: error_meter_id })
                    if error_meter_id == MeterId::from(meter_id),
            ));
        }
    }

    #[test]
    fn test_insufficient_data() {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        assert!(matches!(
            Comparator::new(&readings, &catalogue, &accounts)
                .compare_all_plans(&MeterId::from("smart-meter-2")),
            Err(ComparisonError::Estimate {
                source: EstimateError::InsufficientData { n_readings: 1 },
                ..
            }),
        ));
    }

    #[test]
    fn test_recommend() -> Result<(), ComparisonError> {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        let comparator = Comparator::new(&readings, &catalogue, &accounts);
        let meter_id = MeterId::from("smart-meter-0");
        assert_eq!(
            suppliers_and_costs(&comparator.recommend(&meter_id, Some(2))?),
            [("C", 25.0), ("A", 40.0)],
        );
        assert_eq!(comparator.recommend(&meter_id, None)?.len(), 4);
        assert_eq!(comparator.recommend(&meter_id, Some(10))?.len(), 4);
        Ok(())
    }

    #[test]
    fn test_current_plan_cost() -> Result<(), ComparisonError> {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        let estimate = Comparator::new(&readings, &catalogue, &accounts)
            .current_plan_cost(&MeterId::from("smart-meter-0"))?;
        assert_eq!(estimate.supplier, Supplier::from("B"));
        assert_eq!(estimate.cost, Cost(80.0));
        Ok(())
    }

    #[test]
    fn test_current_plan_unknown_meter() {
        let (readings, catalogue, accounts) = (readings(), catalogue(), accounts());
        let comparator = Comparator::new(&readings, &catalogue, &accounts);
        for meter_id in ["smart-meter-1", "smart-meter-3"] {
            assert!(matches!(
                comparator.current_plan_cost(&MeterId::from(meter_id)),
                Err(ComparisonError::UnknownMeter { .. }),
            ));
        }
    }

    #[test]
    fn test_current_plan_unknown_account() {
        let (readings, catalogue) = (readings(), catalogue());
        let accounts = BTreeMap::new();
        assert!(matches!(
            Comparator::new(&readings, &catalogue, &accounts)
                .current_plan_cost(&MeterId::from("smart-meter-0")),
            Err(ComparisonError::UnknownAccount { .. }),
        ));
    }

    #[test]
    fn test_current_plan_unknown_plan() {
        let (readings, accounts) = (readings(), accounts());
        let catalogue = vec![plan("A", 1.0)];
        assert!(matches!(
            Comparator::new(&readings, &catalogue, &accounts)
                .current_plan_cost(&MeterId::from("smart-meter-0")),
            Err(ComparisonError::UnknownPlan { .. }),
        ));
    }

    #[test]
    fn test_current_plan_invalid() {
        let (readings, accounts) = (readings(), accounts());
        let catalogue = vec![plan("B", 0.0)];
        assert!(matches!(
            Comparator::new(&readings, &catalogue, &accounts)
                .current_plan_cost(&MeterId::from("smart-meter-0")),
            Err(ComparisonError::Estimate { source: EstimateError::InvalidPlan { .. }, .. }),
        ));
    }
}
