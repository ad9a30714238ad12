use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::{
    core::{
        plan::{PricePlan, Supplier},
        reading::MeterId,
    },
    prelude::*,
    quantity::rate::KilowattHourRate,
};

const DR_EVILS_DARK_ENERGY: &str = "Dr Evil's Dark Energy";
const THE_GREEN_ECO: &str = "The Green Eco";
const POWER_FOR_EVERYONE: &str = "Power for Everyone";

/// Price plan catalogue and account directory.
#[derive(Deserialize)]
#[must_use]
pub struct Settings {
    #[serde(default = "default_price_plans")]
    pub price_plans: Vec<PricePlan>,

    /// Meter ID to the subscribed supplier.
    #[serde(default = "default_accounts")]
    pub accounts: BTreeMap<MeterId, Supplier>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { price_plans: default_price_plans(), accounts: default_accounts() }
    }
}

impl Settings {
    /// Read the settings from the TOML file, or fall back to the built-in defaults
    /// if there is no such file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let settings = if path.is_file() {
            toml::from_slice(&fs::read(path)?)
                .with_context(|| format!("failed to parse `{}`", path.display()))?
        } else {
            debug!("no settings file, using the defaults");
            Self::default()
        };
        info!(
            n_price_plans = settings.price_plans.len(),
            n_accounts = settings.accounts.len(),
            "loaded"
        );
        Ok(settings)
    }
}

fn default_price_plans() -> Vec<PricePlan> {
    [(DR_EVILS_DARK_ENERGY, 10.0), (THE_GREEN_ECO, 2.0), (POWER_FOR_EVERYONE, 1.0)]
        .into_iter()
        .map(|(supplier, unit_rate)| {
            PricePlan::builder().supplier(supplier).unit_rate(KilowattHourRate(unit_rate)).build()
        })
        .collect()
}

fn default_accounts() -> BTreeMap<MeterId, Supplier> {
    [
        ("smart-meter-0", DR_EVILS_DARK_ENERGY),
        ("smart-meter-1", THE_GREEN_ECO),
        ("smart-meter-2", DR_EVILS_DARK_ENERGY),
        ("smart-meter-3", POWER_FOR_EVERYONE),
        ("smart-meter-4", THE_GREEN_ECO),
    ]
    .into_iter()
    .map(|(meter_id, supplier)| (MeterId::from(meter_id), Supplier::from(supplier)))
    .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;
    use crate::core::plan::PeakTimeMultiplier;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.price_plans.len(), 3);
        assert_eq!(settings.accounts.len(), 5);
        assert!(settings.price_plans.iter().all(|plan| plan.validate().is_ok()));
        assert!(settings.accounts.values().all(|supplier| {
            settings.price_plans.iter().any(|plan| plan.supplier == *supplier)
        }));
    }

    #[test]
    fn test_parse() -> Result {
        let settings: Settings = toml::from_str(
            r#"
            [[price_plans]]
            supplier = "Cheap Nights"
            unit_rate = 0.3
            peak_time_multipliers = [
                { day_of_week = "Mon", multiplier = 1.5 },
                { day_of_week = "Friday", multiplier = 2.0 },
            ]

            [accounts]
            smart-meter-42 = "Cheap Nights"
            "#,
        )?;
        assert_eq!(settings.price_plans.len(), 1);
        assert_eq!(
            settings.price_plans[0].peak_time_multipliers,
            [
                PeakTimeMultiplier::new(Weekday::Mon, 1.5),
                PeakTimeMultiplier::new(Weekday::Fri, 2.0),
            ],
        );
        assert_eq!(
            settings.accounts.get(&MeterId::from("smart-meter-42")),
            Some(&Supplier::from("Cheap Nights")),
        );
        Ok(())
    }

    #[test]
    fn test_missing_sections_fall_back() -> Result {
        let settings: Settings = toml::from_str("")?;
        assert_eq!(settings.price_plans.len(), 3);
        assert_eq!(settings.accounts.len(), 5);
        Ok(())
    }

    #[test]
    fn test_missing_file() -> Result {
        let settings = Settings::read_from(Path::new("/nonexistent/joi-energy.toml"))?;
        assert_eq!(settings.price_plans.len(), 3);
        Ok(())
    }
}
