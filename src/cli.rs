use std::path::PathBuf;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};

use crate::{
    core::reading::{MeterId, Reading},
    generator::ReadingGenerator,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Price plan catalogue and account directory.
    ///
    /// Built-in defaults are used if the file is missing.
    #[clap(long, env = "JOI_ENERGY_SETTINGS", default_value = "joi-energy.toml")]
    pub settings: PathBuf,

    /// Meter readings storage.
    #[clap(long, env = "JOI_ENERGY_READINGS_FILE", default_value = "readings.json")]
    pub readings_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate random readings for every meter in the account directory.
    Generate(GenerateArgs),

    /// Append readings to the meter's history.
    Store(StoreArgs),

    /// Show the meter's readings.
    Readings(MeterArgs),

    /// Compare the costs across all the price plans.
    Compare(MeterArgs),

    /// Recommend the cheapest price plans.
    Recommend(RecommendArgs),

    /// Show the cost under the currently subscribed price plan.
    Current(MeterArgs),

    /// Show the price plan catalogue.
    Plans,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Number of readings per meter.
    #[clap(long, default_value = "20")]
    pub count: u32,

    /// Time between successive readings.
    #[clap(long, default_value = "10s")]
    pub interval: humantime::Duration,

    /// Random seed for reproducible readings.
    #[clap(long, env = "JOI_ENERGY_SEED")]
    pub seed: Option<u64>,
}

impl GenerateArgs {
    pub fn generator(&self) -> Result<ReadingGenerator> {
        let interval = TimeDelta::from_std(self.interval.into())
            .with_context(|| format!("interval is too long: `{}`", self.interval))?;
        ensure!(interval > TimeDelta::zero(), "interval must be positive");
        let rng = self.seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
        Ok(ReadingGenerator::builder().count(self.count).interval(interval).rng(rng).build())
    }
}

#[derive(Parser)]
pub struct StoreArgs {
    pub meter_id: MeterId,

    /// Readings in `<RFC 3339 timestamp>=<kilowatts>` format,
    /// for example: `2025-09-22T12:00:00+02:00=0.45`.
    #[clap(required = true)]
    pub readings: Vec<Reading>,
}

#[derive(Parser)]
pub struct MeterArgs {
    pub meter_id: MeterId,
}

#[derive(Parser)]
pub struct RecommendArgs {
    pub meter_id: MeterId,

    /// Maximum number of plans to recommend, all of them by default.
    #[clap(long)]
    pub limit: Option<usize>,
}
