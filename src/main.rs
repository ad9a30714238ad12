#![allow(clippy::doc_markdown)]

mod cli;
mod core;
mod generator;
mod prelude;
mod quantity;
mod settings;
mod store;
mod tables;

use std::io;

use chrono::Local;
use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command},
    core::{comparator::Comparator, provider::ReadingStore},
    prelude::*,
    settings::Settings,
    store::MemoryReadingStore,
    tables::{
        build_exclusions_table,
        build_plans_table,
        build_ranking_table,
        build_readings_table,
    },
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let settings = Settings::read_from(&args.settings)?;

    match args.command {
        Command::Generate(generate_args) => {
            let store = generate_args
                .generator()?
                .generate_for(settings.accounts.keys(), Local::now())?;
            store.write_to(&args.readings_file)?;
        }

        Command::Store(store_args) => {
            let mut store = MemoryReadingStore::read_from(&args.readings_file)?;
            store.store_readings(store_args.meter_id, store_args.readings)?;
            store.write_to(&args.readings_file)?;
        }

        Command::Readings(meter_args) => {
            let store = MemoryReadingStore::read_from(&args.readings_file)?;
            let readings = store
                .get_readings(&meter_args.meter_id)
                .with_context(|| format!("no readings for meter `{}`", meter_args.meter_id))?;
            println!("{}", build_readings_table(readings));
        }

        Command::Compare(meter_args) => {
            let store = MemoryReadingStore::read_from(&args.readings_file)?;
            let comparison = Comparator::new(&store, &settings.price_plans, &settings.accounts)
                .compare_all_plans(&meter_args.meter_id)?;
            println!("{}", build_ranking_table(&comparison.ranked));
            if !comparison.excluded.is_empty() {
                println!("{}", build_exclusions_table(&comparison));
            }
        }

        Command::Recommend(recommend_args) => {
            let store = MemoryReadingStore::read_from(&args.readings_file)?;
            let recommendations =
                Comparator::new(&store, &settings.price_plans, &settings.accounts)
                    .recommend(&recommend_args.meter_id, recommend_args.limit)?;
            println!("{}", build_ranking_table(&recommendations));
        }

        Command::Current(meter_args) => {
            let store = MemoryReadingStore::read_from(&args.readings_file)?;
            let estimate = Comparator::new(&store, &settings.price_plans, &settings.accounts)
                .current_plan_cost(&meter_args.meter_id)?;
            info!(supplier = %estimate.supplier, cost = %estimate.cost, "current plan");
            println!("{}", build_ranking_table(&[estimate]));
        }

        Command::Plans => {
            println!("{}", build_plans_table(&settings.price_plans));
        }
    }

    info!("done!");
    Ok(())
}
