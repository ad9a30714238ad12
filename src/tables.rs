use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::core::{
    comparator::Comparison,
    cost::CostEstimate,
    plan::PricePlan,
    reading::Reading,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Ranked estimates, cheapest in green and costliest in red.
#[must_use]
pub fn build_ranking_table(ranked: &[CostEstimate]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").set_alignment(CellAlignment::Right),
        Cell::new("Supplier"),
        Cell::new("Cost").set_alignment(CellAlignment::Right),
    ]);
    let cheapest = ranked.first().map(|estimate| estimate.cost);
    let costliest = ranked.last().map(|estimate| estimate.cost);
    for (rank, estimate) in ranked.iter().enumerate() {
        let color = if Some(estimate.cost) == cheapest {
            Color::Green
        } else if Some(estimate.cost) == costliest {
            Color::Red
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(estimate.supplier.as_str()),
            Cell::new(estimate.cost).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}

/// Plans that could not be priced.
#[must_use]
pub fn build_exclusions_table(comparison: &Comparison) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Excluded supplier", "Reason"]);
    for exclusion in &comparison.excluded {
        table.add_row(vec![
            Cell::new(exclusion.supplier.as_str()),
            Cell::new(&exclusion.reason).fg(Color::DarkYellow),
        ]);
    }
    table
}

#[must_use]
pub fn build_readings_table(readings: &[Reading]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Date"),
        Cell::new("Time"),
        Cell::new("Day"),
        Cell::new("Power").set_alignment(CellAlignment::Right),
    ]);
    for reading in readings.iter().sorted_by_key(|reading| reading.timestamp) {
        table.add_row(vec![
            Cell::new(reading.timestamp.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(reading.timestamp.format("%H:%M:%S")),
            Cell::new(reading.timestamp.format("%a")).add_attribute(Attribute::Dim),
            Cell::new(reading.power).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_plans_table(price_plans: &[PricePlan]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Supplier"),
        Cell::new("Unit rate").set_alignment(CellAlignment::Right),
        Cell::new("Peak-time multipliers"),
    ]);
    for plan in price_plans {
        let multipliers = plan
            .peak_time_multipliers
            .iter()
            .map(|rule| format!("{}: ×{}", rule.day_of_week, rule.multiplier))
            .join(", ");
        table.add_row(vec![
            Cell::new(plan.supplier.as_str()),
            Cell::new(plan.unit_rate).set_alignment(CellAlignment::Right),
            Cell::new(multipliers),
        ]);
    }
    table
}
