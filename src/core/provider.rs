//! Collaborators the engine reads from.

use std::collections::BTreeMap;

use crate::core::{
    plan::{PricePlan, Supplier},
    reading::{MeterId, Reading},
};

pub trait ReadingStore: Sync {
    /// Readings recorded for the meter, in no particular order.
    fn get_readings(&self, meter_id: &MeterId) -> Option<&[Reading]>;
}

pub trait Catalogue: Sync {
    /// All the price plans, in a stable order.
    fn price_plans(&self) -> &[PricePlan];
}

pub trait AccountDirectory: Sync {
    /// Supplier the meter's account is subscribed to.
    fn get_supplier(&self, meter_id: &MeterId) -> Option<&Supplier>;
}

impl ReadingStore for BTreeMap<MeterId, Vec<Reading>> {
    fn get_readings(&self, meter_id: &MeterId) -> Option<&[Reading]> {
        self.get(meter_id).map(Vec::as_slice)
    }
}

impl Catalogue for Vec<PricePlan> {
    fn price_plans(&self) -> &[PricePlan] {
        self
    }
}

impl AccountDirectory for BTreeMap<MeterId, Supplier> {
    fn get_supplier(&self, meter_id: &MeterId) -> Option<&Supplier> {
        self.get(meter_id)
    }
}
