pub mod comparator;
pub mod consumption;
pub mod cost;
pub mod error;
pub mod interval;
pub mod plan;
pub mod provider;
pub mod reading;
