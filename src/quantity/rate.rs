quantity!(
    /// Currency per kilowatt-hour.
    KilowattHourRate, via: f64, suffix: "€/kWh", precision: 2
);
