quantity!(Cost, via: f64, suffix: "€", precision: 2);

impl Cost {
    /// Round the cost to the currency minor unit (cents).
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self((self.0 * 100.0).round() / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_round_to_cents() {
        assert_abs_diff_eq!(Cost(0.015_000_1).round_to_cents().0, 0.02);
        assert_abs_diff_eq!(Cost(39.999_999_9).round_to_cents().0, 40.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cost(1.234).to_string(), "1.23 €");
    }
}
