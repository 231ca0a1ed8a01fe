use crate::table::{ratio, DecisionCounts, DecisionRates, DecisionRecord, RatedDecision};

impl DecisionRates {
    /// Each outcome divided by the total. A zero or missing total leaves every
    /// rate undefined instead of dividing by zero.
    pub fn from_counts(counts: &DecisionCounts) -> Self {
        Self {
            granted: ratio(counts.recognized, counts.total),
            other_protection: ratio(counts.complementary, counts.total),
            refused: ratio(counts.rejected, counts.total),
            otherwise_closed: ratio(counts.otherwise_closed, counts.total),
        }
    }

    /// Sum of the defined rates, or `None` if any rate is undefined.
    pub fn sum(&self) -> Option<f64> {
        self.as_array().iter().copied().sum()
    }
}

/// Attach rates to aggregated decision rows.
pub fn rate(records: &[DecisionRecord]) -> Vec<RatedDecision> {
    records
        .iter()
        .map(|rec| RatedDecision {
            key: rec.key.clone(),
            rates: DecisionRates::from_counts(&rec.counts),
            counts: rec.counts.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::OriginAsylumKey;

    #[test]
    fn grant_rate_of_worked_example() {
        let rates = DecisionRates::from_counts(&DecisionCounts::new(30, 10, 50, 5));

        let granted = rates.granted.unwrap();
        assert!((granted - 30.0 / 95.0).abs() < 1e-12);
        assert!((granted - 0.3158).abs() < 1e-4);
        assert!((rates.sum().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_leaves_rates_undefined() {
        let rates = DecisionRates::from_counts(&DecisionCounts::new(0, 0, 0, 0));
        assert!(rates.is_undefined());
        assert_eq!(rates.sum(), None);
    }

    #[test]
    fn missing_component_only_blanks_its_own_rate() {
        let counts = DecisionCounts {
            recognized: Some(4),
            complementary: None,
            rejected: Some(4),
            otherwise_closed: Some(0),
            total: Some(8),
        };
        let rates = DecisionRates::from_counts(&counts);
        assert_eq!(rates.granted, Some(0.5));
        assert_eq!(rates.other_protection, None);
        assert_eq!(rates.otherwise_closed, Some(0.0));
        assert!(!rates.is_undefined());
    }

    #[test]
    fn rates_sum_to_one_for_non_zero_totals() {
        let records: Vec<DecisionRecord> = [(1, 2, 3, 4), (7, 0, 0, 0), (13, 17, 19, 23)]
            .into_iter()
            .enumerate()
            .map(|(i, (a, b, c, d))| DecisionRecord {
                key: OriginAsylumKey::new(2020 + i as i32, "AFG", "DEU"),
                counts: DecisionCounts::new(a, b, c, d),
            })
            .collect();

        for rated in rate(&records) {
            assert!((rated.rates.sum().unwrap() - 1.0).abs() < 1e-9);
        }
    }
}
