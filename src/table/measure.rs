use super::types::DecisionCounts;

/// Add `value` into a running group sum.
///
/// Missing values are skipped; a sum only becomes `Some` once at least one
/// value in the group was present.
pub fn accumulate(sum: &mut Option<i64>, value: Option<i64>) {
    if let Some(v) = value {
        *sum = Some(sum.unwrap_or(0) + v);
    }
}

/// `numerator / denominator`, undefined when either side is missing or the denominator is zero.
pub fn ratio(numerator: Option<i64>, denominator: Option<i64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0 => Some(n as f64 / d as f64),
        _ => None,
    }
}

impl DecisionCounts {
    /// Fold another row's counts into this group sum, column by column.
    pub fn accumulate(&mut self, other: &DecisionCounts) {
        accumulate(&mut self.recognized, other.recognized);
        accumulate(&mut self.complementary, other.complementary);
        accumulate(&mut self.rejected, other.rejected);
        accumulate(&mut self.otherwise_closed, other.otherwise_closed);
        accumulate(&mut self.total, other.total);
    }
}
