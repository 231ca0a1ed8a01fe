use tracing::{info, warn};

use crate::table::RatedDecision;

/// Tolerance for the four rates summing to one.
pub const RATE_SUM_TOLERANCE: f64 = 1e-9;

/// Tally of rated rows by whether their rates add up.
///
/// Rows are never altered or removed by the audit; it only counts them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateAudit {
    pub rows: usize,
    pub balanced: usize,
    /// Zero or missing total, so no rate could be computed.
    pub undefined: usize,
    /// Some rates defined, but together they miss 1.0 (usually a missing sub-count).
    pub unbalanced: usize,
}

impl RateAudit {
    pub fn of(rows: &[RatedDecision]) -> Self {
        let mut audit = Self {
            rows: rows.len(),
            ..Default::default()
        };
        for row in rows {
            if row.rates.is_undefined() {
                audit.undefined += 1;
                continue;
            }
            match row.rates.sum() {
                Some(sum) if (sum - 1.0).abs() <= RATE_SUM_TOLERANCE => audit.balanced += 1,
                _ => audit.unbalanced += 1,
            }
        }
        audit
    }

    /// Rows that do not sum to exactly one, for whatever reason.
    pub fn not_summing_to_one(&self) -> usize {
        self.undefined + self.unbalanced
    }

    pub fn log(&self) {
        if self.unbalanced > 0 {
            warn!(
                rows = self.rows,
                balanced = self.balanced,
                undefined = self.undefined,
                unbalanced = self.unbalanced,
                off_one = self.not_summing_to_one(),
                "decision rates do not sum to one on some rows; kept as is"
            );
        } else {
            info!(
                rows = self.rows,
                balanced = self.balanced,
                undefined = self.undefined,
                off_one = self.not_summing_to_one(),
                "decision rate audit"
            );
        }
    }
}
