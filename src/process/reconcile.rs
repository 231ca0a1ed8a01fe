use tracing::{info, warn};

use crate::table::DecisionRecord;

/// How far the published totals were from their own components.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub rows: usize,
    /// Rows whose published total differed from the recomputed one.
    pub mismatched_rows: usize,
    /// Σ(published − recomputed) over rows that had a published total.
    pub net_difference: i64,
    /// Rows with no published total at all.
    pub missing_source_total: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.mismatched_rows == 0
    }
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub records: Vec<DecisionRecord>,
    pub report: ReconcileReport,
}

/// Replace every published `total` with the sum of the four sub-counts.
///
/// No row is dropped. Afterwards `total` is always `Some`.
pub fn reconcile(records: &[DecisionRecord]) -> Reconciled {
    let mut report = ReconcileReport {
        rows: records.len(),
        ..Default::default()
    };

    let records = records
        .iter()
        .map(|rec| {
            let recomputed = rec.counts.component_sum();
            match rec.counts.total {
                Some(published) if published != recomputed => {
                    report.mismatched_rows += 1;
                    report.net_difference += published - recomputed;
                }
                Some(_) => {}
                None => report.missing_source_total += 1,
            }

            let mut out = rec.clone();
            out.counts.total = Some(recomputed);
            out
        })
        .collect();

    if report.is_clean() {
        info!(rows = report.rows, "decision totals match their components");
    } else {
        warn!(
            rows = report.rows,
            mismatched = report.mismatched_rows,
            net_difference = report.net_difference,
            missing_source_total = report.missing_source_total,
            "published decision totals disagree with their components; recomputed"
        );
    }

    Reconciled { records, report }
}
