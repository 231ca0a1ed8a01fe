use std::collections::BTreeMap;
use tracing::debug;

use crate::table::{
    accumulate, ratio, ApplicationRecord, AsylumKey, AsylumSummary, DecisionCounts,
    DecisionRecord, JoinedRow, OriginAsylumKey,
};

/// Sum `applied` per (year, origin, asylum). Output is sorted by key.
pub fn aggregate_applications(records: &[ApplicationRecord]) -> Vec<ApplicationRecord> {
    let mut groups: BTreeMap<&OriginAsylumKey, Option<i64>> = BTreeMap::new();
    for rec in records {
        accumulate(groups.entry(&rec.key).or_default(), rec.applied);
    }

    debug!(rows = records.len(), groups = groups.len(), "aggregated applications");
    groups
        .into_iter()
        .map(|(key, applied)| ApplicationRecord {
            key: key.clone(),
            applied,
        })
        .collect()
}

/// Sum every decision column per (year, origin, asylum). Output is sorted by key.
pub fn aggregate_decisions(records: &[DecisionRecord]) -> Vec<DecisionRecord> {
    let mut groups: BTreeMap<&OriginAsylumKey, DecisionCounts> = BTreeMap::new();
    for rec in records {
        groups.entry(&rec.key).or_default().accumulate(&rec.counts);
    }

    debug!(rows = records.len(), groups = groups.len(), "aggregated decisions");
    groups
        .into_iter()
        .map(|(key, counts)| DecisionRecord {
            key: key.clone(),
            counts,
        })
        .collect()
}

/// Collapse joined rows to (year, asylum), summing across origins, then derive
/// backlog and FVP.
pub fn collapse_to_asylum(rows: &[JoinedRow]) -> Vec<AsylumSummary> {
    let mut groups: BTreeMap<AsylumKey, (Option<i64>, DecisionCounts)> = BTreeMap::new();
    for row in rows {
        let (applied, counts) = groups.entry(row.key.to_asylum_key()).or_default();
        accumulate(applied, row.applied);
        if let Some(decisions) = &row.decisions {
            counts.accumulate(&decisions.counts);
        }
    }

    debug!(rows = rows.len(), groups = groups.len(), "collapsed to asylum country");
    groups
        .into_iter()
        .map(|(key, (applied, counts))| {
            let backlog = match (counts.total, applied) {
                (Some(total), Some(applied)) => Some(total - applied),
                _ => None,
            };
            let fvp = ratio(counts.total, applied);
            AsylumSummary {
                key,
                applied,
                counts,
                backlog,
                fvp,
            }
        })
        .collect()
}
