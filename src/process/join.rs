use std::collections::HashMap;
use tracing::debug;

use crate::table::{ApplicationRecord, JoinedRow, OriginAsylumKey, RatedDecision};

/// Left join: every application row is kept exactly once, in input order,
/// with the matching decisions attached when the key exists.
///
/// Both sides are expected to be aggregated already, so keys are unique.
pub fn left_join(applications: &[ApplicationRecord], decisions: &[RatedDecision]) -> Vec<JoinedRow> {
    let by_key: HashMap<&OriginAsylumKey, &RatedDecision> =
        decisions.iter().map(|d| (&d.key, d)).collect();

    let rows: Vec<JoinedRow> = applications
        .iter()
        .map(|app| JoinedRow {
            key: app.key.clone(),
            applied: app.applied,
            decisions: by_key.get(&app.key).map(|d| (*d).clone()),
        })
        .collect();

    let matched = rows.iter().filter(|r| r.decisions.is_some()).count();
    debug!(
        rows = rows.len(),
        matched,
        unmatched = rows.len() - matched,
        "joined applications with decisions"
    );
    rows
}
