use tracing::info;

use crate::table::{
    accumulate, ApplicationRecord, AsylumSummary, DecisionRecord, JoinedRow,
};

/// Anything that can be attributed to a receiving country and a year.
pub trait SnapshotRow {
    fn year(&self) -> i32;
    fn asylum(&self) -> &str;
    fn applied(&self) -> Option<i64> {
        None
    }
    fn total_decisions(&self) -> Option<i64> {
        None
    }
}

impl SnapshotRow for ApplicationRecord {
    fn year(&self) -> i32 {
        self.key.year
    }
    fn asylum(&self) -> &str {
        &self.key.asylum
    }
    fn applied(&self) -> Option<i64> {
        self.applied
    }
}

impl SnapshotRow for DecisionRecord {
    fn year(&self) -> i32 {
        self.key.year
    }
    fn asylum(&self) -> &str {
        &self.key.asylum
    }
    fn total_decisions(&self) -> Option<i64> {
        self.counts.total
    }
}

impl SnapshotRow for JoinedRow {
    fn year(&self) -> i32 {
        self.key.year
    }
    fn asylum(&self) -> &str {
        &self.key.asylum
    }
    fn applied(&self) -> Option<i64> {
        self.applied
    }
    fn total_decisions(&self) -> Option<i64> {
        self.decisions.as_ref().and_then(|d| d.counts.total)
    }
}

impl SnapshotRow for AsylumSummary {
    fn year(&self) -> i32 {
        self.key.year
    }
    fn asylum(&self) -> &str {
        &self.key.asylum
    }
    fn applied(&self) -> Option<i64> {
        self.applied
    }
    fn total_decisions(&self) -> Option<i64> {
        self.counts.total
    }
}

/// Applications and decisions for one receiving country in one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountrySnapshot {
    pub asylum: String,
    pub year: i32,
    pub applied: Option<i64>,
    pub total_decisions: Option<i64>,
}

impl CountrySnapshot {
    pub fn of<R: SnapshotRow>(rows: &[R], asylum: &str, year: i32) -> Self {
        let mut snap = Self {
            asylum: asylum.to_string(),
            year,
            applied: None,
            total_decisions: None,
        };
        for row in rows
            .iter()
            .filter(|r| r.year() == year && r.asylum() == asylum)
        {
            accumulate(&mut snap.applied, row.applied());
            accumulate(&mut snap.total_decisions, row.total_decisions());
        }
        snap
    }

    fn merge(mut self, other: Self) -> Self {
        accumulate(&mut self.applied, other.applied);
        accumulate(&mut self.total_decisions, other.total_decisions);
        self
    }

    pub fn log(&self, stage: &str) {
        info!(
            stage,
            asylum = %self.asylum,
            year = self.year,
            applied = ?self.applied,
            total_decisions = ?self.total_decisions,
            "country snapshot"
        );
    }
}

/// Snapshot drawn from separate application and decision tables.
pub fn country_snapshot<A: SnapshotRow, D: SnapshotRow>(
    applications: &[A],
    decisions: &[D],
    asylum: &str,
    year: i32,
) -> CountrySnapshot {
    CountrySnapshot::of(applications, asylum, year).merge(CountrySnapshot::of(decisions, asylum, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{DecisionCounts, OriginAsylumKey};

    #[test]
    fn sums_only_the_requested_country_and_year() {
        let apps = vec![
            ApplicationRecord {
                key: OriginAsylumKey::new(2022, "AFG", "GBR"),
                applied: Some(60),
            },
            ApplicationRecord {
                key: OriginAsylumKey::new(2022, "ALB", "GBR"),
                applied: Some(40),
            },
            ApplicationRecord {
                key: OriginAsylumKey::new(2023, "AFG", "GBR"),
                applied: Some(1),
            },
            ApplicationRecord {
                key: OriginAsylumKey::new(2022, "AFG", "DEU"),
                applied: Some(7),
            },
        ];
        let decs = vec![DecisionRecord {
            key: OriginAsylumKey::new(2022, "AFG", "GBR"),
            counts: DecisionCounts::new(30, 10, 50, 5),
        }];

        let snap = country_snapshot(&apps, &decs, "GBR", 2022);

        assert_eq!(snap.applied, Some(100));
        assert_eq!(snap.total_decisions, Some(95));
    }

    #[test]
    fn absent_country_has_no_figures() {
        let apps: Vec<ApplicationRecord> = Vec::new();
        let snap = CountrySnapshot::of(&apps, "GBR", 2022);
        assert_eq!(snap.applied, None);
        assert_eq!(snap.total_decisions, None);
    }
}
