use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::table::AsylumSummary;

/// A run of consecutive years, `start..start + len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearWindow {
    pub start: i32,
    pub len: u32,
}

impl YearWindow {
    pub fn new(start: i32, len: u32) -> Self {
        Self { start, len }
    }

    /// Last year inside the window. Equal to `start - 1` for an empty window.
    pub fn end(&self) -> i32 {
        self.start + self.len as i32 - 1
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end()).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start..=self.end()
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::new(2017, 7)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedCountry {
    pub asylum: String,
    pub applied: i64,
}

/// Receiving countries ordered by application volume over a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    pub window: YearWindow,
    entries: Vec<RankedCountry>,
    top_n: usize,
}

impl Ranking {
    /// Every country seen in the window, highest volume first.
    pub fn entries(&self) -> &[RankedCountry] {
        &self.entries
    }

    /// The first `top_n` entries, or all of them when there are fewer.
    pub fn top(&self) -> &[RankedCountry] {
        &self.entries[..self.top_n.min(self.entries.len())]
    }

    pub fn rest(&self) -> &[RankedCountry] {
        &self.entries[self.top().len()..]
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn period_total(&self) -> i64 {
        self.entries.iter().map(|e| e.applied).sum()
    }

    pub fn top_total(&self) -> i64 {
        self.top().iter().map(|e| e.applied).sum()
    }

    pub fn other_total(&self) -> i64 {
        self.period_total() - self.top_total()
    }

    /// ISO codes of every asylum country in the window, in rank order.
    pub fn countries(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.asylum.as_str()).collect()
    }

    /// 1-based rank of `asylum`, if it received any rows in the window.
    pub fn position(&self, asylum: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.asylum == asylum)
            .map(|i| i + 1)
    }
}

/// Restrict to `window`, sum applications per asylum country, and sort them
/// by volume (descending, ties by code).
pub fn rank(summaries: &[AsylumSummary], window: YearWindow, top_n: usize) -> Ranking {
    let mut volumes: BTreeMap<&str, i64> = BTreeMap::new();
    for s in summaries.iter().filter(|s| window.contains(s.key.year)) {
        *volumes.entry(s.key.asylum.as_str()).or_default() += s.applied.unwrap_or(0);
    }

    let mut entries: Vec<RankedCountry> = volumes
        .into_iter()
        .map(|(asylum, applied)| RankedCountry {
            asylum: asylum.to_string(),
            applied,
        })
        .collect();
    // BTreeMap order is by code, and the sort is stable, so ties stay alphabetical.
    entries.sort_by(|a, b| b.applied.cmp(&a.applied));

    let ranking = Ranking {
        window,
        entries,
        top_n,
    };
    info!(
        window_start = window.start,
        window_end = window.end(),
        countries = ranking.entries.len(),
        period_total = ranking.period_total(),
        top_total = ranking.top_total(),
        other_total = ranking.other_total(),
        "ranked receiving countries"
    );
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{AsylumKey, DecisionCounts};

    fn summary(year: i32, asylum: &str, applied: Option<i64>) -> AsylumSummary {
        AsylumSummary {
            key: AsylumKey::new(year, asylum),
            applied,
            counts: DecisionCounts::default(),
            backlog: None,
            fvp: None,
        }
    }

    #[test]
    fn window_is_closed_seven_years() {
        let w = YearWindow::default();
        assert_eq!(w.end(), 2023);
        assert!(w.contains(2017) && w.contains(2023));
        assert!(!w.contains(2016) && !w.contains(2024));
        assert_eq!(w.years().count(), 7);
    }

    #[test]
    fn filters_window_and_sorts_descending() {
        let rows = vec![
            summary(2016, "GBR", Some(1_000_000)),
            summary(2017, "GBR", Some(10)),
            summary(2023, "GBR", Some(15)),
            summary(2020, "DEU", Some(40)),
            summary(2021, "FRA", None),
            summary(2024, "FRA", Some(99)),
            summary(2019, "ITA", Some(25)),
        ];

        let ranking = rank(&rows, YearWindow::default(), 20);

        assert_eq!(ranking.countries(), vec!["DEU", "GBR", "ITA", "FRA"]);
        assert_eq!(ranking.entries()[1].applied, 25);
        assert_eq!(ranking.entries()[3].applied, 0);
        assert_eq!(ranking.period_total(), 90);
        assert_eq!(ranking.position("ITA"), Some(3));
        assert_eq!(ranking.position("ESP"), None);
    }

    #[test]
    fn top_set_bounded_and_other_is_remainder() {
        let rows: Vec<AsylumSummary> = (0..30)
            .map(|i| summary(2020, &format!("C{:02}", i), Some(100 + i as i64)))
            .collect();

        let ranking = rank(&rows, YearWindow::default(), 20);
        let top = ranking.top();

        assert_eq!(top.len(), 20);
        assert!(top.windows(2).all(|w| w[0].applied >= w[1].applied));
        assert_eq!(top[0].asylum, "C29");
        assert_eq!(ranking.rest().len(), 10);
        assert_eq!(
            ranking.other_total(),
            ranking.period_total() - ranking.top_total()
        );
        assert_eq!(ranking.other_total(), (100..110).sum::<i64>());
    }

    #[test]
    fn fewer_countries_than_top_n() {
        let ranking = rank(&[summary(2022, "GBR", Some(5))], YearWindow::default(), 20);
        assert_eq!(ranking.top().len(), 1);
        assert_eq!(ranking.other_total(), 0);
    }

    #[test]
    fn ties_broken_by_code() {
        let ranking = rank(
            &[
                summary(2022, "SWE", Some(5)),
                summary(2022, "AUT", Some(5)),
            ],
            YearWindow::default(),
            20,
        );
        assert_eq!(ranking.countries(), vec!["AUT", "SWE"]);
    }
}
