// src/table/types.rs

use std::fmt;

/// Grouping key at full granularity: one row per year, origin and asylum country.
///
/// Field order matters: the derived `Ord` sorts by year, then origin, then asylum,
/// which is the order aggregated tables come out in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OriginAsylumKey {
    pub year: i32,
    /// ISO3 code of the claimant's country of origin.
    pub origin: String,
    /// ISO3 code of the receiving country.
    pub asylum: String,
}

impl OriginAsylumKey {
    pub fn new(year: i32, origin: impl Into<String>, asylum: impl Into<String>) -> Self {
        Self {
            year,
            origin: origin.into(),
            asylum: asylum.into(),
        }
    }

    /// Drop the origin, keeping only the receiving-country key.
    pub fn to_asylum_key(&self) -> AsylumKey {
        AsylumKey {
            year: self.year,
            asylum: self.asylum.clone(),
        }
    }
}

impl fmt::Display for OriginAsylumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}→{}", self.year, self.origin, self.asylum)
    }
}

/// Grouping key with origin summed away.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AsylumKey {
    pub year: i32,
    pub asylum: String,
}

impl AsylumKey {
    pub fn new(year: i32, asylum: impl Into<String>) -> Self {
        Self {
            year,
            asylum: asylum.into(),
        }
    }
}

impl fmt::Display for AsylumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.asylum)
    }
}

/// One row of the applications table.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRecord {
    pub key: OriginAsylumKey,
    pub applied: Option<i64>,
}

/// The five decision measures. A `None` is a missing cell, not a zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionCounts {
    pub recognized: Option<i64>,
    pub complementary: Option<i64>,
    pub rejected: Option<i64>,
    pub otherwise_closed: Option<i64>,
    pub total: Option<i64>,
}

impl DecisionCounts {
    pub fn new(recognized: i64, complementary: i64, rejected: i64, otherwise_closed: i64) -> Self {
        Self {
            recognized: Some(recognized),
            complementary: Some(complementary),
            rejected: Some(rejected),
            otherwise_closed: Some(otherwise_closed),
            total: Some(recognized + complementary + rejected + otherwise_closed),
        }
    }

    /// Row-wise sum of the four sub-counts, missing cells counted as zero.
    pub fn component_sum(&self) -> i64 {
        [
            self.recognized,
            self.complementary,
            self.rejected,
            self.otherwise_closed,
        ]
        .iter()
        .flatten()
        .sum()
    }
}

/// One row of the decisions table.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub key: OriginAsylumKey,
    pub counts: DecisionCounts,
}

/// Share of each outcome in the total decisions. `None` marks an undefined rate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecisionRates {
    pub granted: Option<f64>,
    pub other_protection: Option<f64>,
    pub refused: Option<f64>,
    pub otherwise_closed: Option<f64>,
}

impl DecisionRates {
    pub fn as_array(&self) -> [Option<f64>; 4] {
        [
            self.granted,
            self.other_protection,
            self.refused,
            self.otherwise_closed,
        ]
    }

    pub fn is_undefined(&self) -> bool {
        self.as_array().iter().all(Option::is_none)
    }
}

/// Aggregated decisions for one key together with their rates.
#[derive(Debug, Clone, PartialEq)]
pub struct RatedDecision {
    pub key: OriginAsylumKey,
    pub counts: DecisionCounts,
    pub rates: DecisionRates,
}

/// Applications left-joined with decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub key: OriginAsylumKey,
    pub applied: Option<i64>,
    /// `None` when the decisions table has no row for `key`.
    pub decisions: Option<RatedDecision>,
}

/// Per receiving country and year, origins summed away.
#[derive(Debug, Clone, PartialEq)]
pub struct AsylumSummary {
    pub key: AsylumKey,
    pub applied: Option<i64>,
    pub counts: DecisionCounts,
    /// Total decisions minus applications.
    pub backlog: Option<i64>,
    /// Total decisions divided by applications.
    pub fvp: Option<f64>,
}
