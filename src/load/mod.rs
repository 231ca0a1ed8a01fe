// src/load/mod.rs
pub mod arrow;
pub mod columns;

use anyhow::{anyhow, Result};
use ::arrow::{
    array::{Int64Array, StringArray},
    record_batch::RecordBatch,
};
use std::path::Path;
use tracing::{info, warn};

use self::arrow::{int64_column, int_at, read_batches, str_at, utf8_column};
use self::columns::*;
use crate::table::{ApplicationRecord, DecisionCounts, DecisionRecord, OriginAsylumKey};

/// The three key columns, which sit at the front of every projection.
struct KeyColumns<'a> {
    year: &'a Int64Array,
    origin: &'a StringArray,
    asylum: &'a StringArray,
}

impl<'a> KeyColumns<'a> {
    fn from_batch(batch: &'a RecordBatch) -> Result<Self> {
        Ok(Self {
            year: int64_column(batch, 0, YEAR)?,
            origin: utf8_column(batch, 1, ORIGIN_ISO)?,
            asylum: utf8_column(batch, 2, ASYLUM_ISO)?,
        })
    }

    /// `Ok(None)` when any key cell is empty; such rows never reach a group.
    fn key_at(&self, row: usize) -> Result<Option<OriginAsylumKey>> {
        let (Some(year), Some(origin), Some(asylum)) = (
            int_at(self.year, row),
            str_at(self.origin, row),
            str_at(self.asylum, row),
        ) else {
            return Ok(None);
        };
        let year = i32::try_from(year).map_err(|_| anyhow!("year {} out of range", year))?;
        Ok(Some(OriginAsylumKey::new(year, origin, asylum)))
    }
}

fn log_loaded(path: &Path, kept: usize, dropped: usize) {
    if dropped > 0 {
        warn!(
            path = %path.display(),
            dropped,
            "rows with an empty year or country code were dropped"
        );
    }
    info!(path = %path.display(), rows = kept, "loaded");
}

/// Load the applications file.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_applications<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicationRecord>> {
    let path = path.as_ref();
    let batches = read_batches(path, &APPLICATION_COLUMNS)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for batch in &batches {
        let keys = KeyColumns::from_batch(batch)?;
        let applied = int64_column(batch, 3, APPLIED)?;
        for row in 0..batch.num_rows() {
            match keys.key_at(row)? {
                Some(key) => records.push(ApplicationRecord {
                    key,
                    applied: int_at(applied, row),
                }),
                None => dropped += 1,
            }
        }
    }

    log_loaded(path, records.len(), dropped);
    Ok(records)
}

/// Load the decisions file. The source `Total decisions` is kept as read;
/// see [`crate::process::reconcile`] for the correction.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_decisions<P: AsRef<Path>>(path: P) -> Result<Vec<DecisionRecord>> {
    let path = path.as_ref();
    let batches = read_batches(path, &DECISION_COLUMNS)?;

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for batch in &batches {
        let keys = KeyColumns::from_batch(batch)?;
        let recognized = int64_column(batch, 3, RECOGNIZED)?;
        let complementary = int64_column(batch, 4, COMPLEMENTARY)?;
        let rejected = int64_column(batch, 5, REJECTED)?;
        let otherwise_closed = int64_column(batch, 6, OTHERWISE_CLOSED)?;
        let total = int64_column(batch, 7, TOTAL_DECISIONS)?;

        for row in 0..batch.num_rows() {
            let Some(key) = keys.key_at(row)? else {
                dropped += 1;
                continue;
            };
            records.push(DecisionRecord {
                key,
                counts: DecisionCounts {
                    recognized: int_at(recognized, row),
                    complementary: int_at(complementary, row),
                    rejected: int_at(rejected, row),
                    otherwise_closed: int_at(otherwise_closed, row),
                    total: int_at(total, row),
                },
            });
        }
    }

    log_loaded(path, records.len(), dropped);
    Ok(records)
}
