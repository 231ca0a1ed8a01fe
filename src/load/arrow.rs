use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, Int64Array, StringArray},
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs::File, path::Path, sync::Arc};
use tracing::debug;

use super::columns::{clean_header, ColumnSpec};

pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Read only the header row of `path`, returning column names in file order.
pub fn read_headers(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(file, Some(0))
        .with_context(|| format!("reading header row of {}", path.display()))?;
    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Build a full-width schema for a file with `headers`, typing the `wanted`
/// columns and leaving everything else as Utf8.
///
/// Returns the schema and the projection (file column index per wanted column).
pub fn project_schema(headers: &[String], wanted: &[ColumnSpec]) -> Result<(Schema, Vec<usize>)> {
    let mut types = vec![DataType::Utf8; headers.len()];
    let mut projection = Vec::with_capacity(wanted.len());

    for spec in wanted {
        let idx = headers
            .iter()
            .position(|h| clean_header(h) == spec.name)
            .ok_or_else(|| anyhow!("missing column `{}`", spec.name))?;
        types[idx] = spec.kind.data_type();
        projection.push(idx);
    }

    let fields: Vec<Field> = headers
        .iter()
        .zip(types)
        .map(|(name, ty)| Field::new(name, ty, true))
        .collect();
    Ok((Schema::new(fields), projection))
}

/// Decode the `wanted` columns of a CSV file into record batches.
///
/// Columns in every batch follow the order of `wanted`.
pub fn read_batches(path: &Path, wanted: &[ColumnSpec]) -> Result<Vec<RecordBatch>> {
    let headers = read_headers(path)?;
    let (schema, projection) = project_schema(&headers, wanted)
        .with_context(|| format!("checking columns of {}", path.display()))?;

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .with_projection(projection)
        .build(file)
        .with_context(|| format!("building CSV reader for {}", path.display()))?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing {}", path.display()))?;

    debug!(
        path = %path.display(),
        batches = batches.len(),
        rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>(),
        "decoded CSV"
    );
    Ok(batches)
}

pub fn int64_column<'a>(batch: &'a RecordBatch, idx: usize, name: &str) -> Result<&'a Int64Array> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| anyhow!("column `{}` was not decoded as Int64", name))
}

pub fn utf8_column<'a>(batch: &'a RecordBatch, idx: usize, name: &str) -> Result<&'a StringArray> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("column `{}` was not decoded as Utf8", name))
}

pub fn int_at(arr: &Int64Array, row: usize) -> Option<i64> {
    arr.is_valid(row).then(|| arr.value(row))
}

/// Trimmed cell text; empty cells count as missing.
pub fn str_at(arr: &StringArray, row: usize) -> Option<&str> {
    if arr.is_null(row) {
        return None;
    }
    let s = arr.value(row).trim();
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::columns::{ColumnKind, APPLICATION_COLUMNS};

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn projection_follows_wanted_order() -> Result<()> {
        let hs = headers(&[
            "applied",
            "Authority",
            "Country of asylum (ISO)",
            "\u{feff}Year",
            "Country of origin (ISO)",
        ]);
        let (schema, projection) = project_schema(&hs, &APPLICATION_COLUMNS)?;

        assert_eq!(projection, vec![3, 4, 2, 0]);
        assert_eq!(schema.field(0).data_type(), &ColumnKind::Count.data_type());
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Int64);
        Ok(())
    }

    #[test]
    fn missing_required_column_is_named() {
        let hs = headers(&["Year", "Country of origin (ISO)", "applied"]);
        let err = project_schema(&hs, &APPLICATION_COLUMNS).unwrap_err();
        assert!(err.to_string().contains("Country of asylum (ISO)"));
    }
}
