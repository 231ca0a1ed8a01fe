use arrow::datatypes::DataType;

pub const YEAR: &str = "Year";
pub const ORIGIN_ISO: &str = "Country of origin (ISO)";
pub const ASYLUM_ISO: &str = "Country of asylum (ISO)";

pub const APPLIED: &str = "applied";

pub const RECOGNIZED: &str = "Recognized decisions";
pub const COMPLEMENTARY: &str = "Complementary protection";
pub const REJECTED: &str = "Rejected decisions";
pub const OTHERWISE_CLOSED: &str = "Otherwise closed";
pub const TOTAL_DECISIONS: &str = "Total decisions";

/// How a required column is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Year,
    Code,
    Count,
}

impl ColumnKind {
    pub fn data_type(self) -> DataType {
        match self {
            ColumnKind::Year | ColumnKind::Count => DataType::Int64,
            ColumnKind::Code => DataType::Utf8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> ColumnSpec {
    ColumnSpec { name, kind }
}

/// Columns read from the applications file, in projection order.
pub const APPLICATION_COLUMNS: [ColumnSpec; 4] = [
    col(YEAR, ColumnKind::Year),
    col(ORIGIN_ISO, ColumnKind::Code),
    col(ASYLUM_ISO, ColumnKind::Code),
    col(APPLIED, ColumnKind::Count),
];

/// Columns read from the decisions file, in projection order.
pub const DECISION_COLUMNS: [ColumnSpec; 8] = [
    col(YEAR, ColumnKind::Year),
    col(ORIGIN_ISO, ColumnKind::Code),
    col(ASYLUM_ISO, ColumnKind::Code),
    col(RECOGNIZED, ColumnKind::Count),
    col(COMPLEMENTARY, ColumnKind::Count),
    col(REJECTED, ColumnKind::Count),
    col(OTHERWISE_CLOSED, ColumnKind::Count),
    col(TOTAL_DECISIONS, ColumnKind::Count),
];

/// Trim whitespace, a leading BOM and outer quotes from a header cell.
pub fn clean_header(raw: &str) -> &str {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
