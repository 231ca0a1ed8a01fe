pub mod audit;
pub mod format;
pub mod snapshot;
pub mod table;

pub use audit::RateAudit;
pub use format::{format_share, format_thousands};
pub use snapshot::{country_snapshot, CountrySnapshot, SnapshotRow};
pub use table::{print_ranking, ranking_table};
