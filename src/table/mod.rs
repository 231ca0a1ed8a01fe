pub mod measure;
pub mod types;

pub use measure::{accumulate, ratio};
pub use types::{
    ApplicationRecord, AsylumKey, AsylumSummary, DecisionCounts, DecisionRates, DecisionRecord,
    JoinedRow, OriginAsylumKey, RatedDecision,
};
