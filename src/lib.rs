//! Reconciles UNHCR asylum application and decision tables, aggregates them
//! per receiving country, and charts where applications went.

pub mod config;
pub mod load;
pub mod process;
pub mod render;
pub mod report;
pub mod table;

pub use config::{ChartConfig, PipelineConfig};
pub use process::{Pipeline, PipelineOutput};
