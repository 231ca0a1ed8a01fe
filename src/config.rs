// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::process::rank::YearWindow;

/// Optional overrides, read from the working directory when present.
pub const CONFIG_FILE: &str = "asylumstats.yaml";

/// Pixel size and labels of the two charts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub pie_size: (u32, u32),
    pub line_size: (u32, u32),
    /// Human label for the window, used in chart titles.
    pub period_label: String,
    /// Asylum country whose annotation is highlighted on the line chart.
    pub focus_country: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            pie_size: (1000, 1500),
            line_size: (5000, 2000),
            period_label: "2017 to June 2023".to_string(),
            focus_country: "GBR".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub applications_csv: PathBuf,
    pub decisions_csv: PathBuf,
    pub window: YearWindow,
    pub top_n: usize,
    pub pie_chart_png: PathBuf,
    pub line_chart_png: PathBuf,
    pub chart: ChartConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            applications_csv: PathBuf::from("asylum-applications.csv"),
            decisions_csv: PathBuf::from("asylum-decisions.csv"),
            window: YearWindow::default(),
            top_n: 20,
            pie_chart_png: PathBuf::from("AppVolumesPieChart.png"),
            line_chart_png: PathBuf::from("Applications2017To23.png"),
            chart: ChartConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML config; any key left out keeps its default.
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing pipeline config")
    }

    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config =
            Self::from_yaml(&text).with_context(|| format!("loading {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The focus country's years reported by the spot checks: the last two of the window.
    pub fn snapshot_years(&self) -> Vec<i32> {
        let years: Vec<i32> = self.window.years().collect();
        years[years.len().saturating_sub(2)..].to_vec()
    }
}
