pub mod line;
pub mod pie;

use anyhow::anyhow;
use plotters::style::RGBColor;
use std::{fmt::Debug, path::Path};

pub use line::{render_line, LinePoint, LinePoints};
pub use pie::{render_pie, PieSlices};

pub const NAVY: RGBColor = RGBColor(0x00, 0x26, 0x64);
pub const PINK: RGBColor = RGBColor(0xFC, 0x9D, 0x9A);
pub const PURPLE: RGBColor = RGBColor(0x73, 0x22, 0x82);

pub const FONT: &str = "sans-serif";

/// Plotters errors are generic over the backend; flatten them into `anyhow`
/// with the output path attached.
pub(crate) fn draw_err<E: Debug>(path: &Path, err: E) -> anyhow::Error {
    anyhow!("drawing {}: {:?}", path.display(), err)
}
