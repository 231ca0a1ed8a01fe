use anyhow::{bail, Result};
use plotters::{element::Pie, prelude::*};
use std::path::Path;
use tracing::info;

use super::{draw_err, FONT, NAVY, PINK};
use crate::config::ChartConfig;
use crate::process::rank::Ranking;

/// The two slices of the proportion chart: top countries vs everyone else.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlices {
    pub labels: [String; 2],
    pub sizes: [f64; 2],
    pub colors: [RGBColor; 2],
}

impl PieSlices {
    pub fn from_ranking(ranking: &Ranking) -> Self {
        Self {
            labels: [
                format!("Top {} Countries", ranking.top_n()),
                "All Other Countries".to_string(),
            ],
            sizes: [ranking.top_total() as f64, ranking.other_total() as f64],
            colors: [NAVY, PINK],
        }
    }

    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }

    /// Slice shares in percent.
    pub fn percentages(&self) -> [f64; 2] {
        let total = self.total();
        if total <= 0.0 {
            return [0.0; 2];
        }
        self.sizes.map(|s| s * 100.0 / total)
    }

    pub fn title_lines(top_n: usize, period_label: &str) -> [String; 2] {
        [
            "Proportion of Asylum Applications Received:".to_string(),
            format!("Top {top_n} Countries and All Other Countries, {period_label}"),
        ]
    }
}

/// Degrees, clockwise in screen space; negative turns counter-clockwise.
pub const START_ANGLE: f64 = -165.0;
/// Pixels between the rim and a slice label.
pub const LABEL_GAP: f64 = 14.0;
const LABEL_FONT_PX: u32 = 28;
const EDGE_PAD: f64 = 10.0;
const MAX_RADIUS_SHARE: f64 = 0.38;

/// Where the pie sits inside its drawing area, in backend pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieLayout {
    pub center: (i32, i32),
    pub radius: f64,
}

impl PieLayout {
    /// Largest pie that keeps a label of `widest_label` pixels inside the
    /// area at any slice angle. Labels left of centre are drawn ending at
    /// the anchor, so the rim, the gap and the label all share half the width.
    pub fn fit(origin: (i32, i32), area: (u32, u32), widest_label: u32) -> Self {
        let (w, h) = area;
        let center = (origin.0 + (w / 2) as i32, origin.1 + (h / 2) as i32);
        let room = w as f64 / 2.0 - LABEL_GAP - widest_label as f64 - EDGE_PAD;
        let radius = room.min(w.min(h) as f64 * MAX_RADIUS_SHARE).max(1.0);
        Self { center, radius }
    }

    /// Left and right pixel edge of each slice label, placed the way
    /// `plotters::element::Pie` places them.
    pub fn label_extents(&self, sizes: &[f64; 2], label_widths: [u32; 2]) -> [(i32, i32); 2] {
        let total: f64 = sizes.iter().sum();
        let mut theta = START_ANGLE.to_radians();
        let mut extents = [(0, 0); 2];
        for (i, size) in sizes.iter().enumerate() {
            let ratio = if total > 0.0 { size / total } else { 0.0 };
            let middle = theta + ratio * std::f64::consts::PI;
            theta += ratio * 2.0 * std::f64::consts::PI;
            let anchor =
                ((self.radius + LABEL_GAP) * middle.cos() + self.center.0 as f64).round() as i32;
            let width = label_widths[i] as i32;
            extents[i] = if anchor <= self.center.0 {
                (anchor - width, anchor)
            } else {
                (anchor, anchor + width)
            };
        }
        extents
    }
}

#[tracing::instrument(level = "info", skip(ranking, chart, path), fields(path = %path.as_ref().display()))]
pub fn render_pie<P: AsRef<Path>>(ranking: &Ranking, chart: &ChartConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let slices = PieSlices::from_ranking(ranking);
    if slices.total() <= 0.0 {
        bail!("no applications in {}–{}; nothing to chart", ranking.window.start, ranking.window.end());
    }

    let root = BitMapBackend::new(path, chart.pie_size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut body = root.margin(20, 20, 20, 20);
    for line in PieSlices::title_lines(ranking.top_n(), &chart.period_label) {
        body = body
            .titled(&line, (FONT, 40).into_font().color(&BLACK))
            .map_err(|e| draw_err(path, e))?;
    }

    let label_style = TextStyle::from((FONT, LABEL_FONT_PX).into_font()).color(&BLACK);
    let mut widths = [0u32; 2];
    for (width, label) in widths.iter_mut().zip(&slices.labels) {
        *width = body
            .estimate_text_size(label, &label_style)
            .map_err(|e| draw_err(path, e))?
            .0;
    }

    // Pie ignores the sub-area offset and draws in backend pixels
    let (w, h) = body.dim_in_pixel();
    let layout = PieLayout::fit(body.get_base_pixel(), (w, h), widths[0].max(widths[1]));
    let mut pie = Pie::new(&layout.center, &layout.radius, &slices.sizes, &slices.colors, &slices.labels);
    pie.start_angle(START_ANGLE);
    pie.label_offset(LABEL_GAP);
    pie.label_style(label_style);
    pie.percentages((FONT, 48).into_font().color(&WHITE));
    body.draw(&pie).map_err(|e| draw_err(path, e))?;

    // legend, lower left
    let rows = slices.labels.len() as i32;
    for (i, (label, color)) in slices.labels.iter().zip(&slices.colors).enumerate() {
        let y = h as i32 - 40 - (rows - i as i32) * 44;
        body.draw(&Rectangle::new([(20, y), (52, y + 28)], color.filled()))
            .map_err(|e| draw_err(path, e))?;
        body.draw(&Text::new(label.clone(), (64, y), (FONT, 28).into_font()))
            .map_err(|e| draw_err(path, e))?;
    }

    root.present().map_err(|e| draw_err(path, e))?;
    let [top, other] = slices.percentages();
    info!(top_share = top, other_share = other, radius = layout.radius, "wrote pie chart");
    Ok(())
}
