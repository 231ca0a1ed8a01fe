use anyhow::{bail, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use super::{draw_err, FONT, NAVY, PURPLE};
use crate::config::ChartConfig;
use crate::process::rank::Ranking;
use crate::report::format_thousands;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePoint {
    pub x: usize,
    pub asylum: String,
    pub applied: i64,
    /// Volume with thousands separators, drawn above the point.
    pub label: String,
    pub highlighted: bool,
}

/// One point per top-ranked country, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePoints {
    pub points: Vec<LinePoint>,
}

impl LinePoints {
    pub fn from_ranking(ranking: &Ranking, focus_country: &str) -> Self {
        let points = ranking
            .top()
            .iter()
            .enumerate()
            .map(|(x, entry)| LinePoint {
                x,
                asylum: entry.asylum.clone(),
                applied: entry.applied,
                label: format_thousands(entry.applied),
                highlighted: entry.asylum == focus_country,
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Upper end of the y axis, leaving headroom for the annotations.
    pub fn y_max(&self) -> f64 {
        let max = self.points.iter().map(|p| p.applied).max().unwrap_or(0);
        (max as f64 * 1.15).max(1.0)
    }

    /// Country code for an x-axis key point; blank between integer positions.
    pub fn code_at(&self, x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        self.points
            .get(idx as usize)
            .map(|p| p.asylum.clone())
            .unwrap_or_default()
    }
}

const BOX_PAD: i32 = 14;
const BOX_TOP: i32 = -68;
const BOX_BOTTOM: i32 = -22;

/// Box corners and text origin, relative to the point, for a label
/// `text_width` pixels wide. Centred horizontally over the point.
pub fn annotation_box(text_width: u32) -> ([(i32, i32); 2], (i32, i32)) {
    let half_text = (text_width as i32 + 1) / 2;
    let half = half_text + BOX_PAD;
    ([(-half, BOX_TOP), (half, BOX_BOTTOM)], (-half_text, BOX_TOP + 8))
}

#[tracing::instrument(level = "info", skip(ranking, chart, path), fields(path = %path.as_ref().display()))]
pub fn render_line<P: AsRef<Path>>(ranking: &Ranking, chart: &ChartConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    let series = LinePoints::from_ranking(ranking, &chart.focus_country);
    if series.is_empty() {
        bail!("no countries ranked; nothing to chart");
    }

    let root = BitMapBackend::new(path, chart.line_size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let n = series.len();
    let mut ctx = ChartBuilder::on(&root)
        .caption(
            format!(
                "Asylum Applications: Top {} Countries: {}",
                ranking.top_n(),
                chart.period_label
            ),
            (FONT, 56).into_font(),
        )
        .margin(60)
        .x_label_area_size(160)
        .y_label_area_size(100)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..series.y_max())
        .map_err(|e| draw_err(path, e))?;

    let code_at = |x: &f64| series.code_at(*x);
    let blank = |_: &f64| String::new();
    ctx.configure_mesh()
        .disable_mesh()
        .disable_y_axis()
        .x_labels(n)
        .x_label_formatter(&code_at)
        .y_label_formatter(&blank)
        .x_label_style((FONT, 40).into_font())
        .x_desc("Country of Asylum (ISO)")
        .y_desc("Applications")
        .axis_desc_style((FONT, 40).into_font())
        .draw()
        .map_err(|e| draw_err(path, e))?;

    let coords = |p: &LinePoint| (p.x as f64, p.applied as f64);

    ctx.draw_series(LineSeries::new(
        series.points.iter().map(coords),
        NAVY.stroke_width(5),
    ))
    .map_err(|e| draw_err(path, e))?;
    ctx.draw_series(
        series
            .points
            .iter()
            .map(|p| Circle::new(coords(p), 10, NAVY.filled())),
    )
    .map_err(|e| draw_err(path, e))?;

    let label_font = TextStyle::from((FONT, 32).into_font());
    let mut text_widths = Vec::with_capacity(n);
    for p in &series.points {
        let (w, _) = root
            .estimate_text_size(&p.label, &label_font)
            .map_err(|e| draw_err(path, e))?;
        text_widths.push(w);
    }

    // volume annotations; the focus country gets an inverted box
    ctx.draw_series(series.points.iter().zip(&text_widths).map(|(p, &width)| {
        let (fill, border, text, border_width): (_, _, &'static RGBColor, _) = if p.highlighted {
            (PURPLE, PURPLE, &WHITE, 3)
        } else {
            (WHITE, NAVY, &BLACK, 2)
        };
        let (corners, origin) = annotation_box(width);
        EmptyElement::at(coords(p))
            + Rectangle::new(corners, fill.filled())
            + Rectangle::new(corners, border.stroke_width(border_width))
            + Text::new(p.label.clone(), origin, label_font.color(text))
    }))
    .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))?;
    info!(
        points = n,
        highlighted = series.points.iter().any(|p| p.highlighted),
        "wrote line chart"
    );
    Ok(())
}
