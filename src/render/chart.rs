use std::fmt::Write;

use super::escape_html;
use crate::config::ChartSettings;
use crate::models::{MetricScores, MAX_SCORE, METRIC_COUNT};

/// Margin around the plot area on every side.
pub const PADDING: f64 = 60.0;

const ACCENT: &str = "#6366f1";
const POINT_CORE: &str = "#1e1e30";
const GRID_STROKE: &str = "rgba(255, 255, 255, 0.1)";
const Y_LABEL_FILL: &str = "#6b6b85";
const X_LABEL_FILL: &str = "#a0a0b8";
const GRID_STEPS: u32 = 5;
const LABEL_LINE_STEP: f64 = 15.0;

/// Legend swatch colours, cycled by metric position.
pub const LEGEND_COLORS: [&str; 5] = [
    "rgba(99, 102, 241, 1)",
    "rgba(139, 92, 246, 1)",
    "rgba(16, 185, 129, 1)",
    "rgba(245, 158, 11, 1)",
    "rgba(239, 68, 68, 1)",
];

/// Smallest drawable edge: the padding plus one pixel per slot.
const MIN_EDGE: f64 = PADDING * 2.0 + METRIC_COUNT as f64;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: &'static str,
    pub value: u8,
    pub x: f64,
    pub y: f64,
}

/// Pixel layout of the score chart. Pure; no drawing.
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    width: f64,
    height: f64,
    points: Vec<ChartPoint>,
}

impl ChartGeometry {
    pub fn new(scores: &MetricScores, size: ChartSettings) -> Self {
        let width = f64::from(size.width).max(MIN_EDGE);
        let height = f64::from(size.height).max(MIN_EDGE);
        let chart_width = width - PADDING * 2.0;
        let chart_height = height - PADDING * 2.0;
        let slot = chart_width / METRIC_COUNT as f64;

        let points = scores
            .iter()
            .enumerate()
            .map(|(i, (metric, value))| ChartPoint {
                label: metric.as_str(),
                value,
                x: PADDING + slot * i as f64 + slot / 2.0,
                y: PADDING + chart_height * f64::from(MAX_SCORE - value) / f64::from(MAX_SCORE),
            })
            .collect();

        Self {
            width,
            height,
            points,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn chart_height(&self) -> f64 {
        self.height - PADDING * 2.0
    }

    /// y of the zero line.
    pub fn baseline(&self) -> f64 {
        self.height - PADDING
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// `(y, label)` for each horizontal grid line, top (100) to bottom (0).
    pub fn grid_lines(&self) -> Vec<(f64, u32)> {
        let step = self.chart_height() / f64::from(GRID_STEPS);
        (0..=GRID_STEPS)
            .map(|i| {
                let label = u32::from(MAX_SCORE) - i * (u32::from(MAX_SCORE) / GRID_STEPS);
                (PADDING + step * f64::from(i), label)
            })
            .collect()
    }

    /// Polyline `points` attribute through every score.
    pub fn line_points(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{:.1},{:.1}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Polygon closing the line down to both baseline corners.
    pub fn area_points(&self) -> String {
        format!(
            "{:.1},{:.1} {} {:.1},{:.1}",
            PADDING,
            self.baseline(),
            self.line_points(),
            self.width - PADDING,
            self.baseline()
        )
    }
}

/// Render the five-metric area chart as a standalone SVG document.
pub fn render_chart_svg(scores: &MetricScores, size: ChartSettings) -> String {
    let geo = ChartGeometry::new(scores, size);
    let mut svg = String::new();

    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" class="performance-chart" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" role="img" aria-label="Performance by metric">
<defs><linearGradient id="area-fill" gradientUnits="userSpaceOnUse" x1="0" y1="{top:.1}" x2="0" y2="{base:.1}"><stop offset="0" stop-color="rgba(99, 102, 241, 0.3)"/><stop offset="1" stop-color="rgba(99, 102, 241, 0.05)"/></linearGradient></defs>
"##,
        w = geo.width(),
        h = geo.height(),
        top = PADDING,
        base = geo.baseline(),
    );

    for (y, label) in geo.grid_lines() {
        let _ = writeln!(
            svg,
            r#"<line class="grid" x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{GRID_STROKE}" stroke-width="1"/><text class="y-label" x="{lx:.1}" y="{ly:.1}" fill="{Y_LABEL_FILL}" font-size="12" text-anchor="end">{label}</text>"#,
            x1 = PADDING,
            x2 = geo.width() - PADDING,
            lx = PADDING - 10.0,
            ly = y + 4.0,
        );
    }

    let _ = writeln!(
        svg,
        r#"<polygon class="area" points="{}" fill="url(#area-fill)"/>"#,
        geo.area_points()
    );
    let _ = writeln!(
        svg,
        r#"<polyline class="line" points="{}" fill="none" stroke="{ACCENT}" stroke-width="3" stroke-linejoin="round"/>"#,
        geo.line_points()
    );

    for p in geo.points() {
        let _ = writeln!(
            svg,
            r#"<circle class="point" cx="{x:.1}" cy="{y:.1}" r="6" fill="{ACCENT}"/><circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{POINT_CORE}"/>"#,
            x = p.x,
            y = p.y,
        );
    }

    for p in geo.points() {
        let _ = write!(
            svg,
            r#"<text class="x-label" fill="{X_LABEL_FILL}" font-size="12" text-anchor="middle">"#
        );
        for (i, word) in p.label.split(' ').enumerate() {
            let _ = write!(
                svg,
                r#"<tspan x="{x:.1}" y="{y:.1}">{word}</tspan>"#,
                x = p.x,
                y = geo.baseline() + 20.0 + LABEL_LINE_STEP * i as f64,
                word = escape_html(word),
            );
        }
        svg.push_str("</text>\n");
    }

    svg.push_str("</svg>");
    svg
}

/// Legend entries, one per metric in canonical order.
pub fn render_legend(scores: &MetricScores) -> String {
    let mut html = String::from(r#"<div class="chart-legend">"#);
    for (i, (metric, value)) in scores.iter().enumerate() {
        let _ = write!(
            html,
            r#"<div class="legend-item"><div class="legend-color" style="background: {color}"></div><span class="legend-label">{label}:</span> <span class="legend-value">{value}/100</span></div>"#,
            color = LEGEND_COLORS[i % LEGEND_COLORS.len()],
            label = escape_html(metric.as_str()),
        );
    }
    html.push_str("</div>");
    html
}
