use crate::chart::{LineChart, PieChart};
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use std::fmt;

const PIE_SIZE: (u32, u32) = (900, 500);
const LINE_SIZE: (u32, u32) = (850, 500);
const PIE_TITLE: &str = "Bouncer Statistics";
const X_DESC: &str = "Date";
const Y_DESC: &str = "Download counts a day";

/// Slice and line colours, cycled when there are more categories.
const PALETTE: [RGBColor; 12] = [
    RGBColor(0x33, 0x66, 0xcc),
    RGBColor(0xdc, 0x39, 0x12),
    RGBColor(0xff, 0x99, 0x00),
    RGBColor(0x10, 0x96, 0x18),
    RGBColor(0x99, 0x00, 0x99),
    RGBColor(0x00, 0x99, 0xc6),
    RGBColor(0xdd, 0x44, 0x77),
    RGBColor(0x66, 0xaa, 0x00),
    RGBColor(0xb8, 0x2e, 0x2e),
    RGBColor(0x31, 0x63, 0x95),
    RGBColor(0x99, 0x44, 0x99),
    RGBColor(0x22, 0xaa, 0x99),
];

fn palette(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

/// Chart input was malformed or plotters failed to draw it.
#[derive(Debug)]
pub struct RenderError(pub String);

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chart rendering failed: {}", self.0)
    }
}

impl std::error::Error for RenderError {}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self(e.to_string())
    }
}

/// Draw a pie chart as an SVG document.
///
/// Labels sit next to their slices; `show_percentages` appends each slice's
/// share to its label. A chart whose values sum to 0 has no slices and says so.
pub fn render_pie(chart: &PieChart, show_percentages: bool) -> Result<String, RenderError> {
    if chart.labels.len() != chart.values.len() {
        return Err(RenderError(format!(
            "pie has {} labels but {} values",
            chart.labels.len(),
            chart.values.len()
        )));
    }
    if let Some(v) = chart.values.iter().find(|v| **v < 0) {
        return Err(RenderError(format!("negative pie value {v}")));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled(PIE_TITLE, ("sans-serif", 24))?;

        let (w, h) = area.dim_in_pixel();
        let center = (
            i32::try_from(w / 2).unwrap_or(0),
            i32::try_from(h / 2).unwrap_or(0),
        );

        if chart.values.iter().sum::<i64>() == 0 {
            area.draw(&Text::new(
                "No downloads",
                center,
                ("sans-serif", 20).into_font().color(&BLACK),
            ))?;
        } else {
            let radius = f64::from(w.min(h)) * 0.35;
            #[allow(clippy::cast_precision_loss)]
            let sizes: Vec<f64> = chart.values.iter().map(|v| *v as f64).collect();
            let colors: Vec<RGBColor> = (0..sizes.len()).map(palette).collect();
            let labels = if show_percentages {
                with_shares(&chart.labels, &sizes)
            } else {
                chart.labels.clone()
            };

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
            area.draw(&pie)?;
        }

        root.present()?;
    }
    Ok(svg)
}

/// Append each slice's share of the total, e.g. `Linux (33.3%)`.
fn with_shares(labels: &[String], sizes: &[f64]) -> Vec<String> {
    let total: f64 = sizes.iter().sum();
    labels
        .iter()
        .zip(sizes)
        .map(|(label, size)| format!("{label} ({:.1}%)", size / total * 100.0))
        .collect()
}

/// Draw a line chart as an SVG document, one coloured line per series.
pub fn render_line(chart: &LineChart) -> Result<String, RenderError> {
    let days = chart.axis_labels.len();
    if days == 0 {
        return Err(RenderError("line chart has an empty axis".to_string()));
    }
    if let Some(bad) = chart.series.iter().find(|s| s.values.len() != days) {
        return Err(RenderError(format!(
            "series '{}' has {} values for {days} axis labels",
            bad.title,
            bad.values.len()
        )));
    }

    let max_value = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .max()
        .unwrap_or(0);
    let y_max = (max_value + max_value / 10).max(10);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, LINE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut ctx = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(0..days, 0i64..y_max)?;

        // Every day is a key point; the blank labels keep the axis readable.
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(days)
            .x_label_formatter(&|x| chart.axis_labels.get(*x).cloned().unwrap_or_default())
            .x_desc(X_DESC)
            .y_desc(Y_DESC)
            .y_labels(10)
            .draw()?;

        for (i, series) in chart.series.iter().enumerate() {
            let color = palette(i);
            ctx.draw_series(LineSeries::new(
                series.values.iter().enumerate().map(|(x, y)| (x, *y)),
                color.stroke_width(2),
            ))?
            .label(series.title.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        if !chart.series.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
    }
    Ok(svg)
}
