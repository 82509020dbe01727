//! Chart rendering.
//!
//! The reshaper in [`crate::query::reshape`] produces the plain data types
//! below; [`svg`] draws them with plotters and [`html`] renders the count page.

pub mod html;
pub mod svg;

/// Slices of a pie chart, `labels[i]` naming `values[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<i64>,
}

/// One line of a line chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub title: String,
    /// One value per day of the axis.
    pub values: Vec<i64>,
}

/// Day-indexed series sharing one x axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChart {
    /// One label per day; blank for days that carry no visible label.
    pub axis_labels: Vec<String>,
    pub series: Vec<Series>,
}
