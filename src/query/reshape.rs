use crate::chart::{LineChart, PieChart, Series};
use crate::query::request::DateRange;
use crate::query::rows::{LineRow, PieRow};
use std::collections::HashMap;

/// Axis label format for line charts.
const AXIS_DATE_FORMAT: &str = "%Y/%m/%d";

/// Operating system families shown by `pie_by_os`, in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOsX,
    Solaris,
    Others,
}

impl OsFamily {
    pub const ORDER: [Self; 5] = [
        Self::Windows,
        Self::Linux,
        Self::MacOsX,
        Self::Solaris,
        Self::Others,
    ];

    /// Classify a raw `os` value by its prefix.
    pub fn classify(os: &str) -> Self {
        if os.starts_with("win") {
            Self::Windows
        } else if os.starts_with("linux") {
            Self::Linux
        } else if os.starts_with("macosx") {
            Self::MacOsX
        } else if os.starts_with("solaris") {
            Self::Solaris
        } else {
            Self::Others
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::MacOsX => "Mac OS X",
            Self::Solaris => "Solaris",
            Self::Others => "Others",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// One slice per row, in row order.
pub fn pie_slices(rows: Vec<PieRow>) -> PieChart {
    let (labels, values) = rows.into_iter().map(|r| (r.label, r.downloads)).unzip();
    PieChart { labels, values }
}

/// Fold rows into the five OS families. Always five slices, in
/// [`OsFamily::ORDER`], with 0 for families that matched nothing.
pub fn os_family_slices(rows: &[PieRow]) -> PieChart {
    let mut sums = [0i64; OsFamily::ORDER.len()];
    for row in rows {
        sums[OsFamily::classify(&row.label).index()] += row.downloads;
    }
    PieChart {
        labels: OsFamily::ORDER
            .iter()
            .map(|f| f.label().to_string())
            .collect(),
        values: sums.to_vec(),
    }
}

/// One series per category, each with a slot for every day of `range`.
///
/// Series keep the order in which their category first appears in `rows`.
/// Rows dated outside the range are ignored.
pub fn line_series(rows: &[LineRow], range: &DateRange) -> LineChart {
    let days = range.num_days();
    let mut series: Vec<Series> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let Some(offset) = range.offset_of(row.datejd) else {
            continue;
        };
        let idx = *index_of.entry(row.category.as_str()).or_insert_with(|| {
            series.push(Series {
                title: row.category.clone(),
                values: vec![0; days],
            });
            series.len() - 1
        });
        series[idx].values[offset] = row.downloads;
    }

    LineChart {
        axis_labels: axis_labels(range),
        series,
    }
}

/// Days between visible axis labels: a tenth of the range, at least 1.
pub fn label_interval(range: &DateRange) -> usize {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let interval = ((range.num_days() - 1) as f64 / 10.0).round() as usize;
    interval.max(1)
}

/// One label per day of `range`; only every [`label_interval`]-th day,
/// counted from the start, is non-blank.
pub fn axis_labels(range: &DateRange) -> Vec<String> {
    let interval = label_interval(range);
    range
        .start()
        .iter_days()
        .take(range.num_days())
        .enumerate()
        .map(|(i, day)| {
            if i % interval == 0 {
                day.format(AXIS_DATE_FORMAT).to_string()
            } else {
                String::new()
            }
        })
        .collect()
}
