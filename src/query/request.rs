use crate::storage::julian;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Column of the statistics table a chart can be broken down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Product,
    Language,
    Os,
}

impl Dimension {
    pub const ALL: [Self; 3] = [Self::Product, Self::Language, Self::Os];

    /// Column name in the statistics table. Also the request parameter name.
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Language => "language",
            Self::Os => "os",
        }
    }
}

/// What a chart type aggregates, and how its rows are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartShape {
    Count,
    Pie(Dimension),
    Line(Dimension),
}

/// Chart types accepted in the `type` request parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartType {
    PieByProduct,
    PieByLanguage,
    /// Pie of OS families (Windows, Linux, ...).
    PieByOs,
    /// Pie of raw OS/architecture values.
    PieByOswa,
    LineByProduct,
    LineByLanguage,
    LineByOs,
    LineByOswa,
    Count,
}

impl ChartType {
    pub const ALL: [Self; 9] = [
        Self::PieByProduct,
        Self::PieByLanguage,
        Self::PieByOs,
        Self::PieByOswa,
        Self::LineByProduct,
        Self::LineByLanguage,
        Self::LineByOs,
        Self::LineByOswa,
        Self::Count,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PieByProduct => "pie_by_product",
            Self::PieByLanguage => "pie_by_language",
            Self::PieByOs => "pie_by_os",
            Self::PieByOswa => "pie_by_oswa",
            Self::LineByProduct => "line_by_product",
            Self::LineByLanguage => "line_by_language",
            Self::LineByOs => "line_by_os",
            Self::LineByOswa => "line_by_oswa",
            Self::Count => "count",
        }
    }

    pub const fn shape(self) -> ChartShape {
        match self {
            Self::PieByProduct => ChartShape::Pie(Dimension::Product),
            Self::PieByLanguage => ChartShape::Pie(Dimension::Language),
            Self::PieByOs | Self::PieByOswa => ChartShape::Pie(Dimension::Os),
            Self::LineByProduct => ChartShape::Line(Dimension::Product),
            Self::LineByLanguage => ChartShape::Line(Dimension::Language),
            Self::LineByOs | Self::LineByOswa => ChartShape::Line(Dimension::Os),
            Self::Count => ChartShape::Count,
        }
    }

    /// `pie_by_os` folds OS values into families before drawing.
    pub const fn groups_os_families(self) -> bool {
        matches!(self, Self::PieByOs)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no chart type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChartType(pub String);

impl FromStr for ChartType {
    type Err = UnknownChartType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownChartType(s.to_string()))
    }
}

/// Values accepted for one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSet {
    All,
    /// Never empty.
    Only(Vec<String>),
}

impl FilterSet {
    /// Literal value that selects every row of a dimension.
    pub const ALL_MARKER: &'static str = "ALL";

    /// Normalize submitted values: nothing, or any `ALL`, means no filter.
    /// Duplicates are dropped, first occurrence wins.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if value == Self::ALL_MARKER {
                return Self::All;
            }
            if !kept.contains(&value) {
                kept.push(value);
            }
        }
        if kept.is_empty() {
            Self::All
        } else {
            Self::Only(kept)
        }
    }

    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::All => None,
            Self::Only(values) => Some(values.as_slice()),
        }
    }
}

/// Per-dimension filters of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub product: FilterSet,
    pub language: FilterSet,
    pub os: FilterSet,
}

impl Filters {
    pub const fn all() -> Self {
        Self {
            product: FilterSet::All,
            language: FilterSet::All,
            os: FilterSet::All,
        }
    }

    pub const fn get(&self, dimension: Dimension) -> &FilterSet {
        match dimension {
            Dimension::Product => &self.product,
            Dimension::Language => &self.language,
            Dimension::Os => &self.os,
        }
    }
}

/// Inclusive date range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range from two dates in either order.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days()).unwrap_or(0) + 1
    }

    pub fn start_jd(&self) -> i64 {
        julian::to_jd(self.start)
    }

    pub fn end_jd(&self) -> i64 {
        julian::to_jd(self.end)
    }

    /// Zero-based position of a Julian day inside the range.
    pub fn offset_of(&self, jd: i64) -> Option<usize> {
        if jd < self.start_jd() || jd > self.end_jd() {
            return None;
        }
        usize::try_from(jd - self.start_jd()).ok()
    }
}

/// A validated chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub chart: ChartType,
    pub range: DateRange,
    pub filters: Filters,
}
