use crate::api::errors::ApiError;
use crate::config::Config;
use crate::query::bounds::DateBounds;
use crate::query::request::{ChartRequest, ChartType, DateRange, FilterSet, Filters};
use chrono::NaiveDate;

/// Formats tried, in order, for free-form `start_date` / `end_date` values.
const FREE_FORM_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Request parameters in submission order. Repeated names are kept.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    pairs: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for RawParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl RawParams {
    /// First non-blank value submitted under `name`.
    fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every value submitted under `name`.
    fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse and validate everything that does not need the database.
///
/// The chart type is checked first so an unknown type fails before any date
/// handling. The returned range is already ordered; it still has to pass
/// [`check_within_bounds`].
pub fn parse_chart_request(params: &RawParams, config: &Config) -> Result<ChartRequest, ApiError> {
    let chart = parse_chart_type(params.first("type").unwrap_or_default(), config)?;
    let start = parse_date(params, "start")?;
    let end = parse_date(params, "end")?;

    Ok(ChartRequest {
        chart,
        range: DateRange::new(start, end),
        filters: Filters {
            product: FilterSet::from_values(params.all("product")),
            language: FilterSet::from_values(params.all("language")),
            os: FilterSet::from_values(params.all("os")),
        },
    })
}

/// Resolve a `type` value against the enabled chart types.
pub fn parse_chart_type(raw: &str, config: &Config) -> Result<ChartType, ApiError> {
    raw.parse::<ChartType>()
        .ok()
        .filter(|chart| config.is_enabled(*chart))
        .ok_or_else(|| ApiError::Validation(format!("Invalid argument for 'type': {raw}")))
}

/// Reject ranges reaching outside the days present in the table.
pub fn check_within_bounds(range: &DateRange, bounds: Option<DateBounds>) -> Result<(), ApiError> {
    let Some(bounds) = bounds else {
        return Err(ApiError::Validation(
            "no download statistics are available.".to_string(),
        ));
    };
    if range.start() < bounds.first {
        return Err(ApiError::Validation(format!(
            "you specified the date before {}.",
            bounds.first.format("%Y-%m-%d")
        )));
    }
    if range.end() > bounds.last {
        return Err(ApiError::Validation(format!(
            "you specified the date after {}.",
            bounds.last.format("%Y-%m-%d")
        )));
    }
    Ok(())
}

/// Read the `{prefix}_year/_month/_day` triple, or else `{prefix}_date`.
fn parse_date(params: &RawParams, prefix: &str) -> Result<NaiveDate, ApiError> {
    let year_key = format!("{prefix}_year");
    let month_key = format!("{prefix}_month");
    let day_key = format!("{prefix}_day");
    let parts = [
        params.first(&year_key),
        params.first(&month_key),
        params.first(&day_key),
    ];

    if parts.iter().any(Option::is_some) {
        let [year, month, day] = [
            parse_component(&year_key, parts[0])?,
            parse_component(&month_key, parts[1])?,
            parse_component(&day_key, parts[2])?,
        ];
        return date_from_ymd(year, month, day).ok_or_else(|| {
            ApiError::Validation(format!(
                "{prefix} date {year}-{month}-{day} does not exist."
            ))
        });
    }

    let date_key = format!("{prefix}_date");
    match params.first(&date_key) {
        Some(raw) => parse_free_form(raw).ok_or_else(|| {
            ApiError::Validation(format!("could not understand {date_key} '{raw}'."))
        }),
        None => Err(ApiError::Validation(format!(
            "missing {prefix} date: give {prefix}_year, {prefix}_month and {prefix}_day, or {date_key}."
        ))),
    }
}

/// A triple component must be present and an integer; anything else is not
/// a date at all.
fn parse_component(key: &str, raw: Option<&str>) -> Result<i64, ApiError> {
    let raw = raw.ok_or_else(|| ApiError::Validation(format!("missing {key}.")))?;
    raw.parse::<i64>()
        .map_err(|e| ApiError::Malformed(format!("{key}={raw}: {e}")))
}

fn date_from_ymd(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Parse a free-form date string. Strict: impossible dates are rejected.
pub fn parse_free_form(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    // Compact YYYYMMDD
    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw[0..4].parse().ok()?;
        let month = raw[4..6].parse().ok()?;
        let day = raw[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    FREE_FORM_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}
