use crate::query::request::{ChartRequest, ChartShape, Dimension};
use duckdb::types::Value;

/// Summed downloads as a BIGINT; an empty match counts as 0.
const SUM_DOWNLOADS: &str = "COALESCE(CAST(SUM(downloads) AS BIGINT), 0)";

/// An aggregation statement together with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Build the aggregation for a validated request.
///
/// `table` is spliced into the SQL text and must be a plain identifier (see
/// `Config::validate`). Filter values and dates are always bound.
pub fn build_query(table: &str, request: &ChartRequest) -> AggregateQuery {
    let (where_clause, params) = where_clause(request);

    // Column names come from a fixed enum, so format! is safe for them.
    let sql = match request.chart.shape() {
        ChartShape::Count => {
            format!("SELECT {SUM_DOWNLOADS} AS downloads FROM {table} {where_clause}")
        }
        ChartShape::Pie(dimension) => {
            let col = dimension.column_name();
            format!(
                "SELECT {col}, {SUM_DOWNLOADS} AS downloads FROM {table} {where_clause} \
                 GROUP BY {col} ORDER BY {col}"
            )
        }
        ChartShape::Line(dimension) => {
            let col = dimension.column_name();
            format!(
                "SELECT CAST(datejd AS BIGINT) AS datejd, {col}, {SUM_DOWNLOADS} AS downloads \
                 FROM {table} {where_clause} \
                 GROUP BY datejd, {col} ORDER BY {col}, datejd ASC"
            )
        }
    };

    AggregateQuery { sql, params }
}

/// `WHERE` clause restricting to the filters and the inclusive date range.
fn where_clause(request: &ChartRequest) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut params = Vec::new();

    for dimension in Dimension::ALL {
        let Some(values) = request.filters.get(dimension).values() else {
            continue;
        };
        let placeholders = vec!["?"; values.len()].join(", ");
        conditions.push(format!("{} IN ({placeholders})", dimension.column_name()));
        params.extend(values.iter().cloned().map(Value::Text));
    }

    conditions.push("datejd >= ? AND datejd <= ?".to_string());
    params.push(Value::BigInt(request.range.start_jd()));
    params.push(Value::BigInt(request.range.end_jd()));

    (format!("WHERE {}", conditions.join(" AND ")), params)
}
