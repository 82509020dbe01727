use crate::query::builder::AggregateQuery;
use duckdb::{params_from_iter, Connection};

/// A `(category, downloads)` row of a pie aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieRow {
    pub label: String,
    pub downloads: i64,
}

/// A `(day, category, downloads)` row of a line aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRow {
    pub datejd: i64,
    pub category: String,
    pub downloads: i64,
}

/// Run a count aggregation and return the total.
pub fn fetch_count(conn: &Connection, query: &AggregateQuery) -> Result<i64, duckdb::Error> {
    let mut stmt = conn.prepare(&query.sql)?;
    stmt.query_row(params_from_iter(query.params.iter()), |row| row.get(0))
}

/// Run a pie aggregation.
pub fn fetch_pie_rows(
    conn: &Connection,
    query: &AggregateQuery,
) -> Result<Vec<PieRow>, duckdb::Error> {
    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt
        .query_map(params_from_iter(query.params.iter()), |row| {
            Ok(PieRow {
                label: row.get(0)?,
                downloads: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Run a line aggregation.
pub fn fetch_line_rows(
    conn: &Connection,
    query: &AggregateQuery,
) -> Result<Vec<LineRow>, duckdb::Error> {
    let mut stmt = conn.prepare(&query.sql)?;
    let rows = stmt
        .query_map(params_from_iter(query.params.iter()), |row| {
            Ok(LineRow {
                datejd: row.get(0)?,
                category: row.get(1)?,
                downloads: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
