use crate::storage::julian;
use chrono::NaiveDate;
use duckdb::types::Type;
use duckdb::Connection;

/// First and last day present in the statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DateBounds {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

/// Look up the available date range. `None` when the table is empty.
pub fn query_date_bounds(
    conn: &Connection,
    table: &str,
) -> Result<Option<DateBounds>, duckdb::Error> {
    let first = query_bound(conn, &format!("SELECT CAST(MIN(datejd) AS BIGINT) FROM {table}"))?;
    let last = query_bound(conn, &format!("SELECT CAST(MAX(datejd) AS BIGINT) FROM {table}"))?;
    Ok(first.zip(last).map(|(first, last)| DateBounds { first, last }))
}

fn query_bound(conn: &Connection, sql: &str) -> Result<Option<NaiveDate>, duckdb::Error> {
    let mut stmt = conn.prepare(sql)?;
    let jd: Option<i64> = stmt.query_row([], |row| row.get(0))?;
    jd.map(|jd| {
        julian::from_jd(jd).ok_or_else(|| {
            duckdb::Error::FromSqlConversionFailure(
                0,
                Type::BigInt,
                format!("Julian day {jd} is not a representable date").into(),
            )
        })
    })
    .transpose()
}
