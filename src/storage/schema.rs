use duckdb::{AccessMode, Connection};
use std::path::Path;

/// SQL statement to create the download statistics table.
///
/// `{table}` is replaced with the configured table name, which must already
/// have passed [`is_valid_identifier`].
const CREATE_STATS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS {table} (
    datejd    INTEGER NOT NULL,
    product   VARCHAR NOT NULL,
    language  VARCHAR NOT NULL,
    os        VARCHAR NOT NULL,
    downloads INTEGER NOT NULL
)
";

/// Returns `true` if `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Table names cannot be bound as query parameters, so they are spliced into
/// the SQL text and must be restricted to this form.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= 128
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Create the statistics table if it does not exist yet.
pub fn init_schema(conn: &Connection, table: &str) -> Result<(), duckdb::Error> {
    conn.execute_batch(&CREATE_STATS_TABLE.replace("{table}", table))?;
    Ok(())
}

/// Open the statistics database.
///
/// A configured path is opened read-only; the table must already exist there.
/// Without a path an empty in-memory database with the schema is returned,
/// which is only useful for development and tests.
pub fn open_database(path: Option<&Path>, table: &str) -> Result<Connection, duckdb::Error> {
    match path {
        Some(path) => {
            let config = duckdb::Config::default().access_mode(AccessMode::ReadOnly)?;
            Connection::open_with_flags(path, config)
        }
        None => {
            let conn = Connection::open_in_memory()?;
            init_schema(&conn, table)?;
            Ok(conn)
        }
    }
}
