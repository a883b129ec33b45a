//! sqlx-backed [`Connection`].
//!
//! Catalog statements (`pragma`, `show tables`, `describe`) and DDL are sent
//! unprepared, so every row column is decoded dynamically into a [`Value`].

use std::str::FromStr;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Column, Decode, Type};
use tracing::debug;

use oxide_schema_core::connection::{Connection, Row, Value};
use oxide_schema_core::dialect::DialectKind;
use oxide_schema_core::error::{Result, SchemaError};

/// Pool size used by [`SqlxConnection::connect`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// A pooled SQLite or MySQL connection.
#[derive(Debug, Clone)]
pub enum SqlxConnection {
    /// SQLite pool.
    Sqlite(SqlitePool),
    /// MySQL/MariaDB pool.
    MySql(MySqlPool),
}

impl SqlxConnection {
    /// Connects to `url`, picking the driver from its scheme.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with(url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connects with an explicit pool size.
    ///
    /// In-memory SQLite databases need `max_connections = 1`, each pooled
    /// connection would otherwise see its own database.
    pub async fn connect_with(url: &str, max_connections: u32) -> Result<Self> {
        let dialect = DialectKind::from_url(url)?;
        debug!(%dialect, max_connections, "Connecting");

        let conn = match dialect {
            DialectKind::Sqlite => {
                let options = SqliteConnectOptions::from_str(url)
                    .map_err(|e| SchemaError::Connection(e.into()))?
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(options)
                    .await
                    .map(Self::Sqlite)
            }
            DialectKind::MySql => MySqlPoolOptions::new()
                .max_connections(max_connections)
                .connect(url)
                .await
                .map(Self::MySql),
        };
        conn.map_err(|e| SchemaError::Connection(e.into()))
    }

    /// Wraps an existing SQLite pool.
    #[must_use]
    pub const fn from_sqlite(pool: SqlitePool) -> Self {
        Self::Sqlite(pool)
    }

    /// Wraps an existing MySQL pool.
    #[must_use]
    pub const fn from_mysql(pool: MySqlPool) -> Self {
        Self::MySql(pool)
    }

    /// Closes the underlying pool.
    pub async fn close(&self) {
        match self {
            Self::Sqlite(pool) => pool.close().await,
            Self::MySql(pool) => pool.close().await,
        }
    }
}

impl Connection for SqlxConnection {
    fn dialect(&self) -> DialectKind {
        match self {
            Self::Sqlite(_) => DialectKind::Sqlite,
            Self::MySql(_) => DialectKind::MySql,
        }
    }

    async fn fetch_all(&self, sql: &str) -> Result<Vec<Row>> {
        debug!(sql = %sql, "Fetching rows");
        let rows: std::result::Result<Vec<Row>, sqlx::Error> = match self {
            Self::Sqlite(pool) => sqlx::raw_sql(sql)
                .fetch_all(pool)
                .await
                .map(|rows| rows.iter().map(decode_row).collect()),
            Self::MySql(pool) => sqlx::raw_sql(sql)
                .fetch_all(pool)
                .await
                .map(|rows| rows.iter().map(decode_row).collect()),
        };
        rows.map_err(|e| SchemaError::query(sql, e))
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        let result = match self {
            Self::Sqlite(pool) => sqlx::raw_sql(sql).execute(pool).await.map(|_| ()),
            Self::MySql(pool) => sqlx::raw_sql(sql).execute(pool).await.map(|_| ()),
        };
        result.map_err(|e| SchemaError::query(sql, e))
    }
}

/// Decodes every column as an integer, then text, then lossy UTF-8 bytes.
fn decode_row<R>(row: &R) -> Row
where
    R: sqlx::Row,
    usize: sqlx::ColumnIndex<R>,
    for<'r> i64: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> String: Decode<'r, R::Database> + Type<R::Database>,
    for<'r> Vec<u8>: Decode<'r, R::Database> + Type<R::Database>,
{
    row.columns()
        .iter()
        .map(|column| {
            let index = column.ordinal();
            let value = if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
                value.map_or(Value::Null, Value::Integer)
            } else if let Ok(value) = row.try_get::<Option<String>, _>(index) {
                value.map_or(Value::Null, Value::Text)
            } else if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(index) {
                value.map_or(Value::Null, |bytes| {
                    Value::Text(String::from_utf8_lossy(&bytes).into_owned())
                })
            } else {
                Value::Null
            };
            (column.name().to_string(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> SqlxConnection {
        SqlxConnection::connect_with("sqlite::memory:", 1)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_decodes_columns() {
        let conn = memory().await;
        conn.execute("create table t (a integer, b text, c blob, d text)")
            .await
            .unwrap();
        conn.execute("insert into t values (7, 'seven', x'6869', null)")
            .await
            .unwrap();

        let rows = conn.fetch_all("select a, b, c, d from t").await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].integer("a"), Some(7));
        assert_eq!(rows[0].text("b"), Some("seven"));
        assert_eq!(rows[0].text("c"), Some("hi"));
        assert_eq!(rows[0].get("d"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_failed_statement_carries_sql() {
        let conn = memory().await;
        let err = conn.execute("alter table missing add column x").await.unwrap_err();
        assert!(
            matches!(err, SchemaError::Query { ref sql, .. } if sql == "alter table missing add column x")
        );
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let err = SqlxConnection::connect("postgres://localhost/app")
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedDialect(_)));
    }

    #[tokio::test]
    async fn test_dialect() {
        let pool = SqlitePoolOptions::new().connect_lazy("sqlite::memory:").unwrap();
        assert_eq!(
            SqlxConnection::from_sqlite(pool).dialect(),
            DialectKind::Sqlite
        );
    }
}
