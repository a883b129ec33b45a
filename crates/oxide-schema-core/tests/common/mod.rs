#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use oxide_schema_core::prelude::*;

/// In-memory connection answering catalog queries from canned tables.
pub struct FakeConnection {
    dialect: DialectKind,
    responses: HashMap<String, Vec<Row>>,
    executed: Mutex<Vec<String>>,
}

impl FakeConnection {
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect,
            responses: HashMap::new(),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Registers a live table as `(name, native type, primary key)` columns.
    pub fn with_table(mut self, table: &str, columns: &[(&str, &str, bool)]) -> Self {
        let profile = self.dialect.profile();
        let catalog = self.dialect.catalog();

        if let Some(sql) = catalog.existence_query(&profile, table) {
            self.responses
                .insert(sql, vec![Row::new().with("Tables_in_app", table)]);
        }

        let rows = columns
            .iter()
            .enumerate()
            .map(|(cid, (name, ty, pk))| match self.dialect {
                DialectKind::Sqlite => Row::new()
                    .with("cid", cid as i64)
                    .with("name", *name)
                    .with("type", *ty)
                    .with("notnull", 0_i64)
                    .with("pk", i64::from(*pk)),
                DialectKind::MySql => Row::new()
                    .with("Field", *name)
                    .with("Type", *ty)
                    .with("Null", "YES")
                    .with("Key", if *pk { "PRI" } else { "" }),
            })
            .collect();
        self.responses
            .insert(catalog.describe_query(&profile, table), rows);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl Connection for FakeConnection {
    fn dialect(&self) -> DialectKind {
        self.dialect
    }

    async fn fetch_all(&self, sql: &str) -> Result<Vec<Row>> {
        Ok(self.responses.get(sql).cloned().unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(())
    }
}

/// `{id: PK, name: string, email: string}`.
pub fn user_with_email() -> SchemaBuilder {
    SchemaBuilder::new("user")
        .field("name", SemanticType::String)
        .field("email", SemanticType::String)
}
