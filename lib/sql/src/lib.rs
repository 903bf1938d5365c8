//! Embedded SQL document store.
//!
//! Records are stored as a JSON `data` column plus a handful of indexed
//! columns per table. Services speak to the [`SqlStore`] trait; the only
//! implementation here is SQLite, but nothing above this crate knows that.

pub mod sqlite;

pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),
}

/// A dynamically-typed SQL parameter or column value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// A row returned from a query: column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }
}

/// SQL execution interface backed by an embedded database.
pub trait SqlStore: Send + Sync {
    /// Run a SELECT and return its rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SqlError>;

    /// Run an INSERT/UPDATE/DELETE and return the affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SqlError>;

    /// Run a batch of parameterless statements (schema setup).
    fn exec_batch(&self, statements: &[&str]) -> Result<(), SqlError> {
        for stmt in statements {
            self.exec(stmt, &[])?;
        }
        Ok(())
    }
}
