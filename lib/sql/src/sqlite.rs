use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::{Row, SqlError, SqlStore, Value};

/// SQLite-backed [`SqlStore`] (bundled, WAL mode).
///
/// A single connection behind a mutex: per-statement atomicity comes from
/// SQLite itself, and one writer is all this workload needs.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database file.
    pub fn open(path: &Path) -> Result<Self, SqlError> {
        let conn = Connection::open(path)
            .map_err(|e| SqlError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SqlError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, SqlError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SqlError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn bind<'a>(params: &'a [Value]) -> Vec<Box<dyn rusqlite::types::ToSql + 'a>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + 'a> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

fn column_value(row: &rusqlite::Row, idx: usize) -> Value {
    use rusqlite::types::ValueRef;
    match row.get_ref(idx) {
        Ok(ValueRef::Null) | Err(_) => Value::Null,
        Ok(ValueRef::Integer(i)) => Value::Integer(i),
        Ok(ValueRef::Real(f)) => Value::Real(f),
        Ok(ValueRef::Text(t)) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        Ok(ValueRef::Blob(b)) => Value::Blob(b.to_vec()),
    }
}

impl SqlStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SqlError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SqlError::Query(e.to_string()))?;

        let bound = bind(params);
        let refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SqlError::Query(e.to_string()))?;
        let names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mapped = stmt
            .query_map(refs.as_slice(), |row| {
                let columns = names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), column_value(row, i)))
                    .collect();
                Ok(Row { columns })
            })
            .map_err(|e| SqlError::Query(e.to_string()))?;

        let mut rows = Vec::new();
        for row in mapped {
            rows.push(row.map_err(|e| SqlError::Query(e.to_string()))?);
        }
        Ok(rows)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SqlError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SqlError::Execution(e.to_string()))?;

        let bound = bind(params);
        let refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        conn.execute(sql, refs.as_slice())
            .map(|n| n as u64)
            .map_err(|e| SqlError::Execution(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec(
            "CREATE TABLE t (id TEXT PRIMARY KEY, name TEXT UNIQUE, n INTEGER)",
            &[],
        )
        .unwrap();
        s
    }

    #[test]
    fn exec_and_query_roundtrip() {
        let s = store();
        let affected = s
            .exec(
                "INSERT INTO t (id, name, n) VALUES (?1, ?2, ?3)",
                &[
                    Value::Text("a".into()),
                    Value::Text("alice".into()),
                    Value::Integer(7),
                ],
            )
            .unwrap();
        assert_eq!(affected, 1);

        let rows = s
            .query("SELECT name, n FROM t WHERE id = ?1", &[Value::Text("a".into())])
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("name"), Some("alice"));
        assert_eq!(rows[0].get_i64("n"), Some(7));
    }

    #[test]
    fn unique_violation_names_the_column() {
        let s = store();
        for id in ["a", "b"] {
            let result = s.exec(
                "INSERT INTO t (id, name) VALUES (?1, ?2)",
                &[Value::Text(id.into()), Value::Text("alice".into())],
            );
            if id == "a" {
                result.unwrap();
            } else {
                let msg = result.unwrap_err().to_string();
                assert!(msg.contains("UNIQUE constraint failed: t.name"), "{}", msg);
            }
        }
    }

    #[test]
    fn update_reports_affected_rows() {
        let s = store();
        s.exec(
            "INSERT INTO t (id, name) VALUES ('a', 'alice')",
            &[],
        )
        .unwrap();
        let hit = s
            .exec("UPDATE t SET n = 1 WHERE id = 'a'", &[])
            .unwrap();
        assert_eq!(hit, 1);
        let miss = s
            .exec("UPDATE t SET n = 1 WHERE id = 'zzz'", &[])
            .unwrap();
        assert_eq!(miss, 0);
    }

    #[test]
    fn exec_batch_runs_all_statements() {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec_batch(&[
            "CREATE TABLE a (id TEXT)",
            "CREATE TABLE b (id TEXT)",
        ])
        .unwrap();
        s.exec("INSERT INTO a (id) VALUES ('1')", &[]).unwrap();
        s.exec("INSERT INTO b (id) VALUES ('1')", &[]).unwrap();
    }
}
