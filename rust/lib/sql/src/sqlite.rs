use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// A single connection sits behind a mutex; every statement runs atomically
/// on it. Foreign keys are enforced.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL for concurrent readers of the file (backups, sqlite3 shell).
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, SQLError> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(format!("connection lock poisoned: {}", e)))
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<&dyn rusqlite::types::ToSql> {
    params
        .iter()
        .map(|v| -> &dyn rusqlite::types::ToSql {
            match v {
                Value::Null => &rusqlite::types::Null,
                Value::Integer(i) => i,
                Value::Real(f) => f,
                Value::Text(s) => s,
            }
        })
        .collect()
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(bound.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)?));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);

        let affected = conn
            .execute(sql, bound.as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        Ok(affected as u64)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        let conn = self.lock()?;
        let bound = bind_params(params);

        conn.execute(sql, bound.as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        // Same connection, still under the lock: the rowid is ours.
        Ok(conn.last_insert_rowid())
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Value::Text(String::from_utf8_lossy(t).into_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec(
                "CREATE TABLE items (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, price REAL)",
                &[],
            )
            .unwrap();
        store
    }

    #[test]
    fn insert_returns_rowid() {
        let s = store();
        let a = s.insert("INSERT INTO items (name, price) VALUES (?1, ?2)", &["a".into(), 1.5.into()]).unwrap();
        let b = s.insert("INSERT INTO items (name, price) VALUES (?1, ?2)", &["b".into(), Value::Null]).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn query_maps_column_types() {
        let s = store();
        s.insert("INSERT INTO items (name, price) VALUES (?1, ?2)", &["a".into(), 2.25.into()]).unwrap();
        s.insert("INSERT INTO items (name, price) VALUES (?1, ?2)", &["b".into(), Value::Null]).unwrap();

        let rows = s.query("SELECT id, name, price FROM items ORDER BY id", &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_i64("id"), Some(1));
        assert_eq!(rows[0].get_str("name"), Some("a"));
        assert_eq!(rows[0].get_f64("price"), Some(2.25));
        assert_eq!(rows[1].get("price"), Some(&Value::Null));
    }

    #[test]
    fn exec_reports_affected_rows() {
        let s = store();
        s.insert("INSERT INTO items (name) VALUES (?1)", &["a".into()]).unwrap();
        assert_eq!(s.exec("DELETE FROM items WHERE id = ?1", &[1i64.into()]).unwrap(), 1);
        assert_eq!(s.exec("DELETE FROM items WHERE id = ?1", &[1i64.into()]).unwrap(), 0);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let s = SqliteStore::open_in_memory().unwrap();
        s.exec("CREATE TABLE parents (id INTEGER PRIMARY KEY)", &[]).unwrap();
        s.exec(
            "CREATE TABLE children (id INTEGER PRIMARY KEY, parent_id INTEGER REFERENCES parents(id))",
            &[],
        )
        .unwrap();
        let err = s.insert("INSERT INTO children (parent_id) VALUES (?1)", &[99i64.into()]);
        assert!(matches!(err, Err(SQLError::Execution(_))));
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let s = SqliteStore::open(&dir.path().join("test.sqlite")).unwrap();
        s.exec("CREATE TABLE t (x INTEGER)", &[]).unwrap();
        s.insert("INSERT INTO t (x) VALUES (?1)", &[5i64.into()]).unwrap();
        let rows = s.query("SELECT x FROM t", &[]).unwrap();
        assert_eq!(rows[0].get_i64("x"), Some(5));
    }

    #[test]
    fn bad_sql_is_a_query_error() {
        let s = store();
        assert!(matches!(s.query("SELECT nope FROM items", &[]), Err(SQLError::Query(_))));
    }
}
