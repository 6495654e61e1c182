pub mod branch;
pub mod employee;
pub mod position;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use filial_sql::{Row, SQLError, SQLStore};

/// Directory service error type.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<SQLError> for DirectoryError {
    fn from(e: SQLError) -> Self {
        DirectoryError::Storage(e.to_string())
    }
}

impl From<DirectoryError> for filial_core::ServiceError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::NotFound(m) => filial_core::ServiceError::NotFound(m),
            DirectoryError::Validation(m) => filial_core::ServiceError::Validation(m),
            DirectoryError::Storage(m) => filial_core::ServiceError::Storage(m),
            DirectoryError::Internal(m) => filial_core::ServiceError::Internal(m),
        }
    }
}

/// The directory service: branches (hierarchy store), positions and
/// employees (directory store), and the subtree query composed from both.
pub struct DirectoryService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl DirectoryService {
    /// Create a new DirectoryService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, DirectoryError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }

    /// True if `SELECT 1 FROM {table} WHERE id = ?` finds a row.
    pub(crate) fn exists(&self, table: &str, id: i64) -> Result<bool, DirectoryError> {
        let sql = format!("SELECT 1 AS found FROM {} WHERE id = ?1", table);
        let rows = self.sql.query(&sql, &[id.into()])?;
        Ok(!rows.is_empty())
    }
}

// ── Row helpers ──

pub(crate) fn req_i64(row: &Row, col: &str) -> Result<i64, DirectoryError> {
    row.get_i64(col)
        .ok_or_else(|| DirectoryError::Internal(format!("missing integer column {}", col)))
}

pub(crate) fn req_str<'a>(row: &'a Row, col: &str) -> Result<&'a str, DirectoryError> {
    row.get_str(col)
        .ok_or_else(|| DirectoryError::Internal(format!("missing text column {}", col)))
}
