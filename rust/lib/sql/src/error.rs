use thiserror::Error;

/// Failure inside the SQLite store. The directory service folds every
/// variant into a storage error, which clients only ever see as a
/// generic 500.
#[derive(Error, Debug)]
pub enum SQLError {
    /// A read (`SELECT`, including the recursive branch-tree query) failed.
    #[error("query error: {0}")]
    Query(String),

    /// A write or DDL statement failed, e.g. a foreign-key violation.
    #[error("execution error: {0}")]
    Execution(String),

    /// Opening the database file or taking the connection lock failed.
    #[error("connection error: {0}")]
    Connection(String),
}
