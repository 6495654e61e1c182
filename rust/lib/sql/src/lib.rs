//! Relational storage for the directory: a small `SQLStore` trait over
//! positional [`Value`] parameters and [`Row`] results, backed by SQLite.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
