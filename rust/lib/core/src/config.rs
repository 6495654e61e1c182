use std::path::PathBuf;

/// Storage and listener settings shared by the server binary and tests.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/filial.sqlite` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sqlite_path: None,
            listen: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the SQLite database path, falling back to `{data_dir}/filial.sqlite`.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join("filial.sqlite"))
                .unwrap_or_else(|| PathBuf::from("filial.sqlite"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_sqlite_path(), PathBuf::from("/data/filial.sqlite"));

        let bare = ServiceConfig::default();
        assert_eq!(bare.resolve_sqlite_path(), PathBuf::from("filial.sqlite"));
    }

    #[test]
    fn test_explicit_sqlite_path_wins() {
        let config = ServiceConfig {
            data_dir: Some(PathBuf::from("/data")),
            sqlite_path: Some(PathBuf::from("/elsewhere/db.sqlite")),
            ..Default::default()
        };
        assert_eq!(config.resolve_sqlite_path(), PathBuf::from("/elsewhere/db.sqlite"));
    }
}
