//! Server configuration file.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:3000"
//!
//! [storage]
//! data_dir = "/var/lib/filial"
//! # sqlite_path = "/var/lib/filial/filial.sqlite"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use filial_core::ServiceConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    ServiceConfig::default().listen
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub data_dir: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sqlite_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,
}

impl ServerConfig {
    /// A bare context name maps to `/etc/filial/<name>.toml`; anything
    /// containing `/` or `.` is taken as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from("/etc/filial").join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Refuse to start without somewhere to keep data.
    pub fn verify(&self) -> anyhow::Result<()> {
        if self.storage.data_dir.trim().is_empty() {
            anyhow::bail!("Storage data_dir is empty in configuration.");
        }
        Ok(())
    }

    /// Storage and listener settings; `listen` overrides the file.
    pub fn service_config(&self, listen: Option<&str>) -> ServiceConfig {
        ServiceConfig {
            data_dir: Some(PathBuf::from(&self.storage.data_dir)),
            sqlite_path: self.storage.sqlite_path.as_ref().map(PathBuf::from),
            listen: listen.unwrap_or(&self.server.listen).to_string(),
        }
    }
}
