//! Server configuration, loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub storage: StorageSection,
    pub jwt: JwtSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    /// Development mode: error responses carry internal detail instead
    /// of the generic 500 message. Never enable in production.
    #[serde(default)]
    pub dev: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Directory holding the SQLite database.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSection {
    /// HS256 signing secret. At least 32 bytes.
    pub secret: String,

    /// Token lifetime in days.
    #[serde(default = "default_expires_days")]
    pub expires_days: i64,
}

fn default_expires_days() -> i64 {
    7
}

impl ServerConfig {
    /// Resolve a context name or path to a config file path.
    ///
    /// A bare name resolves to `/etc/chirp/<name>.toml`; anything
    /// containing `/` or `.` is used as a path directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/chirp/{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        let config: ServerConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        config.verify()?;
        Ok(config)
    }

    fn verify(&self) -> anyhow::Result<()> {
        if self.jwt.secret.len() < 32 {
            anyhow::bail!("jwt.secret must be at least 32 bytes");
        }
        if self.jwt.expires_days < 1 {
            anyhow::bail!("jwt.expires_days must be at least 1");
        }
        if self.storage.data_dir.is_empty() {
            anyhow::bail!("storage.data_dir must not be empty");
        }
        Ok(())
    }
}
