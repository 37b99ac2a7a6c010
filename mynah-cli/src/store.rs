use anyhow::Context;
use mynah_core::AppConfig;
use std::path::{Path, PathBuf};

/// JSON config file on disk. Missing file means defaults; saves go through
/// a temp file so a crash never leaves a half-written config behind.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `MYNAH_CONFIG` when set, else `mynah.json` beside the binary's
    /// working directory.
    pub fn from_env() -> Self {
        let path = std::env::var("MYNAH_CONFIG").unwrap_or_else(|_| "mynah.json".into());
        Self::at_path(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_or_default(&self) -> anyhow::Result<AppConfig> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AppConfig::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read config: {}", self.path.display()));
            }
        };
        let cfg: AppConfig = serde_json::from_slice(&bytes).context("decode config JSON")?;
        Ok(cfg)
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(cfg).context("encode config JSON")?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config directory: {}", parent.display()))?;
        }

        // Write temp then replace.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("write temp: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace file: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("mynah.json"));
        let cfg = store.load_or_default().unwrap();
        assert_eq!(cfg.client.base_url, "http://localhost:8000");
        assert!(cfg.microphone_device.is_none());
    }

    #[test]
    fn round_trips_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::at_path(dir.path().join("mynah.json"));

        let mut cfg = AppConfig::default();
        cfg.client.base_url = "http://10.0.0.2:9000".into();
        cfg.microphone_device = Some("USB Microphone".into());

        store.save(&cfg).unwrap();
        let loaded = store.load_or_default().unwrap();
        assert_eq!(loaded, cfg);
        // No temp file left behind.
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_silent_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mynah.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(ConfigStore::at_path(path).load_or_default().is_err());
    }
}
