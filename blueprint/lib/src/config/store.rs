//! On-disk persistence of [`Config`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::error::BlueprintError;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BLUEPRINT_CONFIG";

/// Directory under the home directory holding the config file.
const CONFIG_DIR: &str = ".blueprint";

/// Config file name.
const CONFIG_FILE: &str = "config.yaml";

/// YAML-backed configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Creates a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default location.
    ///
    /// Uses `$BLUEPRINT_CONFIG` when set, otherwise `~/.blueprint/config.yaml`.
    /// Falls back to the current directory when no home directory exists.
    pub fn locate() -> Self {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.trim().is_empty()
        {
            return Self::new(path);
        }
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the configuration.
    ///
    /// ## Errors
    ///
    /// - `ConfigMissing` when there is no file at the path
    /// - `ConfigInvalid` when it cannot be read or lacks `llmProvider` / `apiKeys`
    pub fn read(&self) -> Result<Config, BlueprintError> {
        if !self.exists() {
            return Err(BlueprintError::ConfigMissing {
                path: self.path.clone(),
            });
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| BlueprintError::ConfigInvalid {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let config: Config =
            serde_yaml::from_str(&raw).map_err(|e| BlueprintError::ConfigInvalid {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %self.path.display(), provider = config.llm_provider.key(), "loaded config");
        Ok(config)
    }

    /// Saves the configuration, creating the parent directory if needed.
    ///
    /// The YAML is written to a sibling temp file and renamed into place, so
    /// an interrupted write never leaves a truncated config behind. On Unix
    /// the file is readable by its owner only, since it holds API keys.
    ///
    /// ## Errors
    ///
    /// Returns `ConfigWrite` when the directory or file cannot be written.
    pub fn write(&self, config: &Config) -> Result<(), BlueprintError> {
        let write_err = |source| BlueprintError::ConfigWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| write_err(std::io::Error::other(e)))?;

        let tmp = self.path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600)).map_err(write_err)?;
        }

        fs::rename(&tmp, &self.path).map_err(write_err)?;

        info!(path = %self.path.display(), provider = config.llm_provider.key(), "saved config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Provider;
    use tempfile::tempdir;

    #[test]
    fn read_missing_file_is_config_missing() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.yaml"));
        assert!(!store.exists());
        assert!(matches!(store.read(), Err(BlueprintError::ConfigMissing { .. })));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("deeper").join("config.yaml"));
        store.write(&Config::new(Provider::Gemini, "g-key")).unwrap();
        assert!(store.exists());
        assert!(!store.path().with_extension("yaml.tmp").exists());
    }

    #[test]
    fn read_returns_what_was_written() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.yaml"));
        let config = Config::new(Provider::OpenAi, "sk-test");
        store.write(&config).unwrap();
        assert_eq!(store.read().unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_private_to_the_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.yaml"));
        store.write(&Config::new(Provider::OpenAi, "sk-test")).unwrap();
        // Rewriting keeps the mode too.
        store.write(&Config::new(Provider::Gemini, "g-key")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn read_rejects_missing_provider() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "apiKeys:\n  openai: sk-test\n").unwrap();
        match ConfigStore::new(&path).read() {
            Err(BlueprintError::ConfigInvalid { reason, .. }) => assert!(reason.contains("llmProvider")),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn read_rejects_missing_key_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "llmProvider: openai\n").unwrap();
        match ConfigStore::new(&path).read() {
            Err(BlueprintError::ConfigInvalid { reason, .. }) => assert!(reason.contains("apiKeys")),
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn read_rejects_unknown_provider() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "llmProvider: mistral\napiKeys: {}\n").unwrap();
        assert!(matches!(
            ConfigStore::new(&path).read(),
            Err(BlueprintError::ConfigInvalid { .. })
        ));
    }
}
