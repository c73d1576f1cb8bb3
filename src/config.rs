use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Location of the catalogue database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Row cap applied by callers that list stamps without an explicit limit.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,

    /// Directory for log files. When unset, logging picks a per-user default.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from(crate::DATABASE_FILENAME)
}

fn default_list_limit() -> usize {
    crate::DEFAULT_LIST_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            list_limit: default_list_limit(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // First run: persist the defaults so users have a file to edit
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stampbook")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
