use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::CategoryRegistry;
use crate::error::{OpinionError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Default number of recent opinions fed to the summary
pub const DEFAULT_SUMMARY_LIMIT: usize = 100;

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# civic-opinion configuration file
# Location: ~/.civic-opinion/config.toml

[summary]
# Number of most recent opinions included in `civic-opinion summarize`
# Default: 100
limit = 100

[categories]
# Custom category definitions (TOML). Relative paths are resolved against
# the base directory. The builtin categories are used when unset.
# The file is read once at startup; the last category must have no keywords
# and acts as the catch-all.
# Example: file = "categories.toml"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub summary: SummaryConfig,

    #[serde(default)]
    pub categories: CategoriesConfig,
}

/// Summary-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Recent opinions per report
    #[serde(default = "default_summary_limit")]
    pub limit: usize,
}

fn default_summary_limit() -> usize {
    DEFAULT_SUMMARY_LIMIT
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUMMARY_LIMIT,
        }
    }
}

/// Category table configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategoriesConfig {
    /// Custom category file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| OpinionError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Check values that the TOML types alone do not constrain
    fn validate(&self) -> Result<()> {
        if self.summary.limit == 0 {
            return Err(OpinionError::InvalidConfigValue {
                key: "summary.limit".to_string(),
                value: self.summary.limit.to_string(),
            });
        }
        Ok(())
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self).map_err(|e| OpinionError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "summary.limit" => Some(self.summary.limit.to_string()),
            "categories.file" => Some(
                self.categories
                    .file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "summary.limit" => {
                self.summary.limit = parse_limit(key, value)?;
                Ok(())
            }
            "categories.file" => {
                let trimmed = value.trim();
                self.categories.file = if trimmed.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(trimmed))
                };
                Ok(())
            }
            _ => Err(OpinionError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["summary.limit", "categories.file"]
            .into_iter()
            .map(|key| (key.to_string(), self.get(key).unwrap_or_default()))
            .collect()
    }

    /// Resolve the category file against the base directory
    pub fn category_file(&self, base_dir: &Path) -> Option<PathBuf> {
        self.categories.file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                base_dir.join(file)
            }
        })
    }

    /// Build the category registry for this process (builtin unless a file is configured)
    pub fn category_registry(&self, base_dir: &Path) -> Result<CategoryRegistry> {
        match self.category_file(base_dir) {
            Some(path) => CategoryRegistry::load_file(&path),
            None => Ok(CategoryRegistry::builtin()),
        }
    }
}

fn parse_limit(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(OpinionError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CATCH_ALL_CATEGORY;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.summary.limit, DEFAULT_SUMMARY_LIMIT);
        assert!(config.categories.file.is_none());
    }

    #[test]
    fn test_init_and_load() {
        let temp = TempDir::new().unwrap();
        let path = Config::init(temp.path()).unwrap();
        assert!(path.exists());

        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.summary.limit, DEFAULT_SUMMARY_LIMIT);
    }

    #[test]
    fn test_load_missing_is_default() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path()).unwrap();
        assert_eq!(config.summary.limit, DEFAULT_SUMMARY_LIMIT);
    }

    #[test]
    fn test_load_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(Config::path(temp.path()), "[summary]\nlimit = \"many\"").unwrap();
        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(err, OpinionError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_rejects_zero_limit() {
        let temp = TempDir::new().unwrap();
        fs::write(Config::path(temp.path()), "[summary]\nlimit = 0\n").unwrap();

        let err = Config::load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            OpinionError::InvalidConfigValue { key, value } if key == "summary.limit" && value == "0"
        ));
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("summary.limit", "20").unwrap();
        assert_eq!(config.get("summary.limit").as_deref(), Some("20"));

        config.set("categories.file", "cats.toml").unwrap();
        assert_eq!(config.get("categories.file").as_deref(), Some("cats.toml"));

        config.set("categories.file", "").unwrap();
        assert!(config.categories.file.is_none());

        assert!(config.get("unknown.key").is_none());
        assert!(matches!(
            config.set("unknown.key", "1"),
            Err(OpinionError::ConfigKeyNotFound { .. })
        ));
    }

    #[test]
    fn test_set_rejects_invalid_limit() {
        let mut config = Config::default();
        for bad in ["0", "-1", "ten"] {
            assert!(matches!(
                config.set("summary.limit", bad),
                Err(OpinionError::InvalidConfigValue { .. })
            ));
        }
        assert_eq!(config.summary.limit, DEFAULT_SUMMARY_LIMIT);
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.set("summary.limit", "5").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = Config::load(temp.path()).unwrap();
        assert_eq!(loaded.summary.limit, 5);
        assert_eq!(loaded.list().len(), 2);
    }

    #[test]
    fn test_category_registry_builtin_and_file() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        let registry = config.category_registry(temp.path()).unwrap();
        assert_eq!(registry.catch_all_name(), CATCH_ALL_CATEGORY);

        fs::write(
            temp.path().join("cats.toml"),
            "[[categories]]\nname = \"Parks\"\nkeywords = [\"park\"]\n\n[[categories]]\nname = \"Misc\"\nkeywords = []\n",
        )
        .unwrap();
        config.set("categories.file", "cats.toml").unwrap();

        let registry = config.category_registry(temp.path()).unwrap();
        assert_eq!(registry.names(), vec!["Parks", "Misc"]);
        assert_eq!(registry.catch_all_name(), "Misc");
    }
}
