//! Configuration management

use crate::domain::RewriteRule;
use crate::error::{Result, TagstripError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the config file looked up in the scanned root
pub const CONFIG_FILE: &str = "tagstrip.toml";

/// Which files a run visits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// File extensions without the leading dot
    pub extensions: Vec<String>,
    /// Directory names skipped at any depth
    pub skip_dirs: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            extensions: vec!["tsx".to_string(), "ts".to_string()],
            skip_dirs: vec![
                "node_modules".to_string(),
                ".next".to_string(),
                ".git".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rule: RewriteRule,
    pub scan: ScanOptions,
}

impl Config {
    /// Load config from tagstrip.toml in the given directory, falling back to
    /// defaults when the file is absent
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_FILE);

        match fs::read_to_string(&config_path) {
            Ok(contents) => Self::parse(&contents, &config_path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(TagstripError::Io(e)),
        }
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TagstripError::Config(format!("Config file not found: {}", path.display()))
            } else {
                TagstripError::Io(e)
            }
        })?;

        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            TagstripError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save config to tagstrip.toml in the given directory. Refuses to
    /// overwrite an existing file.
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let config_path = path.join(CONFIG_FILE);

        if config_path.exists() {
            return Err(TagstripError::Config(format!(
                "{} already exists",
                config_path.display()
            )));
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClosingTags;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rule, RewriteRule::framer_motion());
        assert_eq!(config.scan.extensions, vec!["tsx", "ts"]);
        assert!(config.scan.skip_dirs.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.rule.replacement_tag = Some("div".to_string());
        config.rule.closing_tags = ClosingTags::Original;
        config.scan.extensions = vec!["jsx".to_string()];

        config.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(CONFIG_FILE).exists());

        let loaded = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        Config::default().save_to_dir(temp.path()).unwrap();

        let result = Config::default().save_to_dir(temp.path());
        match result.unwrap_err() {
            TagstripError::Config(msg) => assert!(msg.contains("already exists")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from_path(&temp.path().join("nope.toml"));
        match result.unwrap_err() {
            TagstripError::Config(msg) => assert!(msg.contains("not found")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE),
            "[rule]\nnamespace = \"anim\"\nwrapper_tags = []\n\n[scan]\nextensions = [\"jsx\"]\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp.path()).unwrap();
        assert_eq!(config.rule.namespace, "anim");
        assert!(config.rule.wrapper_tags.is_empty());
        assert_eq!(config.rule.import_modules, vec!["framer-motion"]);
        assert_eq!(config.scan.extensions, vec!["jsx"]);
        assert_eq!(config.scan.skip_dirs, ScanOptions::default().skip_dirs);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "[rule\nnamespace =").unwrap();

        match Config::load_from_dir(temp.path()).unwrap_err() {
            TagstripError::Config(msg) => assert!(msg.contains(CONFIG_FILE)),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
