//! User configuration (`~/.radquiz/config.json`)

use crate::services::tooltip::{TooltipOptions, DEFAULT_OFFSET};
use crate::types::{Placement, RadquizError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `apiBaseUrl` from the config file
pub const API_URL_ENV: &str = "RADQUIZ_API_URL";

/// Trailing window fetched for the heatmap when not configured
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Base URL of the quiz backend, e.g. `https://quiz.example.org/api`
    pub api_base_url: Option<String>,
    pub window_days: u32,
    pub tooltip_offset: f64,
    pub preferred_placements: Vec<Placement>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            window_days: DEFAULT_WINDOW_DAYS,
            tooltip_offset: DEFAULT_OFFSET,
            preferred_placements: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| RadquizError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".radquiz").join("config.json"))
    }

    /// Load the user config, falling back to defaults with a warning when
    /// the file is unreadable, then apply environment overrides.
    pub fn load() -> Self {
        let config = match Self::default_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[radquiz] Warning: using default config: {}", e);
                Self::default()
            }
        };
        config.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RadquizError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = Some(url);
        }
        self
    }

    pub fn tooltip_options(&self) -> TooltipOptions {
        TooltipOptions::default()
            .with_offset(self.tooltip_offset)
            .with_order(self.preferred_placements.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert_eq!(config.window_days, 365);
        assert!((config.tooltip_offset - 10.0).abs() < f64::EPSILON);
        assert!(config.preferred_placements.is_empty());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"apiBaseUrl":"http://localhost:8080/api","preferredPlacements":["top-left"]}"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.api_base_url.as_deref(),
            Some("http://localhost:8080/api")
        );
        assert_eq!(config.window_days, 365);
        assert_eq!(config.preferred_placements, vec![Placement::TopLeft]);
    }

    #[test]
    fn test_load_malformed_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ windowDays: ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, RadquizError::Config(_)));
    }

    #[test]
    fn test_api_url_override() {
        let config = Config::default().with_api_url_override(Some("http://api".into()));
        assert_eq!(config.api_base_url.as_deref(), Some("http://api"));
    }

    #[test]
    fn test_blank_api_url_override_ignored() {
        let mut config = Config::default();
        config.api_base_url = Some("http://file".into());
        let config = config.with_api_url_override(Some("  ".into()));
        assert_eq!(config.api_base_url.as_deref(), Some("http://file"));
    }

    #[test]
    fn test_tooltip_options_from_config() {
        let config = Config {
            tooltip_offset: 4.0,
            preferred_placements: vec![Placement::TopRight],
            ..Config::default()
        };
        let options = config.tooltip_options();
        assert!((options.offset - 4.0).abs() < f64::EPSILON);
        assert_eq!(options.preferred_order, vec![Placement::TopRight]);
    }
}
