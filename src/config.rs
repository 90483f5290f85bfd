//! Search defaults and walk rules loaded from a TOML configuration file.
//!
//! # Configuration File Format
//!
//! ```toml
//! [search]
//! mode = "keyword"        # or "extension"
//! case_sensitive = true
//! fuzzy = false
//!
//! [walk]
//! follow_links = false
//! include_hidden = true
//! max_depth = 32
//!
//! [walk.exclude]
//! patterns = ["node_modules/**", "**/.git/**"]
//! regex = ['^~\$']
//! ```
//!
//! Every table and key is optional.

use crate::query::SearchMode;
use crate::search::WalkOptions;
use crate::session::SearchOptions;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".orderlyrc.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },

    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("could not read configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderlyConfig {
    pub search: SearchDefaults,
    pub walk: WalkRules,
}

/// Options a new session starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub fuzzy: bool,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            mode: SearchMode::Keyword,
            case_sensitive: true,
            fuzzy: false,
        }
    }
}

impl From<&SearchDefaults> for SearchOptions {
    fn from(defaults: &SearchDefaults) -> Self {
        SearchOptions {
            mode: defaults.mode,
            case_sensitive: defaults.case_sensitive,
            fuzzy: defaults.fuzzy,
        }
    }
}

/// How the directory tree is walked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkRules {
    pub follow_links: bool,
    pub include_hidden: bool,
    pub max_depth: Option<usize>,
    pub exclude: ExcludeRules,
}

impl Default for WalkRules {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_hidden: true,
            max_depth: None,
            exclude: ExcludeRules::default(),
        }
    }
}

/// Matches to drop from search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeRules {
    /// Glob patterns matched against the path relative to the search root.
    pub patterns: Vec<String>,
    /// Regexes matched against the file name.
    pub regex: Vec<String>,
}

impl OrderlyConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.orderlyrc.toml` in the current directory
    /// 3. `orderly/config.toml` in the user configuration directory
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(user_config) = dirs::config_dir()
            .map(|dir| dir.join("orderly").join("config.toml"))
            .filter(|path| path.exists())
        {
            return Self::load_from_file(&user_config);
        }

        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl WalkRules {
    /// Compiles the rules into walk options.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex pattern is invalid.
    pub fn compile(&self) -> Result<WalkOptions, ConfigError> {
        let exclude_patterns = self
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = self
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WalkOptions {
            follow_links: self.follow_links,
            max_depth: self.max_depth,
            include_hidden: self.include_hidden,
            exclude_patterns,
            exclude_regexes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = OrderlyConfig::default();
        assert_eq!(config.search.mode, SearchMode::Keyword);
        assert!(config.search.case_sensitive);
        assert!(!config.search.fuzzy);
        assert!(config.walk.include_hidden);
        assert!(!config.walk.follow_links);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: OrderlyConfig = toml::from_str("").unwrap();
        assert_eq!(config, OrderlyConfig::default());
    }

    #[test]
    fn test_partial_tables_fill_in_defaults() {
        let config: OrderlyConfig = toml::from_str(
            r#"
            [search]
            fuzzy = true

            [walk.exclude]
            patterns = ["build/**"]
            "#,
        )
        .unwrap();

        assert!(config.search.fuzzy);
        assert!(config.search.case_sensitive);
        assert!(config.walk.include_hidden);
        assert_eq!(config.walk.exclude.patterns, vec!["build/**"]);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("orderly.toml");
        fs::write(
            &path,
            "[search]\nmode = \"extension\"\n\n[walk]\nmax_depth = 2\n",
        )
        .unwrap();

        let config = OrderlyConfig::load(Some(&path)).unwrap();
        assert_eq!(config.search.mode, SearchMode::Extension);
        assert_eq!(config.walk.max_depth, Some(2));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = OrderlyConfig::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[search\nmode = ").unwrap();

        let result = OrderlyConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_unknown_mode_is_an_error() {
        let result: Result<OrderlyConfig, _> = toml::from_str("[search]\nmode = \"regex\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_compile_valid_rules() {
        let rules = WalkRules {
            follow_links: true,
            max_depth: Some(3),
            exclude: ExcludeRules {
                patterns: vec!["**/target/**".to_string()],
                regex: vec![r"^~\$".to_string()],
            },
            ..WalkRules::default()
        };

        let options = rules.compile().unwrap();
        assert!(options.follow_links);
        assert_eq!(options.max_depth, Some(3));
        assert_eq!(options.exclude_patterns.len(), 1);
        assert_eq!(options.exclude_regexes.len(), 1);
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let rules = WalkRules {
            exclude: ExcludeRules {
                patterns: vec!["[unclosed".to_string()],
                ..ExcludeRules::default()
            },
            ..WalkRules::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidGlobPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let rules = WalkRules {
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..ExcludeRules::default()
            },
            ..WalkRules::default()
        };
        assert!(matches!(
            rules.compile(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }
}
