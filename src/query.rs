//! Search queries and the options that shape them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the query text is compared against file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Substring (or fuzzy) match on the whole file name.
    #[default]
    Keyword,
    /// Match on the file extension only.
    Extension,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Keyword => write!(f, "keyword"),
            SearchMode::Extension => write!(f, "extension"),
        }
    }
}

/// A single search request.
///
/// Extension mode and fuzzy matching always compare case-insensitively,
/// whatever `case_sensitive` says. Use [`Query::is_effectively_case_sensitive`]
/// rather than reading the flag directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub fuzzy: bool,
}

impl Query {
    /// Plain keyword query, case-sensitive, no fuzzy matching.
    pub fn keyword(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: SearchMode::Keyword,
            case_sensitive: true,
            fuzzy: false,
        }
    }

    /// Extension query. `text` may carry dots or other punctuation.
    pub fn extension(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: SearchMode::Extension,
            case_sensitive: false,
            fuzzy: false,
        }
    }

    /// Fuzzy keyword query.
    pub fn fuzzy(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: SearchMode::Keyword,
            case_sensitive: false,
            fuzzy: true,
        }
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn is_effectively_case_sensitive(&self) -> bool {
        self.case_sensitive && !self.fuzzy && self.mode == SearchMode::Keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mode_forces_case_insensitive() {
        let query = Query::extension("pdf").with_case_sensitive(true);
        assert!(!query.is_effectively_case_sensitive());
    }

    #[test]
    fn test_fuzzy_forces_case_insensitive() {
        let query = Query::fuzzy("report").with_case_sensitive(true);
        assert!(!query.is_effectively_case_sensitive());
    }

    #[test]
    fn test_keyword_respects_flag() {
        assert!(Query::keyword("a").is_effectively_case_sensitive());
        assert!(
            !Query::keyword("a")
                .with_case_sensitive(false)
                .is_effectively_case_sensitive()
        );
    }

    #[test]
    fn test_search_mode_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: SearchMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"extension\"").unwrap();
        assert_eq!(parsed.mode, SearchMode::Extension);
    }
}
