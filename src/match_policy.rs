//! Decides whether a single file name matches a query.

use crate::fuzzy;
use crate::query::{Query, SearchMode};

/// Normalizes an extension query into a lower-case `.ext` suffix.
///
/// Every character that is not an ASCII letter or digit is dropped, so `"pdf"`,
/// `".PDF"` and `"p-d-f!"` all become `".pdf"`. Returns `None` when nothing is
/// left, meaning the query cannot match any file.
pub fn normalize_extension(text: &str) -> Option<String> {
    let stripped: String = text
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if stripped.is_empty() {
        None
    } else {
        Some(format!(".{}", stripped.to_lowercase()))
    }
}

/// A query prepared for matching many file names.
///
/// Folding and extension normalization happen once here instead of per file.
#[derive(Debug, Clone)]
pub struct MatchPolicy {
    kind: PolicyKind,
}

#[derive(Debug, Clone)]
enum PolicyKind {
    /// Extension query with nothing usable left after normalization.
    Nothing,
    Suffix(String),
    Fuzzy(String),
    Substring { needle: String, fold_case: bool },
}

impl MatchPolicy {
    pub fn new(query: &Query) -> Self {
        let kind = match query.mode {
            SearchMode::Extension => match normalize_extension(&query.text) {
                Some(suffix) => PolicyKind::Suffix(suffix),
                None => PolicyKind::Nothing,
            },
            SearchMode::Keyword if query.fuzzy => PolicyKind::Fuzzy(query.text.to_lowercase()),
            SearchMode::Keyword => {
                let fold_case = !query.is_effectively_case_sensitive();
                let needle = if fold_case {
                    query.text.to_lowercase()
                } else {
                    query.text.clone()
                };
                PolicyKind::Substring { needle, fold_case }
            }
        };
        Self { kind }
    }

    /// Returns false for every file name, e.g. an extension query of `"..."`.
    pub fn matches_nothing(&self) -> bool {
        matches!(self.kind, PolicyKind::Nothing)
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match &self.kind {
            PolicyKind::Nothing => false,
            PolicyKind::Suffix(suffix) => file_name.to_lowercase().ends_with(suffix.as_str()),
            PolicyKind::Fuzzy(text) => fuzzy::is_fuzzy_match(text, &file_name.to_lowercase()),
            PolicyKind::Substring { needle, fold_case } => {
                if *fold_case {
                    file_name.to_lowercase().contains(needle.as_str())
                } else {
                    file_name.contains(needle.as_str())
                }
            }
        }
    }
}

/// One-shot form of [`MatchPolicy::matches`].
pub fn matches(file_name: &str, query: &Query) -> bool {
    MatchPolicy::new(query).matches(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_normalization_variants() {
        assert_eq!(normalize_extension("pdf").as_deref(), Some(".pdf"));
        assert_eq!(normalize_extension(".PDF").as_deref(), Some(".pdf"));
        assert_eq!(normalize_extension("p-d-f!").as_deref(), Some(".pdf"));
        assert_eq!(normalize_extension("*.tar.gz").as_deref(), Some(".targz"));
    }

    #[test]
    fn test_extension_without_alphanumerics_matches_nothing() {
        let query = Query::extension("...");
        let policy = MatchPolicy::new(&query);
        assert!(policy.matches_nothing());
        assert!(!policy.matches("file."));
        assert!(!policy.matches("..."));
    }

    #[test]
    fn test_extension_mode_matches_suffix_case_insensitively() {
        for text in ["pdf", ".PDF", "p-d-f!"] {
            let query = Query::extension(text);
            assert!(matches("report.PDF", &query), "{text} should match report.PDF");
            assert!(matches("report.pdf", &query));
            assert!(!matches("report.pdff", &query), "{text} should not match report.pdff");
        }
    }

    #[test]
    fn test_extension_mode_ignores_fuzzy_and_case_flags() {
        let mut query = Query::extension("txt").with_case_sensitive(true);
        query.fuzzy = true;
        assert!(matches("NOTES.TXT", &query));
        assert!(!matches("notes.tx", &query));
    }

    #[test]
    fn test_keyword_case_sensitive() {
        let query = Query::keyword("Report");
        assert!(matches("Annual Report.docx", &query));
        assert!(!matches("annual report.docx", &query));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let query = Query::keyword("Report").with_case_sensitive(false);
        assert!(matches("annual report.docx", &query));
        assert!(matches("ANNUAL REPORT.DOCX", &query));
        assert!(!matches("annual.docx", &query));
    }

    #[test]
    fn test_case_insensitive_match_is_stable_under_uppercasing() {
        let names = ["invoice_march.pdf", "Photo 001.JPG", "notes.txt", "résumé.doc"];
        let queries = [
            Query::keyword("march").with_case_sensitive(false),
            Query::keyword("PHOTO").with_case_sensitive(false),
            Query::fuzzy("invoce"),
            Query::extension("txt"),
        ];
        for query in &queries {
            for name in names {
                assert_eq!(
                    matches(name, query),
                    matches(&name.to_uppercase(), query),
                    "{name} vs {query:?}"
                );
            }
        }
    }

    #[test]
    fn test_fuzzy_match_folds_case() {
        let query = Query::fuzzy("QUARTERLY");
        assert!(matches("quarterly_report.xlsx", &query));
        assert!(!matches("holiday.png", &query));
    }

    #[test]
    fn test_fuzzy_threshold_boundary() {
        assert!(!matches("abcx", &Query::fuzzy("abcd")));
        assert!(matches(
            "abcdefghijklmnopqrs123456",
            &Query::fuzzy("abcdefghijklmnopqrstuvwxy")
        ));
    }
}
