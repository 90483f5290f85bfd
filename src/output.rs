//! Output formatting and styling for the command-line front end.
//!
//! All user-facing text goes through [`OutputFormatter`] so colors and symbols
//! stay consistent. Diagnostics go through `tracing` instead.

use crate::organize::OrganizeReport;
use chrono::{DateTime, Local};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One search hit, as printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub name: String,
    pub path: PathBuf,
    pub size: Option<u64>,
    pub modified: Option<DateTime<Local>>,
}

impl MatchRecord {
    /// Reads size and modification time; a file that cannot be stat'ed keeps `None`s.
    pub fn from_path(path: &Path) -> Self {
        let metadata = path.metadata().ok();
        Self {
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            size: metadata.as_ref().map(|m| m.len()),
            modified: metadata
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Local>::from),
        }
    }
}

/// Prints status messages, result lists, and summaries.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message.green());
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints one line per match: the name in bold, then its folder, dimmed.
    ///
    /// Names shared by several matches are flagged, since only the last of
    /// them can be selected by name.
    pub fn match_list(matches: &[PathBuf], root: &Path) {
        Self::header("Found Files");
        if matches.is_empty() {
            println!("  No matching files found.");
            return;
        }

        for path in matches {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy())
                .unwrap_or_default();
            let folder = path
                .parent()
                .map(|parent| parent.strip_prefix(root).unwrap_or(parent))
                .filter(|folder| !folder.as_os_str().is_empty())
                .map(|folder| folder.display().to_string())
                .unwrap_or_else(|| ".".to_string());
            let shared = matches
                .iter()
                .filter(|other| other.file_name() == path.file_name())
                .count()
                > 1;

            if shared {
                println!(
                    "  {}  {}  {}",
                    name.bold(),
                    folder.dimmed(),
                    "(name shared)".yellow()
                );
            } else {
                println!("  {}  {}", name.bold(), folder.dimmed());
            }
        }
    }

    /// Prints matches as a JSON array on stdout.
    pub fn json_matches(matches: &[PathBuf]) -> serde_json::Result<()> {
        let records: Vec<MatchRecord> = matches.iter().map(|p| MatchRecord::from_path(p)).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        Ok(())
    }

    /// Prints where each file ended up, marking renamed ones.
    pub fn transfer_table(report: &OrganizeReport) {
        Self::header("SUMMARY");

        let width = report
            .transfers
            .iter()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0)
            .max(4);

        println!("{:<width$} | {}", "File".bold(), "Now at".bold(), width = width);
        println!("{}", "-".repeat(width + 10));
        for transfer in &report.transfers {
            let landed = transfer
                .to
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            if landed == transfer.name {
                println!("{:<width$} | {}", transfer.name, landed, width = width);
            } else {
                println!(
                    "{:<width$} | {} {}",
                    transfer.name,
                    landed.yellow(),
                    "(renamed)".dimmed(),
                    width = width
                );
            }
        }
        println!("{}", "-".repeat(width + 10));

        let count = report.processed();
        println!(
            "{:<width$} | {} {} {}",
            "Total".bold(),
            count.to_string().green().bold(),
            if count == 1 { "file" } else { "files" },
            report.action.past_tense(),
            width = width
        );

        for name in &report.skipped {
            println!(
                "{:<width$} | {}",
                name,
                "skipped, no free name".yellow(),
                width = width
            );
        }
    }

    pub fn cancelled(what: &str) {
        println!("{}", format!("{what} cancelled by user.").dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_match_record_reads_metadata() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, "12345").unwrap();

        let record = MatchRecord::from_path(&path);
        assert_eq!(record.name, "notes.txt");
        assert_eq!(record.size, Some(5));
        assert!(record.modified.is_some());
    }

    #[test]
    fn test_match_record_for_missing_file() {
        let record = MatchRecord::from_path(Path::new("/definitely/not/here.txt"));
        assert_eq!(record.name, "here.txt");
        assert_eq!(record.size, None);
        assert_eq!(record.modified, None);
    }

    #[test]
    fn test_match_record_serializes_to_json() {
        let record = MatchRecord {
            name: "a.txt".to_string(),
            path: PathBuf::from("/r/a.txt"),
            size: Some(1),
            modified: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "a.txt");
        assert_eq!(json["path"], "/r/a.txt");
        assert!(json["modified"].is_null());
    }
}
