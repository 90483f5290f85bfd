//! Error types shared by the search, organize, and deletion engines.
//!
//! Cancelling a confirmation is not an error: the gates report it through their
//! outcome enums. Unreadable subtrees during a search are not errors either; the
//! walk skips them and keeps going.

use crate::organize::{OrganizeAction, Transfer};
use std::path::PathBuf;
use thiserror::Error;

/// Bad or missing input. Raised before any filesystem mutation takes place.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("no folder selected")]
    NoRootSelected,

    #[error("{} is not a directory", .0.display())]
    RootNotADirectory(PathBuf),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("no files to organize; run a search first")]
    EmptyIndex,

    #[error("new folder name cannot be empty")]
    EmptyName,

    #[error("folder name '{0}' must be a single folder, not a path")]
    InvalidName(String),

    #[error("a folder named '{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("could not find file '{0}'")]
    NotFound(String),

    #[error("no file selected")]
    NothingSelected,
}

/// Errors reported by the library.
#[derive(Debug, Error)]
pub enum OrderlyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to create folder {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {} {} to {}: {source}", .action.verb(), .from.display(), .to.display())]
    Transfer {
        action: OrganizeAction,
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free name for '{filename}' in {}", .dir.display())]
    ConflictResolutionExhausted { dir: PathBuf, filename: String },

    #[error("organize stopped after {processed} file(s) in {}: {cause}", .destination.display())]
    OrganizeAborted {
        processed: usize,
        destination: PathBuf,
        /// Files that reached the destination before the failure.
        transferred: Vec<Transfer>,
        #[source]
        cause: Box<OrderlyError>,
    },

    #[error("failed to move {} to the trash: {detail}", .path.display())]
    Trash { path: PathBuf, detail: String },

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl OrderlyError {
    /// Returns true for input problems that left the filesystem untouched.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type OrderlyResult<T> = Result<T, OrderlyError>;
