//! Sends a single found file to the platform trash after a typed confirmation.

use crate::confirm::ActionKind;
use crate::error::{OrderlyError, OrderlyResult, ValidationError};
use crate::result_index::ResultIndex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Moves files into a recoverable trash.
pub trait TrashProvider {
    /// Trashes `path`, returning a human-readable reason on failure.
    fn send(&self, path: &Path) -> Result<(), String>;
}

/// The operating system's recycle bin / trash.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl TrashProvider for SystemTrash {
    fn send(&self, path: &Path) -> Result<(), String> {
        trash::delete(path).map_err(|e| e.to_string())
    }
}

impl<T: TrashProvider + ?Sized> TrashProvider for &T {
    fn send(&self, path: &Path) -> Result<(), String> {
        (**self).send(path)
    }
}

/// A deletion waiting for the user to type `DELETE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProposal {
    pub name: String,
    pub path: PathBuf,
}

impl DeleteProposal {
    pub fn expected_token(&self) -> &'static str {
        ActionKind::Delete.token()
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are about to move this file to the trash:\n\n'{}'\n\nTo confirm, type {} below.",
            self.path.display(),
            self.expected_token()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { name: String, path: PathBuf },
    /// The confirmation token did not match; the file and index are untouched.
    Cancelled,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }
}

/// Guards trashing an indexed file behind a typed confirmation.
#[derive(Debug, Clone, Default)]
pub struct DeletionGate<T: TrashProvider = SystemTrash> {
    trash: T,
}

impl<T: TrashProvider> DeletionGate<T> {
    pub fn new(trash: T) -> Self {
        Self { trash }
    }

    /// Checks that `name` is indexed and still on disk.
    pub fn propose(&self, index: &ResultIndex, name: &str) -> OrderlyResult<DeleteProposal> {
        let path = live_path(index, name)?;
        Ok(DeleteProposal {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }

    /// Trashes the proposed file if `answer` is `DELETE` (any case).
    ///
    /// The index entry is removed only after the trash accepted the file.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::NotFound`] if the entry changed or the file vanished since the proposal
    /// * [`OrderlyError::Trash`] if the trash provider refused the file
    pub fn confirm(
        &self,
        proposal: &DeleteProposal,
        index: &mut ResultIndex,
        answer: Option<&str>,
    ) -> OrderlyResult<DeleteOutcome> {
        let path = live_path(index, &proposal.name)?;
        if path != proposal.path {
            return Err(ValidationError::NotFound(proposal.name.clone()).into());
        }

        if !ActionKind::Delete.accepts(answer) {
            info!(file = %proposal.name, "Deletion cancelled by user");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(detail) = self.trash.send(&proposal.path) {
            warn!(path = %proposal.path.display(), error = %detail, "Could not move file to trash");
            return Err(OrderlyError::Trash {
                path: proposal.path.clone(),
                detail,
            });
        }

        index.remove(&proposal.name);
        info!(path = %proposal.path.display(), "Moved file to trash");
        Ok(DeleteOutcome::Deleted {
            name: proposal.name.clone(),
            path: proposal.path.clone(),
        })
    }

    /// [`propose`](Self::propose) followed by [`confirm`](Self::confirm).
    pub fn request_delete(
        &self,
        index: &mut ResultIndex,
        name: &str,
        answer: Option<&str>,
    ) -> OrderlyResult<DeleteOutcome> {
        let proposal = self.propose(index, name)?;
        self.confirm(&proposal, index, answer)
    }
}

fn live_path<'a>(index: &'a ResultIndex, name: &str) -> OrderlyResult<&'a Path> {
    let path = index.lookup(name)?;
    if !path.exists() {
        return Err(ValidationError::NotFound(name.to_string()).into());
    }
    Ok(path)
}
