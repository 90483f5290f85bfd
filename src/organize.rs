//! Gathers every indexed file into a new folder, by moving or copying.
//!
//! Organizing is two-phase: [`OrganizeEngine::plan`] validates the request and
//! describes what will happen, then [`OrganizeEngine::execute`] runs it once the
//! user has typed the action's confirmation token.
use crate::confirm::ActionKind;
use crate::conflict;
use crate::error::{OrderlyError, OrderlyResult, ValidationError};
use crate::result_index::{IndexEntry, ResultIndex};
use std::fmt;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{error, info, warn};

/// What happens to the originals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrganizeAction {
    /// Relocate the file; the original is gone afterwards.
    #[default]
    Move,
    /// Duplicate content and timestamps; the original stays.
    Copy,
}

impl OrganizeAction {
    pub fn verb(self) -> &'static str {
        match self {
            OrganizeAction::Move => "move",
            OrganizeAction::Copy => "copy",
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            OrganizeAction::Move => "moved",
            OrganizeAction::Copy => "copied",
        }
    }

    pub fn kind(self) -> ActionKind {
        match self {
            OrganizeAction::Move => ActionKind::Move,
            OrganizeAction::Copy => ActionKind::Copy,
        }
    }
}

impl fmt::Display for OrganizeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrganizeAction::Move => write!(f, "Move"),
            OrganizeAction::Copy => write!(f, "Copy"),
        }
    }
}

/// A request to gather the current results into `base_dir/folder_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeRequest {
    pub folder_name: String,
    pub action: OrganizeAction,
}

impl OrganizeRequest {
    pub fn new(folder_name: impl Into<String>, action: OrganizeAction) -> Self {
        Self {
            folder_name: folder_name.into(),
            action,
        }
    }
}

/// A validated organize request waiting for confirmation.
#[derive(Debug, Clone)]
pub struct OrganizePlan {
    pub action: OrganizeAction,
    pub folder_name: String,
    pub base_dir: PathBuf,
    pub destination: PathBuf,
    pub file_count: usize,
}

impl OrganizePlan {
    /// The token the user must type to run this plan.
    pub fn expected_token(&self) -> &'static str {
        self.action.kind().token()
    }

    /// Text shown to the user when asking for confirmation.
    pub fn prompt(&self) -> String {
        format!(
            "You are about to {} {} file(s) into a new folder named:\n\n'{}'\n\ninside '{}'\n\nTo confirm, type {} below.",
            self.action.verb(),
            self.file_count,
            self.folder_name,
            self.base_dir.display(),
            self.expected_token()
        )
    }
}

/// One file that reached the destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub name: String,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Summary of a completed organize run.
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    pub action: OrganizeAction,
    pub destination: PathBuf,
    pub transfers: Vec<Transfer>,
    /// Names left in place because no free name was found for them.
    pub skipped: Vec<String>,
}

impl OrganizeReport {
    pub fn processed(&self) -> usize {
        self.transfers.len()
    }
}

#[derive(Debug, Clone)]
pub enum OrganizeOutcome {
    Completed(OrganizeReport),
    /// The confirmation token did not match; nothing was touched.
    Cancelled,
}

struct Batch {
    transfers: Vec<Transfer>,
    skipped: Vec<String>,
    failure: Option<OrderlyError>,
}

/// Validates, confirms, and carries out organize requests.
pub struct OrganizeEngine;

impl OrganizeEngine {
    /// Checks `request` against the current index and describes the run.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the index is empty, the folder name is
    /// blank or not a single path component, or the destination already exists.
    /// Organizing never merges into an existing folder.
    pub fn plan(
        index: &ResultIndex,
        base_dir: &Path,
        request: &OrganizeRequest,
    ) -> OrderlyResult<OrganizePlan> {
        if index.is_empty() {
            return Err(ValidationError::EmptyIndex.into());
        }

        let folder_name = request.folder_name.trim();
        if folder_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let mut components = Path::new(folder_name).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(ValidationError::InvalidName(folder_name.to_string()).into());
        }

        let destination = base_dir.join(folder_name);
        if destination.symlink_metadata().is_ok() {
            return Err(ValidationError::DestinationExists(destination).into());
        }

        Ok(OrganizePlan {
            action: request.action,
            folder_name: folder_name.to_string(),
            base_dir: base_dir.to_path_buf(),
            destination,
            file_count: index.count(),
        })
    }

    /// Runs `plan` if `answer` is the plan's confirmation token.
    ///
    /// Files are processed in index order. The first failure stops the run;
    /// files already transferred stay where they are, and moved ones are taken
    /// out of the index. A file with no free name in the destination is skipped
    /// and stays indexed. On success every transferred entry leaves the index.
    ///
    /// # Errors
    ///
    /// * [`OrderlyError::CreateDir`] if the destination cannot be created (no file touched)
    /// * [`OrderlyError::OrganizeAborted`] wrapping the failure of an individual file
    pub fn execute(
        plan: &OrganizePlan,
        index: &mut ResultIndex,
        answer: Option<&str>,
    ) -> OrderlyResult<OrganizeOutcome> {
        if index.is_empty() {
            return Err(ValidationError::EmptyIndex.into());
        }
        if plan.destination.symlink_metadata().is_ok() {
            return Err(ValidationError::DestinationExists(plan.destination.clone()).into());
        }

        if !plan.action.kind().accepts(answer) {
            info!(action = %plan.action, folder = %plan.folder_name, "Organize cancelled by user");
            return Ok(OrganizeOutcome::Cancelled);
        }

        fs::create_dir(&plan.destination).map_err(|e| OrderlyError::CreateDir {
            path: plan.destination.clone(),
            source: e,
        })?;
        info!(destination = %plan.destination.display(), "Created folder");

        let entries: Vec<_> = index.iter().cloned().collect();
        let Batch {
            transfers,
            skipped,
            failure,
        } = Self::transfer_all(plan, entries, conflict::MAX_CONFLICT_SUFFIX);

        if let Some(cause) = failure {
            if plan.action == OrganizeAction::Move {
                for transfer in &transfers {
                    index.remove(&transfer.name);
                }
            }
            return Err(OrderlyError::OrganizeAborted {
                processed: transfers.len(),
                destination: plan.destination.clone(),
                transferred: transfers,
                cause: Box::new(cause),
            });
        }

        if skipped.is_empty() {
            index.clear();
        } else {
            for transfer in &transfers {
                index.remove(&transfer.name);
            }
        }
        info!(
            action = %plan.action,
            processed = transfers.len(),
            skipped = skipped.len(),
            destination = %plan.destination.display(),
            "Organize complete"
        );

        Ok(OrganizeOutcome::Completed(OrganizeReport {
            action: plan.action,
            destination: plan.destination.clone(),
            transfers,
            skipped,
        }))
    }

    /// [`plan`](Self::plan) followed by [`execute`](Self::execute).
    pub fn organize(
        index: &mut ResultIndex,
        base_dir: &Path,
        request: &OrganizeRequest,
        answer: Option<&str>,
    ) -> OrderlyResult<OrganizeOutcome> {
        let plan = Self::plan(index, base_dir, request)?;
        Self::execute(&plan, index, answer)
    }

    /// Transfers `entries` into the already created destination, in order.
    ///
    /// A file without a free name is skipped; any other failure ends the batch.
    fn transfer_all(plan: &OrganizePlan, entries: Vec<IndexEntry>, max_suffix: u32) -> Batch {
        let mut batch = Batch {
            transfers: Vec::with_capacity(entries.len()),
            skipped: Vec::new(),
            failure: None,
        };

        for entry in entries {
            match Self::transfer_one(plan, &entry.name, &entry.path, max_suffix) {
                Ok(to) => batch.transfers.push(Transfer {
                    name: entry.name,
                    from: entry.path,
                    to,
                }),
                Err(cause @ OrderlyError::ConflictResolutionExhausted { .. }) => {
                    warn!(file = %entry.path.display(), error = %cause, "Skipping file");
                    batch.skipped.push(entry.name);
                }
                Err(cause) => {
                    error!(
                        file = %entry.path.display(),
                        processed = batch.transfers.len(),
                        error = %cause,
                        "Organize stopped"
                    );
                    batch.failure = Some(cause);
                    break;
                }
            }
        }

        batch
    }

    fn transfer_one(
        plan: &OrganizePlan,
        name: &str,
        from: &Path,
        max_suffix: u32,
    ) -> OrderlyResult<PathBuf> {
        let to = conflict::resolve_with_limit(&plan.destination, name, max_suffix)?;
        let result = match plan.action {
            OrganizeAction::Copy => copy_with_metadata(from, &to),
            OrganizeAction::Move => move_file(from, &to),
        };
        result.map_err(|e| OrderlyError::Transfer {
            action: plan.action,
            from: from.to_path_buf(),
            to: to.clone(),
            source: e,
        })?;
        Ok(to)
    }
}

/// Copies content, permissions, and access/modification times.
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    let metadata = fs::metadata(from)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    // Windows needs a writable handle to set times; elsewhere owning the file is enough.
    let copied = if cfg!(windows) {
        fs::OpenOptions::new().write(true).open(to)?
    } else {
        File::open(to)?
    };
    copied.set_times(times)
}

/// Renames `from` to `to`, copying then removing across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_with_metadata(from, to)?;
            fs::remove_file(from)
        }
        other => other,
    }
}
