//! Per-user search session: the chosen folder, search options, the latest
//! results, and the selected entry.
//!
//! Engines themselves are stateless; everything that has to survive between
//! calls lives here and is passed explicitly.

use crate::deletion::{DeleteOutcome, DeleteProposal, DeletionGate, TrashProvider};
use crate::error::{OrderlyError, OrderlyResult, ValidationError};
use crate::organize::{
    OrganizeAction, OrganizeEngine, OrganizeOutcome, OrganizePlan, OrganizeRequest, Transfer,
};
use crate::query::{Query, SearchMode};
use crate::result_index::ResultIndex;
use crate::search::SearchEngine;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options that shape the next search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub mode: SearchMode,
    pub case_sensitive: bool,
    pub fuzzy: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Keyword,
            case_sensitive: true,
            fuzzy: false,
        }
    }
}

/// Result of clicking an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
}

#[derive(Debug, Default)]
pub struct Session {
    engine: SearchEngine,
    root: Option<PathBuf>,
    options: SearchOptions,
    matches: Vec<PathBuf>,
    index: ResultIndex,
    selection: Option<String>,
}

impl Session {
    pub fn new(engine: SearchEngine, options: SearchOptions) -> Self {
        Self {
            engine,
            options,
            ..Self::default()
        }
    }

    /// Sets the folder to search. An empty path counts as no folder.
    pub fn set_root(&mut self, root: Option<PathBuf>) {
        self.root = root.filter(|root| !root.as_os_str().is_empty());
        match &self.root {
            Some(root) => info!(root = %root.display(), "Folder selected"),
            None => info!("Folder selection cleared"),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Changing any option discards the current results and selection.
    pub fn set_options(&mut self, options: SearchOptions) {
        if options != self.options {
            self.options = options;
            self.clear_results();
        }
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.set_options(SearchOptions { mode, ..self.options });
    }

    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        self.set_options(SearchOptions { fuzzy, ..self.options });
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.set_options(SearchOptions {
            case_sensitive,
            ..self.options
        });
    }

    /// Searches the selected folder and replaces the results.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::NoRootSelected`] without a folder
    /// * [`ValidationError::RootNotADirectory`] if the folder is gone or is a file
    /// * [`ValidationError::EmptyQuery`] if `text` is blank
    pub fn search(&mut self, text: &str) -> OrderlyResult<&[PathBuf]> {
        let root = self.root.as_ref().ok_or(ValidationError::NoRootSelected)?;
        if !root.is_dir() {
            return Err(ValidationError::RootNotADirectory(root.clone()).into());
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        let query = Query {
            text: text.to_string(),
            mode: self.options.mode,
            case_sensitive: self.options.case_sensitive,
            fuzzy: self.options.fuzzy,
        };
        let matches = self.engine.search(root, &query);

        self.index = ResultIndex::build(&matches);
        self.matches = matches;
        self.selection = None;
        Ok(&self.matches)
    }

    /// Every match of the latest search, including basename duplicates.
    pub fn matches(&self) -> &[PathBuf] {
        &self.matches
    }

    pub fn index(&self) -> &ResultIndex {
        &self.index
    }

    pub fn clear_results(&mut self) {
        self.matches.clear();
        self.index.clear();
        self.selection = None;
    }

    /// Selects `name`, or deselects it if it is already selected.
    pub fn select(&mut self, name: &str) -> OrderlyResult<SelectionChange> {
        self.index.lookup(name)?;
        if self.selection.as_deref() == Some(name) {
            self.selection = None;
            info!(file = name, "File deselected");
            return Ok(SelectionChange::Deselected);
        }
        self.selection = Some(name.to_string());
        info!(file = name, "File selected");
        Ok(SelectionChange::Selected)
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Path of the selected entry, if it still exists on disk.
    pub fn selected_path(&self) -> OrderlyResult<&Path> {
        let name = self
            .selection
            .as_deref()
            .ok_or(ValidationError::NothingSelected)?;
        let path = self.index.lookup(name)?;
        if !path.exists() {
            return Err(ValidationError::NotFound(name.to_string()).into());
        }
        Ok(path)
    }

    pub fn propose_delete<T: TrashProvider>(
        &self,
        gate: &DeletionGate<T>,
        name: &str,
    ) -> OrderlyResult<DeleteProposal> {
        gate.propose(&self.index, name)
    }

    /// Confirms a deletion and drops the selection if it pointed at the file.
    pub fn confirm_delete<T: TrashProvider>(
        &mut self,
        gate: &DeletionGate<T>,
        proposal: &DeleteProposal,
        answer: Option<&str>,
    ) -> OrderlyResult<DeleteOutcome> {
        let outcome = gate.confirm(proposal, &mut self.index, answer)?;
        if outcome.is_deleted() {
            self.forget(&proposal.name, &proposal.path);
        }
        Ok(outcome)
    }

    pub fn request_delete<T: TrashProvider>(
        &mut self,
        gate: &DeletionGate<T>,
        name: &str,
        answer: Option<&str>,
    ) -> OrderlyResult<DeleteOutcome> {
        let proposal = self.propose_delete(gate, name)?;
        self.confirm_delete(gate, &proposal, answer)
    }

    /// Plans gathering the current results into a new folder under the root.
    pub fn plan_organize(&self, request: &OrganizeRequest) -> OrderlyResult<OrganizePlan> {
        let root = self.root.as_ref().ok_or(ValidationError::NoRootSelected)?;
        OrganizeEngine::plan(&self.index, root, request)
    }

    /// Runs a planned organize and drops the files that left their folders
    /// from the results.
    pub fn execute_organize(
        &mut self,
        plan: &OrganizePlan,
        answer: Option<&str>,
    ) -> OrderlyResult<OrganizeOutcome> {
        let result = OrganizeEngine::execute(plan, &mut self.index, answer);
        let moved: &[Transfer] = match &result {
            Ok(OrganizeOutcome::Completed(report)) if report.action == OrganizeAction::Move => {
                report.transfers.as_slice()
            }
            Err(OrderlyError::OrganizeAborted { transferred, .. })
                if plan.action == OrganizeAction::Move =>
            {
                transferred.as_slice()
            }
            _ => &[],
        };
        self.matches
            .retain(|path| !moved.iter().any(|transfer| transfer.from == *path));
        self.drop_stale_selection();
        result
    }

    pub fn organize(
        &mut self,
        request: &OrganizeRequest,
        answer: Option<&str>,
    ) -> OrderlyResult<OrganizeOutcome> {
        let plan = self.plan_organize(request)?;
        self.execute_organize(&plan, answer)
    }

    fn forget(&mut self, name: &str, path: &Path) {
        self.matches.retain(|p| p != path);
        if self.selection.as_deref() == Some(name) {
            self.selection = None;
        }
    }

    fn drop_stale_selection(&mut self) {
        if let Some(name) = &self.selection
            && !self.index.contains(name)
        {
            self.selection = None;
        }
    }
}
