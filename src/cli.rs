//! Command-line front end for orderly.
//!
//! This module turns parsed commands into session calls:
//! - Loading search defaults and walk rules from configuration
//! - Running the search that every command starts from
//! - Asking for typed confirmation before organizing or deleting
//! - Reporting outcomes through [`OutputFormatter`]

use crate::config::OrderlyConfig;
use crate::deletion::{DeleteOutcome, DeletionGate, TrashProvider};
use crate::error::{OrderlyError, OrderlyResult};
use crate::organize::{OrganizeAction, OrganizeOutcome, OrganizeRequest};
use crate::output::OutputFormatter;
use crate::query::SearchMode;
use crate::search::SearchEngine;
use crate::session::{SearchOptions, Session};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Where and what to search. `None` options fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub root: PathBuf,
    pub query: String,
    pub mode: Option<SearchMode>,
    pub fuzzy: Option<bool>,
    pub case_sensitive: Option<bool>,
}

impl SearchArgs {
    fn options(&self, defaults: SearchOptions) -> SearchOptions {
        SearchOptions {
            mode: self.mode.unwrap_or(defaults.mode),
            case_sensitive: self.case_sensitive.unwrap_or(defaults.case_sensitive),
            fuzzy: self.fuzzy.unwrap_or(defaults.fuzzy),
        }
    }
}

/// A CLI command to execute.
#[derive(Debug, Clone)]
pub enum Command {
    /// List the files matching a query.
    Search { search: SearchArgs, json: bool },
    /// Gather every match into a new folder under the search root.
    Organize {
        search: SearchArgs,
        folder: String,
        action: OrganizeAction,
        confirm: Option<String>,
    },
    /// Send one match to the trash.
    Delete {
        search: SearchArgs,
        file: String,
        confirm: Option<String>,
    },
    /// Open one match with the default application.
    Open { search: SearchArgs, file: String },
}

/// Supplies the typed confirmation for a prompt.
pub trait ConfirmationSource {
    /// Returns the user's answer, or `None` if they backed out.
    fn ask(&mut self, prompt: &str) -> Option<String>;
}

/// Prints the prompt and reads one line from standard input.
pub struct StdinConfirmation;

impl ConfirmationSource for StdinConfirmation {
    fn ask(&mut self, prompt: &str) -> Option<String> {
        OutputFormatter::warning(prompt);
        print!("> ");
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim_end_matches(['\r', '\n']);
                (!answer.is_empty()).then(|| answer.to_string())
            }
        }
    }
}

/// Answers every prompt with the same fixed token.
pub struct PresetAnswer(pub Option<String>);

impl ConfirmationSource for PresetAnswer {
    fn ask(&mut self, _prompt: &str) -> Option<String> {
        self.0.clone()
    }
}

/// Runs `command`, printing results and status text.
///
/// Cancelled confirmations are reported and return `Ok(())`.
///
/// # Examples
///
/// ```no_run
/// use orderly::cli::{run_cli, Command, SearchArgs, StdinConfirmation};
/// use orderly::config::OrderlyConfig;
/// use orderly::deletion::SystemTrash;
///
/// let command = Command::Search {
///     search: SearchArgs {
///         root: "/home/me/Documents".into(),
///         query: "invoice".to_string(),
///         ..Default::default()
///     },
///     json: false,
/// };
/// if let Err(e) = run_cli(&command, &OrderlyConfig::default(), &mut StdinConfirmation, &SystemTrash) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli<T: TrashProvider>(
    command: &Command,
    config: &OrderlyConfig,
    confirmer: &mut dyn ConfirmationSource,
    trash: T,
) -> OrderlyResult<()> {
    match command {
        Command::Search { search, json } => {
            let session = search_session(search, config)?;
            if *json {
                OutputFormatter::json_matches(session.matches())?;
            } else {
                OutputFormatter::match_list(session.matches(), &search.root);
                report_search(&search.query, session.matches().len());
            }
            Ok(())
        }
        Command::Organize {
            search,
            folder,
            action,
            confirm,
        } => {
            let mut session = search_session(search, config)?;
            report_search(&search.query, session.matches().len());

            let request = OrganizeRequest::new(folder.as_str(), *action);
            let plan = session.plan_organize(&request)?;
            let answer = answer_for(confirm, confirmer, &plan.prompt());

            match session.execute_organize(&plan, answer.as_deref())? {
                OrganizeOutcome::Completed(report) => {
                    OutputFormatter::success(&format!(
                        "Successfully {} {} file(s) to '{}'.",
                        report.action.past_tense(),
                        report.processed(),
                        plan.folder_name
                    ));
                    OutputFormatter::transfer_table(&report);
                }
                OrganizeOutcome::Cancelled => OutputFormatter::cancelled("Organization"),
            }
            Ok(())
        }
        Command::Delete {
            search,
            file,
            confirm,
        } => {
            let mut session = search_session(search, config)?;
            session.select(file)?;

            let gate = DeletionGate::new(trash);
            let proposal = session.propose_delete(&gate, file)?;
            let answer = answer_for(confirm, confirmer, &proposal.prompt());

            match session.confirm_delete(&gate, &proposal, answer.as_deref())? {
                DeleteOutcome::Deleted { name, .. } => {
                    OutputFormatter::success(&format!("Successfully moved '{name}' to the trash."));
                }
                DeleteOutcome::Cancelled => OutputFormatter::cancelled("Deletion"),
            }
            Ok(())
        }
        Command::Open { search, file } => {
            let mut session = search_session(search, config)?;
            session.select(file)?;
            let path = session.selected_path()?;

            OutputFormatter::success(&format!("Opening file: '{file}'..."));
            open::that(path).map_err(|e| OrderlyError::Open {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

/// Builds a session from configuration and runs the command's search.
fn search_session(args: &SearchArgs, config: &OrderlyConfig) -> OrderlyResult<Session> {
    let engine = SearchEngine::new(config.walk.compile()?);
    let options = args.options(SearchOptions::from(&config.search));

    let mut session = Session::new(engine, options);
    session.set_root(Some(args.root.clone()));
    OutputFormatter::info(&format!(
        "Searching for '{}' in '{}'...",
        args.query.trim(),
        args.root.display()
    ));
    session.search(&args.query)?;
    Ok(session)
}

fn report_search(query: &str, found: usize) {
    if found == 0 {
        OutputFormatter::warning(&format!("No files found containing '{}'.", query.trim()));
    } else {
        OutputFormatter::success(&format!("Search complete. Found {found} file(s)."));
    }
}

fn answer_for(
    preset: &Option<String>,
    confirmer: &mut dyn ConfirmationSource,
    prompt: &str,
) -> Option<String> {
    match preset {
        Some(token) => Some(token.clone()),
        None => confirmer.ask(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_args_override_defaults() {
        let args = SearchArgs {
            mode: Some(SearchMode::Extension),
            fuzzy: None,
            case_sensitive: Some(false),
            ..Default::default()
        };
        let defaults = SearchOptions {
            mode: SearchMode::Keyword,
            case_sensitive: true,
            fuzzy: true,
        };

        let options = args.options(defaults);
        assert_eq!(options.mode, SearchMode::Extension);
        assert!(!options.case_sensitive);
        assert!(options.fuzzy);
    }

    #[test]
    fn test_preset_answer_wins_over_prompt() {
        struct Unreachable;
        impl ConfirmationSource for Unreachable {
            fn ask(&mut self, _prompt: &str) -> Option<String> {
                panic!("should not prompt when a token was given");
            }
        }

        let answer = answer_for(&Some("MOVE".to_string()), &mut Unreachable, "prompt");
        assert_eq!(answer.as_deref(), Some("MOVE"));

        let mut preset = PresetAnswer(None);
        assert_eq!(answer_for(&None, &mut preset, "prompt"), None);
    }
}
