use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use orderly::cli::{Command, SearchArgs, StdinConfirmation, run_cli};
use orderly::config::OrderlyConfig;
use orderly::deletion::SystemTrash;
use orderly::organize::OrganizeAction;
use orderly::query::SearchMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Find files by name and gather or trash them, with typed confirmation.
#[derive(Parser, Debug)]
#[command(name = "orderly")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List files whose names match the query
    Search {
        #[command(flatten)]
        search: SearchFlags,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move or copy every match into a new folder under ROOT
    Organize {
        #[command(flatten)]
        search: SearchFlags,

        /// Name of the folder to create
        #[arg(long, value_name = "NAME")]
        into: String,

        /// Copy files instead of moving them
        #[arg(long)]
        copy: bool,

        /// Confirmation token (MOVE or COPY); prompts when omitted
        #[arg(long, value_name = "TOKEN")]
        confirm: Option<String>,
    },
    /// Send one match to the trash
    Delete {
        #[command(flatten)]
        search: SearchFlags,

        /// File name of the match to delete
        file: String,

        /// Confirmation token (DELETE); prompts when omitted
        #[arg(long, value_name = "TOKEN")]
        confirm: Option<String>,
    },
    /// Open one match with the default application
    Open {
        #[command(flatten)]
        search: SearchFlags,

        /// File name of the match to open
        file: String,
    },
}

#[derive(Args, Debug)]
struct SearchFlags {
    /// Folder to search
    root: PathBuf,

    /// Keyword or extension to look for
    query: String,

    /// Match by file extension instead of keyword
    #[arg(short, long)]
    extension: bool,

    /// Tolerate typos in the keyword
    #[arg(short, long)]
    fuzzy: bool,

    /// Ignore letter case
    #[arg(short, long, conflicts_with = "case_sensitive")]
    ignore_case: bool,

    /// Respect letter case
    #[arg(long)]
    case_sensitive: bool,
}

impl From<SearchFlags> for SearchArgs {
    fn from(flags: SearchFlags) -> Self {
        let case_sensitive = match (flags.ignore_case, flags.case_sensitive) {
            (true, _) => Some(false),
            (_, true) => Some(true),
            _ => None,
        };
        SearchArgs {
            root: flags.root,
            query: flags.query,
            mode: flags.extension.then_some(SearchMode::Extension),
            fuzzy: flags.fuzzy.then_some(true),
            case_sensitive,
        }
    }
}

impl From<CliCommand> for Command {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Search { search, json } => Command::Search {
                search: search.into(),
                json,
            },
            CliCommand::Organize {
                search,
                into,
                copy,
                confirm,
            } => Command::Organize {
                search: search.into(),
                folder: into,
                action: if copy {
                    OrganizeAction::Copy
                } else {
                    OrganizeAction::Move
                },
                confirm,
            },
            CliCommand::Delete {
                search,
                file,
                confirm,
            } => Command::Delete {
                search: search.into(),
                file,
                confirm,
            },
            CliCommand::Open { search, file } => Command::Open {
                search: search.into(),
                file,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = OrderlyConfig::load(cli.config.as_deref())?;
    let command = Command::from(cli.command);

    run_cli(&command, &config, &mut StdinConfirmation, SystemTrash)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        let cli = Cli::try_parse_from(args).expect("Failed to parse arguments");
        Command::from(cli.command)
    }

    #[test]
    fn test_organize_flags_map_to_command() {
        let command = parse(&[
            "orderly", "organize", "/data", "pdf", "--extension", "--into", "Papers", "--copy",
            "--confirm", "copy",
        ]);
        match command {
            Command::Organize {
                search,
                folder,
                action,
                confirm,
            } => {
                assert_eq!(search.root, PathBuf::from("/data"));
                assert_eq!(search.mode, Some(SearchMode::Extension));
                assert_eq!(search.case_sensitive, None);
                assert_eq!(folder, "Papers");
                assert_eq!(action, OrganizeAction::Copy);
                assert_eq!(confirm.as_deref(), Some("copy"));
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_case_flags_conflict() {
        let result = Cli::try_parse_from([
            "orderly", "search", "/data", "x", "--ignore-case", "--case-sensitive",
        ]);
        assert!(result.is_err());

        match parse(&["orderly", "delete", "/data", "old", "old.log", "-i"]) {
            Command::Delete { search, file, .. } => {
                assert_eq!(search.case_sensitive, Some(false));
                assert_eq!(file, "old.log");
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }
}
