//! orderly - find files by name, then gather or trash them
//!
//! This library walks a folder for files whose names match a keyword (exact or
//! fuzzy) or an extension, keeps the latest results in a name-keyed index, and
//! lets the user move or copy every match into a new folder, or send one match
//! to the trash. Destructive steps wait for a typed confirmation token.

pub mod cli;
pub mod config;
pub mod confirm;
pub mod conflict;
pub mod deletion;
pub mod error;
pub mod fuzzy;
pub mod match_policy;
pub mod organize;
pub mod output;
pub mod query;
pub mod result_index;
pub mod search;
pub mod session;

pub use config::{ConfigError, OrderlyConfig};
pub use confirm::ActionKind;
pub use deletion::{DeleteOutcome, DeletionGate, SystemTrash, TrashProvider};
pub use error::{OrderlyError, OrderlyResult, ValidationError};
pub use match_policy::MatchPolicy;
pub use organize::{OrganizeAction, OrganizeEngine, OrganizeOutcome, OrganizeRequest};
pub use query::{Query, SearchMode};
pub use result_index::ResultIndex;
pub use search::{SearchEngine, WalkOptions};
pub use session::{SearchOptions, Session};

pub use cli::{Command, run_cli};
