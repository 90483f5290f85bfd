//! Typed confirmation tokens guarding destructive and bulk actions.
//!
//! The user must type the action's token (`DELETE`, `MOVE`, `COPY`) before it
//! runs. Comparison ignores case; anything else, including no answer at all,
//! declines the action.

use std::fmt;

/// An action that needs a typed confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Delete,
    Move,
    Copy,
}

impl ActionKind {
    /// The word the user has to type.
    pub fn token(self) -> &'static str {
        match self {
            ActionKind::Delete => "DELETE",
            ActionKind::Move => "MOVE",
            ActionKind::Copy => "COPY",
        }
    }

    /// Whether `answer` authorizes this action.
    pub fn accepts(self, answer: Option<&str>) -> bool {
        answer.is_some_and(|answer| answer.to_uppercase() == self.token())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_compare_case_insensitively() {
        assert!(ActionKind::Delete.accepts(Some("DELETE")));
        assert!(ActionKind::Delete.accepts(Some("delete")));
        assert!(ActionKind::Move.accepts(Some("Move")));
        assert!(ActionKind::Copy.accepts(Some("cOpY")));
    }

    #[test]
    fn test_near_misses_are_declined() {
        assert!(!ActionKind::Delete.accepts(Some("Delet")));
        assert!(!ActionKind::Delete.accepts(Some("DELETE ")));
        assert!(!ActionKind::Delete.accepts(Some("")));
        assert!(!ActionKind::Delete.accepts(None));
        assert!(!ActionKind::Move.accepts(Some("COPY")));
    }
}
