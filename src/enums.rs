//! Closed enumerations shared by rules, results and suggestions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached to a rule and to every result it produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Structural edit carried by a fix template or a suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixAction {
    Insert,
    Replace,
    Remove,
    Patch,
}

impl FixAction {
    /// Whether applying this action writes a value (as opposed to removing one).
    pub fn writes_value(self) -> bool {
        !matches!(self, FixAction::Remove)
    }
}
