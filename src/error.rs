use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic severity level for rule authoring checks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A structured message produced when checking a rule definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub message: String,
}

/// Produced by a codec when YAML text cannot be parsed.
///
/// `line` and `column` are populated when the parser reports a location. Both
/// are one-based and count from the start of the whole stream.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

/// Produced by a codec when a value cannot be rendered as YAML.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SerializeError {
    pub message: String,
}

/// Failures of the mutating path operations.
///
/// Read operations never fail: an unresolvable path is simply absent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path")]
    Empty,

    #[error("invalid segment '{segment}' in path '{path}'")]
    InvalidSegment { path: String, segment: String },

    #[error("index {index} in path '{path}' is too far past the end of its array")]
    IndexOutOfRange { path: String, index: usize },
}

/// Failure while evaluating one rule. Always contained at rule granularity.
#[derive(Clone, Debug, Error)]
pub enum EvalError {
    #[error("rule '{rule_id}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },

    /// More than one `[*]`, a wildcard with no base key, or a wildcard not
    /// followed by `.` or the end of the path.
    #[error("rule '{rule_id}' uses an unsupported wildcard in '{path}'")]
    UnsupportedWildcard { rule_id: String, path: String },
}

/// Failures of patch preview that the caller is expected to handle.
#[derive(Clone, Debug, Error)]
pub enum PatchError {
    #[error("cannot preview patch: {0}")]
    Parse(#[source] ParseError),

    #[error("invalid snippet: {0}")]
    Snippet(#[source] ParseError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Failures while loading a rule collection.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("invalid rule document: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid rule definition: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a list of rules or a mapping with a 'rules' key")]
    Shape,
}
