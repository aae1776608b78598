use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::enums::*;
use crate::error::ParseError;

/// Rule id reported for the synthetic result produced when the input stream
/// cannot be parsed.
pub const PARSE_ERROR_RULE_ID: &str = "parse-error";

// ─── Rule ───────────────────────────────────────────────────────────────────

/// A declarative check: a pattern match and/or a required-presence check on
/// one path, plus metadata and an optional fix template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// Comma-separated, case-insensitive list of document kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "match")]
    pub match_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub required: bool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sibling_property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sibling_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<Explain>,
}

fn default_enabled() -> bool {
    true
}

/// Importers emit `required` as either a boolean or the strings
/// `"true"`/`"false"`.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    Ok(match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => b,
        BoolOrString::Str(s) => s.trim().eq_ignore_ascii_case("true"),
    })
}

impl Rule {
    /// A rule with the given id and match path and every other field at its
    /// default: enabled, severity `warning`, no pattern, not required.
    pub fn new(id: impl Into<String>, match_path: impl Into<String>) -> Self {
        Rule {
            id: id.into(),
            description: String::new(),
            kind: None,
            match_path: match_path.into(),
            pattern: None,
            required: false,
            severity: Severity::default(),
            message: String::new(),
            enabled: true,
            fix: None,
            sibling_property: None,
            sibling_value: None,
            explain: None,
        }
    }

    /// The pattern, treating an empty string as unset.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref().filter(|p| !p.is_empty())
    }

    /// Lowercased kind filters. Empty when the rule applies to every document.
    pub fn kinds(&self) -> Vec<String> {
        self.kind
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// The sibling condition, when both halves are present.
    pub fn sibling_condition(&self) -> Option<(&str, &Value)> {
        match (self.sibling_property.as_deref(), self.sibling_value.as_ref()) {
            (Some(prop), Some(value)) if !prop.is_empty() => Some((prop, value)),
            _ => None,
        }
    }

    /// Message for a result: `message`, else `description`.
    pub fn display_message(&self) -> Option<&str> {
        [self.message.as_str(), self.description.as_str()]
            .into_iter()
            .find(|m| !m.trim().is_empty())
    }
}

/// Fix template attached to a rule.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// When absent, the engine picks an action from the matching context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<FixAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default)]
    pub hint: String,
}

/// Human-facing rationale and references for a rule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explain {
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub refs: Vec<String>,
}

// ─── Results ────────────────────────────────────────────────────────────────

/// Location of a syntax error in the input stream.
///
/// Both fields are zero-based: the first character of the stream is
/// `{ line: 0, column: 0 }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub line: usize,
    pub column: usize,
}

/// A structural edit derived from a rule's fix template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub action: FixAction,
    pub target_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_obj: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_yaml: Option<String>,
    #[serde(default)]
    pub hint: String,
}

impl Suggestion {
    /// Build a suggestion from a fix template, using `fallback` when the
    /// template does not name an action.
    pub fn from_fix(fix: &Fix, target_path: &str, fallback: FixAction) -> Self {
        Suggestion {
            action: fix.action.unwrap_or(fallback),
            target_path: target_path.to_string(),
            snippet_obj: fix.value.clone(),
            snippet_yaml: None,
            hint: fix.hint.clone(),
        }
    }
}

/// One violation found by the engine.
///
/// `path` and `doc_index` are absent only for the parse-error result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain: Option<Explain>,
}

impl ValidationResult {
    /// The distinguished result reported when the input stream is not valid YAML.
    pub fn parse_error(err: &ParseError) -> Self {
        // Parsers count from one.
        let mark = err.line.map(|line| Mark {
            line: line.saturating_sub(1),
            column: err.column.map_or(0, |c| c.saturating_sub(1)),
        });
        ValidationResult {
            rule_id: PARSE_ERROR_RULE_ID.to_string(),
            severity: Severity::Error,
            message: format!("Invalid YAML: {}", err.message),
            path: None,
            doc_index: None,
            suggestion: None,
            mark,
            explain: None,
        }
    }

    pub fn is_parse_error(&self) -> bool {
        self.rule_id == PARSE_ERROR_RULE_ID && self.doc_index.is_none()
    }
}
