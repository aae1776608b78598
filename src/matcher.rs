//! Evaluation of one rule against one document.
//!
//! A [`RuleMatcher`] is built once per rule (compiling its pattern) and then
//! run against every document of a stream. Evaluation never mutates the
//! document and never fails because a path is absent; absence is the signal
//! the required-field check looks for.

use crate::enums::FixAction;
use crate::error::EvalError;
use crate::path::{get, has, join, parent_path, split_wildcard, wildcard_is_supported};
use crate::search::find_path_by_value;
use crate::types::*;
use regex::Regex;
use serde_json::Value;

/// A rule prepared for evaluation.
#[derive(Debug)]
pub struct RuleMatcher<'r> {
    rule: &'r Rule,
    pattern: Option<Regex>,
    kinds: Vec<String>,
}

/// Locations a rule's match path expands to in one document.
struct Candidates {
    paths: Vec<String>,
    wildcard: bool,
}

impl<'r> RuleMatcher<'r> {
    /// Prepare `rule`, compiling its pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidPattern`] if the pattern is not a valid
    /// regular expression.
    pub fn new(rule: &'r Rule) -> Result<Self, EvalError> {
        let pattern = match rule.pattern() {
            Some(p) => Some(Regex::new(p).map_err(|source| EvalError::InvalidPattern {
                rule_id: rule.id.clone(),
                source,
            })?),
            None => None,
        };
        Ok(RuleMatcher {
            rule,
            pattern,
            kinds: rule.kinds(),
        })
    }

    pub fn rule(&self) -> &'r Rule {
        self.rule
    }

    /// Whether the rule is enabled and its kind filter admits `doc`.
    pub fn applies_to(&self, doc: &Value) -> bool {
        if !self.rule.enabled {
            return false;
        }
        if self.kinds.is_empty() {
            return true;
        }
        match doc.get("kind").and_then(Value::as_str) {
            Some(kind) => {
                let kind = kind.to_lowercase();
                self.kinds.iter().any(|k| *k == kind)
            }
            None => false,
        }
    }

    /// Evaluate the rule against `doc`, the `doc_index`-th document of its
    /// stream. Pattern results come before required-field results.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnsupportedWildcard`] when the match path uses a
    /// wildcard form the engine cannot expand.
    pub fn evaluate(
        &self,
        doc: &Value,
        doc_index: usize,
    ) -> Result<Vec<ValidationResult>, EvalError> {
        let mut results = Vec::new();
        if !self.applies_to(doc) {
            return Ok(results);
        }

        let candidates = self.candidates(doc)?;

        if let Some(re) = &self.pattern {
            for elem_path in &candidates.paths {
                self.check_pattern(doc, doc_index, re, elem_path, candidates.wildcard, &mut results);
            }
        }

        if self.rule.required {
            self.check_required(doc, doc_index, &candidates, &mut results);
        }

        Ok(results)
    }

    /// Expand the match path. A wildcard over an array yields one path per
    /// element; over any other present value it yields the base itself as a
    /// single implicit element; over an absent or `null` base it yields nothing.
    fn candidates(&self, doc: &Value) -> Result<Candidates, EvalError> {
        let match_path = self.rule.match_path.as_str();
        let Some((base, remainder)) = split_wildcard(match_path) else {
            return Ok(Candidates {
                paths: vec![match_path.to_string()],
                wildcard: false,
            });
        };

        if !wildcard_is_supported(match_path) {
            return Err(EvalError::UnsupportedWildcard {
                rule_id: self.rule.id.clone(),
                path: match_path.to_string(),
            });
        }

        let paths = match get(doc, base) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => (0..items.len())
                .map(|i| format!("{}[{}]{}", base, i, remainder))
                .collect(),
            Some(_) => vec![format!("{}{}", base, remainder)],
        };
        Ok(Candidates {
            paths,
            wildcard: true,
        })
    }

    fn check_pattern(
        &self,
        doc: &Value,
        doc_index: usize,
        re: &Regex,
        elem_path: &str,
        wildcard: bool,
        results: &mut Vec<ValidationResult>,
    ) {
        let Some(Value::String(observed)) = get(doc, elem_path) else {
            return;
        };
        if !self.sibling_holds(doc, elem_path) || !re.is_match(observed) {
            return;
        }

        let mut result_path = elem_path.to_string();
        if result_path.is_empty() {
            if let Some(found) = find_path_by_value(doc, &Value::String(observed.clone())) {
                result_path = found;
            } else {
                tracing::debug!(rule = %self.rule.id, "result has no path");
            }
        }

        let fallback = if wildcard {
            FixAction::Insert
        } else {
            FixAction::Replace
        };
        let message = self.rule.display_message().unwrap_or_default().to_string();
        results.push(self.result(result_path, doc_index, message, fallback));
    }

    fn check_required(
        &self,
        doc: &Value,
        doc_index: usize,
        candidates: &Candidates,
        results: &mut Vec<ValidationResult>,
    ) {
        if !candidates.wildcard {
            let match_path = self.rule.match_path.as_str();
            let parent = parent_path(match_path);
            // A missing child of a missing parent is not reported.
            if !parent.is_empty() && !has(doc, &parent) {
                return;
            }
        }

        for elem_path in &candidates.paths {
            if has(doc, elem_path) {
                continue;
            }
            let message = match self.rule.display_message() {
                Some(m) => m.to_string(),
                None => format!("Missing required field: {}", self.rule.match_path),
            };
            results.push(self.result(elem_path.clone(), doc_index, message, FixAction::Insert));
        }
    }

    /// The sibling condition holds when the rule has none, or when the named
    /// property next to `elem_path` stringifies to the expected value.
    fn sibling_holds(&self, doc: &Value, elem_path: &str) -> bool {
        let Some((property, expected)) = self.rule.sibling_condition() else {
            return true;
        };
        let sibling_path = join(&parent_path(elem_path), property);
        match get(doc, &sibling_path) {
            Some(actual) => value_to_string(actual) == value_to_string(expected),
            None => false,
        }
    }

    fn result(
        &self,
        path: String,
        doc_index: usize,
        message: String,
        fallback: FixAction,
    ) -> ValidationResult {
        let suggestion = self
            .rule
            .fix
            .as_ref()
            .map(|fix| Suggestion::from_fix(fix, &path, fallback));
        ValidationResult {
            rule_id: self.rule.id.clone(),
            severity: self.rule.severity,
            message,
            path: Some(path),
            doc_index: Some(doc_index),
            suggestion,
            mark: None,
            explain: self.rule.explain.clone(),
        }
    }
}

/// Scalars render naturally, composites as compact JSON.
fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => serde_json::to_string(v).unwrap_or_default(),
    }
}
