//! Rule collections: loading, authoring checks and import merging.

use crate::codec::{SaphyrCodec, YamlCodec};
use crate::error::*;
use crate::matcher::RuleMatcher;
use crate::path::{WILDCARD, parse_path, wildcard_is_supported};
use crate::types::*;
use crate::validate::validate_with;
use serde_json::Value;
use std::collections::HashSet;

/// Load rules from YAML or JSON text.
///
/// Accepts either a sequence of rules or a mapping whose `rules` key holds
/// one.
///
/// # Errors
///
/// Fails if the text does not parse, has neither accepted shape, or holds an
/// entry that is not a rule.
pub fn load_rules(input: &str) -> Result<Vec<Rule>, RuleSetError> {
    let value = SaphyrCodec.parse(input)?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.shift_remove("rules") {
            Some(rules @ Value::Array(_)) => rules,
            _ => return Err(RuleSetError::Shape),
        },
        _ => return Err(RuleSetError::Shape),
    };
    Ok(serde_json::from_value(list)?)
}

/// Report authoring problems in a single rule.
///
/// Errors mark rules the engine will skip; warnings mark rules that load but
/// can never produce a result.
pub fn check_rule(rule: &Rule) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let id = (!rule.id.is_empty()).then(|| rule.id.clone());
    let mut push = |severity, code: &str, message: String| {
        diags.push(Diagnostic {
            severity,
            code: code.to_string(),
            rule_id: id.clone(),
            message,
        });
    };

    if rule.id.trim().is_empty() {
        push(
            DiagnosticSeverity::Error,
            "missing-id",
            "rule has no id".to_string(),
        );
    }

    if rule.match_path.trim().is_empty() {
        push(
            DiagnosticSeverity::Error,
            "missing-match",
            "rule has no match path".to_string(),
        );
    } else if !wildcard_is_supported(&rule.match_path) {
        push(
            DiagnosticSeverity::Error,
            "unsupported-wildcard",
            format!(
                "'{}' must use at most one [*], directly after a key",
                rule.match_path
            ),
        );
    } else if let Err(e) = parse_path(&rule.match_path.replacen(WILDCARD, "", 1)) {
        push(
            DiagnosticSeverity::Warning,
            "invalid-path",
            format!("{}; the rule will never match", e),
        );
    }

    if rule.pattern().is_none() && !rule.required {
        push(
            DiagnosticSeverity::Warning,
            "no-check",
            "rule has neither a pattern nor required: true".to_string(),
        );
    }

    if let Err(e) = RuleMatcher::new(rule) {
        push(DiagnosticSeverity::Error, "invalid-pattern", e.to_string());
    }

    if rule.sibling_property.is_some() != rule.sibling_value.is_some() {
        push(
            DiagnosticSeverity::Warning,
            "incomplete-sibling",
            "siblingProperty and siblingValue must be set together".to_string(),
        );
    }

    diags
}

/// Counts reported by [`RuleSet::merge`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
}

/// An ordered collection of rules with unique ids.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule collection. See [`load_rules`].
    pub fn load(input: &str) -> Result<Self, RuleSetError> {
        let mut set = Self::new();
        set.merge(load_rules(input)?);
        Ok(set)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Import rules: a rule whose id is already present replaces the existing
    /// one in place, a new id is appended, and a blank id is skipped.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Rule>) -> MergeStats {
        let mut stats = MergeStats::default();
        for mut rule in incoming {
            rule.id = rule.id.trim().to_string();
            if rule.id.is_empty() {
                stats.skipped += 1;
                continue;
            }
            match self.rules.iter_mut().find(|r| r.id == rule.id) {
                Some(existing) => {
                    *existing = rule;
                    stats.replaced += 1;
                }
                None => {
                    self.rules.push(rule);
                    stats.added += 1;
                }
            }
        }
        tracing::debug!(
            added = stats.added,
            replaced = stats.replaced,
            skipped = stats.skipped,
            "merged rules"
        );
        stats
    }

    pub fn remove(&mut self, id: &str) -> Option<Rule> {
        let pos = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(pos))
    }

    /// Enable or disable a rule. Returns `false` if no rule has `id`.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Authoring diagnostics for every rule, plus duplicate-id errors for
    /// sets built outside [`RuleSet::merge`].
    pub fn check(&self) -> Vec<Diagnostic> {
        let mut seen = HashSet::new();
        let mut diags = Vec::new();
        for rule in &self.rules {
            diags.extend(check_rule(rule));
            if !seen.insert(rule.id.as_str()) {
                diags.push(Diagnostic {
                    severity: DiagnosticSeverity::Error,
                    code: "duplicate-id".to_string(),
                    rule_id: Some(rule.id.clone()),
                    message: format!("rule id '{}' is used more than once", rule.id),
                });
            }
        }
        diags
    }

    /// Validate `input` against this set with the given codec.
    pub fn validate_with(&self, codec: &dyn YamlCodec, input: &str) -> Vec<ValidationResult> {
        validate_with(codec, input, &self.rules)
    }

    /// Validate `input` against this set with the default codec.
    pub fn validate(&self, input: &str) -> Vec<ValidationResult> {
        self.validate_with(&SaphyrCodec, input)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        RuleSet { rules }
    }
}
