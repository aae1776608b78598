//! Validation of a YAML document stream against a rule list.
//!
//! Every document is checked against every rule independently. Results come
//! back in iteration order: documents outer, rules inner, pattern results
//! before required-field results within a rule.
//!
//! Bad rules never abort a run. A rule whose pattern does not compile is
//! skipped for the whole stream, and a rule that fails on one document is
//! skipped for that document only; both are logged.

use crate::codec::{SaphyrCodec, YamlCodec};
use crate::matcher::RuleMatcher;
use crate::types::*;
use serde_json::Value;

/// Validate `input` with the default codec.
///
/// Returns a single `parse-error` result if `input` is not valid YAML, an
/// empty list if it holds no documents, and otherwise every violation found.
///
/// # Example
///
/// ```rust
/// use guardon::{Rule, Severity, validate};
///
/// let yaml = "kind: Pod\nspec:\n  containers:\n    - image: nginx:latest\n";
/// let rule = Rule {
///     pattern: Some(":latest$".to_string()),
///     severity: Severity::Warning,
///     ..Rule::new("no-latest-tag", "spec.containers[*].image")
/// };
///
/// let results = validate(yaml, &[rule]);
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].path.as_deref(), Some("spec.containers[0].image"));
/// ```
pub fn validate(input: &str, rules: &[Rule]) -> Vec<ValidationResult> {
    validate_with(&SaphyrCodec, input, rules)
}

/// Validate `input`, parsing and rendering snippets with `codec`.
pub fn validate_with(codec: &dyn YamlCodec, input: &str, rules: &[Rule]) -> Vec<ValidationResult> {
    let docs = match codec.parse_all(input) {
        Ok(docs) => docs,
        Err(e) => {
            tracing::debug!(error = %e, "input is not valid YAML");
            return vec![ValidationResult::parse_error(&e)];
        }
    };
    if docs.is_empty() {
        return Vec::new();
    }

    let mut results = validate_documents(&docs, rules);
    render_snippets(codec, &mut results);
    results
}

/// Validate already-parsed documents. `docs[i]` is reported as `docIndex: i`.
pub fn validate_documents(docs: &[Value], rules: &[Rule]) -> Vec<ValidationResult> {
    let matchers = compile_rules(rules);
    let prepared = &matchers;

    let results = docs
        .iter()
        .enumerate()
        .flat_map(move |(doc_index, doc)| prepared.iter().map(move |m| (doc_index, doc, m)))
        .fold(Vec::new(), |mut acc, (doc_index, doc, matcher)| {
            match matcher.evaluate(doc, doc_index) {
                Ok(found) => acc.extend(found),
                Err(e) => tracing::warn!(
                    rule = %matcher.rule().id,
                    doc_index,
                    error = %e,
                    "skipping rule for document"
                ),
            }
            acc
        });

    tracing::debug!(
        documents = docs.len(),
        rules = matchers.len(),
        results = results.len(),
        "validation complete"
    );
    results
}

/// Prepare every rule, dropping (and logging) those that cannot be compiled.
pub fn compile_rules(rules: &[Rule]) -> Vec<RuleMatcher<'_>> {
    rules
        .iter()
        .filter_map(|rule| match RuleMatcher::new(rule) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(rule = %rule.id, error = %e, "skipping rule");
                None
            }
        })
        .collect()
}

/// Fill `snippet_yaml` for suggestions that carry a snippet value.
fn render_snippets(codec: &dyn YamlCodec, results: &mut [ValidationResult]) {
    for suggestion in results.iter_mut().filter_map(|r| r.suggestion.as_mut()) {
        if suggestion.snippet_yaml.is_some() {
            continue;
        }
        if let Some(obj) = &suggestion.snippet_obj {
            match codec.dump(obj) {
                Ok(yaml) => suggestion.snippet_yaml = Some(yaml),
                Err(e) => tracing::debug!(error = %e, "could not render snippet"),
            }
        }
    }
}
