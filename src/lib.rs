//! Declarative rule evaluation and structural patching for YAML
//! configuration streams.
//!
//! Rules address values with dot-and-bracket paths (`spec.containers[0].image`,
//! or `spec.containers[*].image` to fan out over an array) and check them with
//! a regular expression, for presence, or both. Violations can carry a
//! suggestion that the patch engine applies and renders back to YAML:
//!
//! ```text
//! validate(yaml, rules) → Vec<ValidationResult> → suggestion
//!                                                  → preview_patch(yaml, doc_index, suggestion) → yaml
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use guardon::{FixAction, PreviewOptions, Rule, Severity};
//!
//! let yaml = r#"
//! apiVersion: v1
//! kind: Pod
//! metadata:
//!   name: web
//! spec:
//!   containers:
//!     - name: app
//!       image: nginx:1.27
//! "#;
//!
//! let rule: Rule = serde_json::from_value(serde_json::json!({
//!     "id": "require-resources",
//!     "kind": "Pod",
//!     "match": "spec.containers[*].resources",
//!     "required": true,
//!     "severity": "error",
//!     "message": "containers must declare resources",
//!     "fix": { "value": { "limits": { "memory": "256Mi" } }, "hint": "set limits" }
//! }))
//! .unwrap();
//!
//! let results = guardon::validate(yaml, &[rule]);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].severity, Severity::Error);
//!
//! let suggestion = results[0].suggestion.as_ref().unwrap();
//! assert_eq!(suggestion.action, FixAction::Insert);
//!
//! let patched = guardon::preview_patch(yaml, 0, suggestion, PreviewOptions::default())
//!     .unwrap()
//!     .unwrap();
//! assert!(patched.contains("resources:"));
//! assert!(patched.contains("256Mi"));
//! ```
//!
//! The YAML parser is injected: every entry point has a `*_with` form taking a
//! [`codec::YamlCodec`]. The plain forms use [`codec::SaphyrCodec`].

pub mod codec;
pub mod enums;
pub mod error;
pub mod matcher;
pub mod patch;
pub mod path;
pub mod ruleset;
pub mod search;
pub mod types;
pub mod validate;

pub use enums::*;
pub use error::*;
pub use types::*;

// Re-export entry-point functions at the crate root for convenience.
pub use codec::{SaphyrCodec, YamlCodec};
pub use patch::{PreviewOptions, apply_suggestion, preview_patch, preview_patch_with};
pub use ruleset::{RuleSet, load_rules};
pub use search::find_path_by_value;
pub use validate::{validate, validate_with};
