//! Applying suggestions to documents and previewing the patched YAML.

use crate::codec::{SaphyrCodec, YamlCodec};
use crate::error::PatchError;
use crate::path;
use crate::types::Suggestion;
use serde_json::{Map, Value};

/// How much of the stream a preview renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Render every document of the stream instead of only the patched one.
    pub full_stream: bool,
}

/// Apply `suggestion` to `doc` in place.
///
/// `insert`, `replace` and `patch` write the snippet at the target path: the
/// suggestion's `snippet_obj`, else its `snippet_yaml` parsed with `codec`,
/// else an empty mapping. `remove` deletes the target path.
///
/// # Errors
///
/// Returns [`PatchError::Snippet`] if `snippet_yaml` does not parse and
/// [`PatchError::Path`] if the target path is empty or malformed.
pub fn apply_suggestion(
    doc: &mut Value,
    suggestion: &Suggestion,
    codec: &dyn YamlCodec,
) -> Result<(), PatchError> {
    if !suggestion.action.writes_value() {
        path::delete(doc, &suggestion.target_path);
        return Ok(());
    }

    let value = match (&suggestion.snippet_obj, &suggestion.snippet_yaml) {
        (Some(obj), _) => obj.clone(),
        (None, Some(yaml)) => codec.parse(yaml).map_err(PatchError::Snippet)?,
        (None, None) => Value::Object(Map::new()),
    };
    path::set(doc, &suggestion.target_path, value)?;
    Ok(())
}

/// Preview the result of applying `suggestion` to document `doc_index` of
/// `input`, using the default codec.
///
/// Returns `Ok(None)` when `doc_index` is out of range or the patched YAML
/// cannot be rendered.
///
/// # Errors
///
/// Fails if `input` is not valid YAML or the suggestion cannot be applied.
///
/// # Example
///
/// ```rust
/// use guardon::{FixAction, PreviewOptions, Suggestion, preview_patch};
///
/// let yaml = "kind: Deployment\nspec:\n  replicas: 1\n";
/// let suggestion = Suggestion {
///     action: FixAction::Replace,
///     target_path: "spec.replicas".to_string(),
///     snippet_obj: Some(serde_json::json!(3)),
///     snippet_yaml: None,
///     hint: String::new(),
/// };
///
/// let patched = preview_patch(yaml, 0, &suggestion, PreviewOptions::default())
///     .expect("valid input")
///     .expect("document 0 exists");
/// assert!(patched.contains("replicas: 3"));
/// ```
pub fn preview_patch(
    input: &str,
    doc_index: usize,
    suggestion: &Suggestion,
    options: PreviewOptions,
) -> Result<Option<String>, PatchError> {
    preview_patch_with(&SaphyrCodec, input, doc_index, suggestion, options)
}

/// [`preview_patch`] with an explicit codec.
pub fn preview_patch_with(
    codec: &dyn YamlCodec,
    input: &str,
    doc_index: usize,
    suggestion: &Suggestion,
    options: PreviewOptions,
) -> Result<Option<String>, PatchError> {
    let mut docs = codec.parse_all(input).map_err(PatchError::Parse)?;

    let Some(doc) = docs.get_mut(doc_index) else {
        tracing::debug!(doc_index, documents = docs.len(), "no document to patch");
        return Ok(None);
    };
    apply_suggestion(doc, suggestion, codec)?;

    let rendered = if options.full_stream {
        codec.dump_all(&docs)
    } else {
        codec.dump(&docs[doc_index])
    };

    match rendered {
        Ok(yaml) => Ok(Some(yaml)),
        Err(e) => {
            tracing::warn!(error = %e, "could not render patched document");
            Ok(None)
        }
    }
}
