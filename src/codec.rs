//! The YAML capability the engine depends on.
//!
//! Validation and patch preview never reach for a parser on their own; they
//! take a [`YamlCodec`]. [`SaphyrCodec`] is the default, backed by
//! `serde-saphyr` with [`Value`] as the document model so mapping key order
//! survives a parse/dump round trip.
//!
//! Streams keep one entry per document: an empty document (`---` with nothing
//! after it) and an explicit `null` document both parse to [`Value::Null`], so
//! a document's position in the stream is its index in the parsed list.

use crate::error::{ParseError, SerializeError};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Separator placed between documents of a serialized stream.
pub const DOCUMENT_SEPARATOR: &str = "---\n";

/// Parse and serialize capability for a YAML document stream.
pub trait YamlCodec {
    /// Parses text holding exactly one document (e.g. a fix snippet).
    fn parse(&self, input: &str) -> Result<Value, ParseError>;

    /// Parses a possibly multi-document stream into one entry per document,
    /// in stream order. Empty documents are [`Value::Null`].
    fn parse_all(&self, input: &str) -> Result<Vec<Value>, ParseError>;

    /// Serializes one document, preserving mapping key order.
    fn dump(&self, value: &Value) -> Result<String, SerializeError>;

    /// Serializes a stream, one document per entry, joined by
    /// [`DOCUMENT_SEPARATOR`]. Parsing the output with [`YamlCodec::parse_all`]
    /// yields the same number of documents.
    fn dump_all(&self, values: &[Value]) -> Result<String, SerializeError> {
        let mut out = String::new();
        for (i, value) in values.iter().enumerate() {
            let yaml = self.dump(value)?;
            let body = yaml.strip_prefix(DOCUMENT_SEPARATOR).unwrap_or(&yaml);
            // A blank first document needs its marker to be kept on reparse.
            if i > 0 || body.trim().is_empty() {
                out.push_str(DOCUMENT_SEPARATOR);
            }
            out.push_str(body);
            if !body.ends_with('\n') {
                out.push('\n');
            }
        }
        Ok(out)
    }
}

/// Default codec backed by `serde-saphyr`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SaphyrCodec;

impl YamlCodec for SaphyrCodec {
    fn parse(&self, input: &str) -> Result<Value, ParseError> {
        serde_saphyr::from_str::<Value>(input).map_err(|e| parse_error(e.to_string()))
    }

    fn parse_all(&self, input: &str) -> Result<Vec<Value>, ParseError> {
        split_documents(input)
            .iter()
            .map(|section| {
                if section.is_blank() {
                    return Ok(Value::Null);
                }
                serde_saphyr::from_str::<Value>(&section.text)
                    .map_err(|e| section.locate(parse_error(e.to_string())))
            })
            .collect()
    }

    fn dump(&self, value: &Value) -> Result<String, SerializeError> {
        serde_saphyr::to_string(value).map_err(|e| SerializeError {
            message: format!("failed to serialize to YAML: {}", e),
        })
    }
}

// ─── Stream splitting ───────────────────────────────────────────────────────

/// Source text of one document of a stream.
struct Section {
    text: String,
    /// Zero-based line of the stream on which `text` starts.
    first_line: usize,
    /// Byte column of the stream at which the first line of `text` starts.
    first_column: usize,
    /// Opened by a `---` marker rather than implied by content.
    explicit: bool,
}

impl Section {
    fn implicit(first_line: usize) -> Self {
        Section {
            text: String::new(),
            first_line,
            first_column: 0,
            explicit: false,
        }
    }

    /// Holds nothing but blank lines, comments and directives: an empty
    /// document, which loads as `null`.
    fn is_blank(&self) -> bool {
        self.text.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#') || line.starts_with('%')
        })
    }

    /// Shift a location reported against `text` to stream coordinates, in the
    /// fields and in the message.
    fn locate(&self, mut err: ParseError) -> ParseError {
        let (Some(line), Some(column)) = (err.line, err.column) else {
            err.line = err.line.map(|l| l + self.first_line);
            return err;
        };
        let line_shift = self.first_line;
        let column_shift = if line == 1 { self.first_column } else { 0 };
        if line_shift == 0 && column_shift == 0 {
            return err;
        }
        let (line, column) = (line + line_shift, column + column_shift);
        err.message = LOCATION_RE
            .replace(&err.message, format!("line {}, column {}", line, column).as_str())
            .into_owned();
        err.line = Some(line);
        err.column = Some(column);
        err
    }
}

/// The rest of `line` after a document marker, if `line` is one.
fn after_marker<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
}

/// Split a stream at its document markers.
///
/// `---` and `...` are markers only at the start of a line, where they cannot
/// occur inside any node, so the split never cuts through content. Every
/// document opened by `---` is kept even when empty; text before the first
/// marker or after a `...` counts only if it holds content.
fn split_documents(input: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section::implicit(0);

    for (n, line) in input.split_inclusive('\n').enumerate() {
        if let Some(rest) = after_marker(line, "---") {
            let body = rest.trim_start_matches([' ', '\t']);
            let next = Section {
                text: body.to_string(),
                first_line: n,
                first_column: line.len() - body.len(),
                explicit: true,
            };
            sections.push(std::mem::replace(&mut current, next));
        } else if after_marker(line, "...").is_some() {
            sections.push(std::mem::replace(&mut current, Section::implicit(n + 1)));
        } else {
            current.text.push_str(line);
        }
    }
    sections.push(current);

    sections.retain(|s| s.explicit || !s.is_blank());
    sections
}

static LOCATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)line\s*:?\s*(\d+)\s*,?\s*col(?:umn)?\s*:?\s*(\d+)").unwrap());

/// Build a [`ParseError`], lifting the location out of the parser's message
/// when it reports one.
pub(crate) fn parse_error(message: String) -> ParseError {
    let (line, column) = match LOCATION_RE.captures(&message) {
        Some(caps) => (
            caps.get(1).and_then(|m| m.as_str().parse().ok()),
            caps.get(2).and_then(|m| m.as_str().parse().ok()),
        ),
        None => (None, None),
    };
    ParseError {
        message,
        line,
        column,
    }
}
