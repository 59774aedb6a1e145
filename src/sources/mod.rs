//! Source file loading and record normalization.
//!
//! Each input file is a top-level JSON array of flat objects. Every element is
//! mapped to a [`NormalizedRecord`] carrying a positional id, a flattened text
//! rendering of a fixed field schema, and the serialized original element.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::SourceError;
use crate::models::{NormalizedRecord, RecordMetadata, SourceTag};

/// Read and parse a source file into its raw elements.
pub fn load_source_file(path: &Path) -> Result<Vec<Map<String, Value>>, SourceError> {
    let content = std::fs::read_to_string(path).map_err(|e| SourceError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| SourceError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let Value::Array(elements) = value else {
        return Err(SourceError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(i, element)| match element {
            Value::Object(map) => Ok(map),
            other => Err(SourceError::ParseError {
                path: path.to_path_buf(),
                reason: format!("element {} is not an object (found {})", i, kind_name(&other)),
            }),
        })
        .collect()
}

/// Map raw source elements to normalized records.
///
/// Pure transformation: ids are `{prefix}_{index}` with zero-based positions,
/// and missing fields render as empty strings rather than being omitted.
pub fn normalize(records: Vec<Map<String, Value>>, tag: SourceTag) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let text = render_text(&record, tag);
            let original = serde_json::to_string(&Value::Object(record))
                .unwrap_or_else(|_| "{}".to_string());
            NormalizedRecord {
                id: format!("{}_{}", tag.id_prefix(), i),
                text,
                metadata: RecordMetadata {
                    source: tag,
                    original,
                },
            }
        })
        .collect()
}

/// Convenience: load a file and normalize it in one step.
pub fn load_and_normalize(path: &Path, tag: SourceTag) -> Result<Vec<NormalizedRecord>, SourceError> {
    Ok(normalize(load_source_file(path)?, tag))
}

/// Render the labeled field schema for `tag` into a single text line.
///
/// Field order is fixed per source; each segment is `"{Label}: {value}."`
/// joined by single spaces, so a record with every field missing still yields
/// non-empty text.
fn render_text(record: &Map<String, Value>, tag: SourceTag) -> String {
    tag.fields()
        .iter()
        .map(|label| format!("{}: {}.", label, field_value(record, label)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// String rendering of one field. Missing, null, and structured values render
/// as empty string; scalar non-strings use their JSON display form.
fn field_value(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
