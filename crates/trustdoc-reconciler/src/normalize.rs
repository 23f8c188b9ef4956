//! Normalize raw model payloads into extraction records
//!
//! Model output arrives in several shapes: an array of record objects, an
//! object with an `extractions` array, or a map of class name to value(s)
//! where values may be bare strings. Everything is turned into
//! [`ExtractionRecord`]s here so the reconciler only ever sees one shape.

use crate::error::ReconcileError;
use serde_json::{Map, Value};
use tracing::warn;
use trustdoc_domain::{ExtractionRecord, Span};

/// Values models emit to mean "nothing found"
const PLACEHOLDERS: &[&str] = &["N/A", "n/a", "None", "null"];

/// Records recovered from a payload plus the entries that were dropped
#[derive(Debug, Clone, Default)]
pub struct NormalizedPayload {
    /// Records in emission order
    pub records: Vec<ExtractionRecord>,

    /// Entries that could not be turned into records
    pub rejected: Vec<RejectedEntry>,
}

/// A payload entry that was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// Position of the entry in the payload
    pub index: usize,

    /// Why it was dropped
    pub reason: String,
}

/// Parse a model response string into records
pub fn parse_payload(response: &str) -> Result<NormalizedPayload, ReconcileError> {
    normalize_payload(&payload_json(response)?)
}

/// Parse a model response string into JSON without normalizing it
pub fn payload_json(response: &str) -> Result<Value, ReconcileError> {
    // Models sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response)?;

    serde_json::from_str(&json_str)
        .map_err(|e| ReconcileError::InvalidFormat(format!("JSON parse error: {}", e)))
}

/// Normalize an already-parsed payload into records
pub fn normalize_payload(json: &Value) -> Result<NormalizedPayload, ReconcileError> {
    match json {
        Value::Array(entries) => Ok(normalize_entries(entries)),
        Value::Object(obj) => match obj.get("extractions") {
            Some(Value::Array(entries)) => Ok(normalize_entries(entries)),
            Some(_) => Err(ReconcileError::InvalidFormat(
                "'extractions' must be an array".to_string(),
            )),
            None => Ok(normalize_class_map(obj)),
        },
        _ => Err(ReconcileError::InvalidFormat(
            "Expected a JSON array or object".to_string(),
        )),
    }
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ReconcileError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ReconcileError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip the opening fence and, if present, the closing one
        let end = if lines[lines.len() - 1].trim_start().starts_with("```") {
            lines.len() - 1
        } else {
            lines.len()
        };
        Ok(lines[1..end].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn normalize_entries(entries: &[Value]) -> NormalizedPayload {
    let mut payload = NormalizedPayload::default();
    for (idx, entry) in entries.iter().enumerate() {
        payload.push(idx, parse_entry(entry, None));
    }
    payload
}

fn normalize_class_map(obj: &Map<String, Value>) -> NormalizedPayload {
    let mut payload = NormalizedPayload::default();
    let mut idx = 0;
    for (class, value) in obj {
        match value {
            Value::Array(items) => {
                for item in items {
                    payload.push(idx, parse_entry(item, Some(class)));
                    idx += 1;
                }
            }
            other => {
                payload.push(idx, parse_entry(other, Some(class)));
                idx += 1;
            }
        }
    }
    payload
}

impl NormalizedPayload {
    fn push(&mut self, index: usize, entry: Result<ExtractionRecord, String>) {
        match entry {
            Ok(record) => self.records.push(record),
            Err(reason) => {
                warn!("Dropping payload entry {}: {}", index, reason);
                self.rejected.push(RejectedEntry { index, reason });
            }
        }
    }
}

/// Parse a single entry, using `class_hint` when the entry names no class
fn parse_entry(json: &Value, class_hint: Option<&str>) -> Result<ExtractionRecord, String> {
    let record = match json {
        Value::String(text) => {
            let class = class_hint.ok_or_else(|| "Bare string entry has no class".to_string())?;
            ExtractionRecord::new(class, text.as_str())
        }
        Value::Object(obj) => parse_record_object(obj, class_hint)?,
        Value::Null => return Err("Entry is null".to_string()),
        _ => return Err("Entry is neither a string nor an object".to_string()),
    };

    if PLACEHOLDERS.contains(&record.text.trim()) {
        return Err(format!("Placeholder value for class '{}'", record.class));
    }
    record.validate()?;
    Ok(record)
}

fn parse_record_object(
    obj: &Map<String, Value>,
    class_hint: Option<&str>,
) -> Result<ExtractionRecord, String> {
    let class = first_str(obj, &["class", "extraction_class"])
        .or(class_hint)
        .ok_or_else(|| "Missing or invalid 'class'".to_string())?;

    let text = first_str(obj, &["text", "extraction_text"])
        .ok_or_else(|| format!("Missing or invalid 'text' for class '{}'", class))?;

    let mut record = ExtractionRecord::new(class, text);
    record.span = parse_span(obj);
    record.confidence = obj.get("confidence").and_then(Value::as_f64);

    match obj.get("attributes") {
        Some(Value::Object(attrs)) => {
            record.attributes = attrs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        }
        Some(Value::Null) | None => {}
        Some(_) => return Err(format!("'attributes' is not an object for class '{}'", class)),
    }

    Ok(record)
}

fn first_str<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| obj.get(*k).and_then(Value::as_str))
}

/// Accepts `span {start, end}`, `char_interval {start_pos, end_pos}` or flat
/// `start_char`/`end_char`
fn parse_span(obj: &Map<String, Value>) -> Option<Span> {
    let offset = |v: Option<&Value>| v.and_then(Value::as_u64).map(|n| n as usize);

    if let Some(Value::Object(span)) = obj.get("span") {
        return Some(Span::new(offset(span.get("start"))?, offset(span.get("end"))?));
    }
    if let Some(Value::Object(interval)) = obj.get("char_interval") {
        return Some(Span::new(
            offset(interval.get("start_pos"))?,
            offset(interval.get("end_pos"))?,
        ));
    }
    Some(Span::new(
        offset(obj.get("start_char"))?,
        offset(obj.get("end_char"))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_array() {
        let response = r#"[
            {"class": "trust_name", "text": "JERRY SIMONS 2012 TRUST", "span": {"start": 0, "end": 23}},
            {"class": "trust_date", "text": "May 30, 2012", "confidence": 0.8}
        ]"#;

        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.records.len(), 2);
        assert_eq!(payload.records[0].span, Some(Span::new(0, 23)));
        assert_eq!(payload.records[1].confidence, Some(0.8));
        assert!(payload.rejected.is_empty());
    }

    #[test]
    fn test_parse_langextract_shape() {
        let response = r#"{"extractions": [
            {
                "extraction_class": "trustee",
                "extraction_text": "JERRY SIMONS",
                "char_interval": {"start_pos": 45, "end_pos": 57},
                "attributes": {"role": "initial"}
            }
        ]}"#;

        let payload = parse_payload(response).unwrap();
        let record = &payload.records[0];
        assert_eq!(record.class, "trustee");
        assert_eq!(record.span, Some(Span::new(45, 57)));
        assert_eq!(record.attributes["role"], "initial");
    }

    #[test]
    fn test_parse_flat_char_offsets() {
        let payload =
            parse_payload(r#"[{"class": "ein", "text": "12-3456789", "start_char": 3, "end_char": 13}]"#)
                .unwrap();
        assert_eq!(payload.records[0].span, Some(Span::new(3, 13)));
    }

    #[test]
    fn test_parse_class_map_with_bare_strings() {
        let response = r#"{
            "trust_name": "THE DOE FAMILY TRUST",
            "trustee": ["JANE DOE", {"text": "JOHN DOE"}],
            "law_firm": "N/A"
        }"#;

        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.records.len(), 3);
        assert!(payload.records.iter().all(|r| !r.class.is_empty()));
        assert_eq!(payload.rejected.len(), 1);
        assert!(payload.rejected[0].reason.contains("Placeholder"));
    }

    #[test]
    fn test_class_map_preserves_key_order() {
        let payload = parse_payload(
            r#"{"trust_date": "May 30, 2012", "effective_date": "June 1, 2012", "beneficiary": "ANNA"}"#,
        )
        .unwrap();
        let classes: Vec<_> = payload.records.iter().map(|r| r.class.as_str()).collect();
        assert_eq!(classes, vec!["trust_date", "effective_date", "beneficiary"]);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = "```json\n[{\"class\": \"trust_type\", \"text\": \"Revocable\"}]\n```";
        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.records.len(), 1);
        assert_eq!(payload.records[0].text, "Revocable");
    }

    #[test]
    fn test_parse_json_with_unterminated_fence() {
        let response = "```\n[{\"class\": \"trust_type\", \"text\": \"Irrevocable\"}]";
        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.records.len(), 1);
    }

    #[test]
    fn test_partial_success() {
        let response = r#"[
            {"class": "trust_name", "text": "A TRUST"},
            {"class": "trust_date"},
            "orphan string",
            {"class": "grantor", "text": "   "},
            {"class": "grantor", "text": "ALICE"}
        ]"#;

        let payload = parse_payload(response).unwrap();
        assert_eq!(payload.records.len(), 2);
        assert_eq!(payload.rejected.len(), 3);
        assert_eq!(payload.rejected[0].index, 1);
        assert_eq!(payload.rejected[1].index, 2);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_payload("This is not JSON");
        assert!(matches!(result, Err(ReconcileError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_scalar_payload() {
        let result = parse_payload("42");
        assert!(result.is_err());
    }

    #[test]
    fn test_extractions_must_be_array() {
        let result = parse_payload(r#"{"extractions": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_incomplete_span_is_ignored() {
        let payload =
            parse_payload(r#"[{"class": "ein", "text": "12-3456789", "span": {"start": 3}}]"#).unwrap();
        assert!(payload.records[0].span.is_none());
    }
}
