//! Output formatting for the CLI.
//!
//! Results and errors go to stdout as JSON by default so callers can parse
//! them; status lines go to stderr.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use trustdoc_citation::citation_keys;
use trustdoc_domain::text::truncate_chars;
use trustdoc_domain::{Citation, FieldValue, HighlightSpan, Presence};
use trustdoc_reconciler::{FieldKind, FieldShape, TemplateShape};
use trustdoc_store::{PersistedPaths, ProcessingResult};

const CELL_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a processing result.
    pub fn result(&self, result: &ProcessingResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (path, value) in result.extraction.leaves() {
                    builder.push_record([path, cell(&leaf_text(value))]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.citations(&result.citations)?
                ))
            }
        }
    }

    /// Format a citation list with the key each citation resolves under.
    pub fn citations(&self, citations: &[Citation]) -> Result<String> {
        let keys = citation_keys(citations);
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = keys
                    .iter()
                    .zip(citations)
                    .map(|(key, c)| json!({ "key": key, "citation": c }))
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Table => {
                if citations.is_empty() {
                    return Ok(self.colorize("No citations.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Key", "Start", "End", "Confidence", "Text"]);
                for (key, c) in keys.iter().zip(citations) {
                    let (start, end) = match c.location {
                        Some(loc) => (loc.start.to_string(), loc.end.to_string()),
                        None => ("-".to_string(), "-".to_string()),
                    };
                    builder.push_record([
                        key.clone(),
                        start,
                        end,
                        format!("{:.2}", c.confidence),
                        cell(&c.text),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format resolved highlight spans.
    pub fn spans(&self, spans: &[HighlightSpan]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(spans)?),
            OutputFormat::Table => {
                if spans.is_empty() {
                    return Ok(self.colorize("No spans resolved.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Key", "Start", "End", "Text"]);
                for span in spans {
                    builder.push_record([
                        span.key.clone(),
                        span.start.to_string(),
                        span.end.to_string(),
                        cell(&span.text),
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format a template shape and its class vocabulary.
    pub fn template(&self, shape: &TemplateShape, classes_only: bool) -> Result<String> {
        let classes = shape.extraction_classes();
        match (self.format, classes_only) {
            (OutputFormat::Json, true) => Ok(serde_json::to_string_pretty(&classes)?),
            (OutputFormat::Json, false) => Ok(serde_json::to_string_pretty(&json!({
                "template": shape,
                "extraction_classes": classes,
            }))?),
            (OutputFormat::Table, true) => Ok(classes.join("\n")),
            (OutputFormat::Table, false) => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Kind", "Classes"]);
                for section in &shape.sections {
                    for field in &section.fields {
                        push_field_rows(&mut builder, &section.name, field);
                    }
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Status line for persisted artifacts.
    pub fn persisted(&self, paths: &PersistedPaths) -> String {
        let mut msg = format!("Saved {}", paths.formatted_path.display());
        if let Some(raw) = &paths.raw_path {
            msg.push_str(&format!(" and {}", raw.display()));
        }
        self.success(&msg)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Structured error document printed on failure.
///
/// A result that was assembled but not persisted is included under `result`.
pub fn error_json(err: &CliError) -> String {
    let mut doc = json!({
        "error": err.to_string(),
        "type": err.kind(),
    });
    if let CliError::Process(process_err) = err {
        if let Some(result) = process_err.result() {
            doc["result"] = serde_json::to_value(result).unwrap_or_default();
        }
    }
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string())
}

fn push_field_rows(builder: &mut Builder, prefix: &str, field: &FieldShape) {
    let path = format!("{}.{}", prefix, field.name);
    let mut rules = field.effective_aliases();
    rules.extend(field.contains.iter().map(|c| format!("*{}*", c)));
    rules.extend(field.excludes.iter().map(|c| format!("!{}", c)));
    builder.push_record([
        path.clone(),
        format!("{:?}", field.kind).to_lowercase(),
        if field.fields.is_empty() && field.kind == FieldKind::Object {
            String::new()
        } else {
            rules.join(", ")
        },
    ]);
    for sub in &field.fields {
        push_field_rows(builder, &path, sub);
    }
}

fn leaf_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s.clone(),
        FieldValue::List(items) if items.is_empty() => "[]".to_string(),
        FieldValue::List(items) => items.join("; "),
        FieldValue::Presence(p) => {
            let flag = match p.present {
                Presence::Yes => "yes",
                Presence::Unknown => "unknown",
            };
            format!("{}: {}", flag, p.description)
        }
        FieldValue::Object(map) if map.is_empty() => "{}".to_string(),
        FieldValue::Object(_) => "{...}".to_string(),
    }
}

fn cell(text: &str) -> String {
    truncate_chars(&text.replace('\n', " "), CELL_CHARS, "…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use trustdoc_domain::Location;
    use trustdoc_processor::ProcessError;
    use trustdoc_store::{assemble, ResultMetadata, StoreError};

    fn citations() -> Vec<Citation> {
        vec![
            Citation {
                text: "JERRY SIMONS".to_string(),
                class: "trustee".to_string(),
                location: Some(Location::new(0, 12)),
                confidence: 1.0,
            },
            Citation {
                text: "Trustee".to_string(),
                class: "trustee".to_string(),
                location: None,
                confidence: 0.9,
            },
        ]
    }

    #[test]
    fn test_citations_json_has_keys() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.citations(&citations()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["key"], "trustee#0");
        assert_eq!(parsed[1]["key"], "trustee#1");
        assert!(parsed[1]["citation"].get("location").is_none());
    }

    #[test]
    fn test_citations_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.citations(&citations()).unwrap();
        assert!(output.contains("trustee#1"));
        assert!(output.contains("0.90"));
    }

    #[test]
    fn test_template_classes_only() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.template(&TemplateShape::trust_default(), true).unwrap();
        let classes: Vec<String> = serde_json::from_str(&output).unwrap();
        assert!(classes.contains(&"trust_name".to_string()));
        assert!(classes.contains(&"gst_tax_planning".to_string()));
    }

    #[test]
    fn test_template_table_lists_nested_fields() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.template(&TemplateShape::trust_default(), false).unwrap();
        assert!(output.contains("Basic_Information.Trustees.Successor"));
        assert!(output.contains("*successor_trustee*"));
    }

    #[test]
    fn test_error_json_shape() {
        let err = CliError::from(ProcessError::EmptyDocument);
        let parsed: serde_json::Value = serde_json::from_str(&error_json(&err)).unwrap();
        assert_eq!(parsed["error"], "No document text provided");
        assert_eq!(parsed["type"], "input");
        assert!(parsed.get("result").is_none());
    }

    #[test]
    fn test_error_json_carries_unsaved_result() {
        let result = assemble(
            Default::default(),
            citations(),
            ResultMetadata::new("trust.txt", Duration::ZERO),
        );
        let err = CliError::from(ProcessError::Persist {
            error: StoreError::Config("disk full".to_string()),
            result: Box::new(result),
        });
        let parsed: serde_json::Value = serde_json::from_str(&error_json(&err)).unwrap();
        assert_eq!(parsed["type"], "persistence");
        assert_eq!(parsed["result"]["citations"].as_array().unwrap().len(), 2);
    }
}
