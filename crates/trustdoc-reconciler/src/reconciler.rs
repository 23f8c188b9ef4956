//! Core Reconciler implementation

use crate::config::ReconcilerConfig;
use crate::error::ReconcileError;
use crate::matcher::ClassMatcher;
use crate::shape::{FieldKind, FieldShape, TemplateShape};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};
use trustdoc_domain::text::truncate_chars;
use trustdoc_domain::{
    ExtractionRecord, FieldValue, FillPolicy, Presence, PresenceField, Template,
};

/// Reconcile records against a template with the default fragment length
///
/// Convenience wrapper over [`Reconciler`]. Fails only when the template or
/// fill policy is invalid.
pub fn reconcile(
    records: &[ExtractionRecord],
    template: &TemplateShape,
    fill: &FillPolicy,
) -> Result<Template, ReconcileError> {
    let config = ReconcilerConfig {
        fill: fill.clone(),
        ..ReconcilerConfig::default()
    };
    let reconciler = Reconciler::new(template.clone(), config)?;
    Ok(reconciler.reconcile(records))
}

/// What happened to the input while building a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records accepted after validation and de-duplication
    pub records_used: usize,

    /// Records dropped for missing class or text
    pub records_skipped: usize,

    /// Records dropped as (class, text) duplicates, ignoring surrounding whitespace
    pub duplicates_removed: usize,

    /// Leaves that received a fill value
    pub fields_defaulted: usize,

    /// Classes no field consumed, in first-seen order
    pub unmatched_classes: Vec<String>,
}

/// A template together with its build report
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The populated template
    pub template: Template,

    /// Build statistics
    pub report: ReconcileReport,
}

/// Maps extraction records onto a template shape
///
/// The shape and config are validated once in [`Reconciler::new`]; after
/// that, reconciliation cannot fail.
#[derive(Debug, Clone)]
pub struct Reconciler {
    shape: TemplateShape,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler, rejecting invalid templates and configs
    pub fn new(shape: TemplateShape, config: ReconcilerConfig) -> Result<Self, ReconcileError> {
        shape.validate()?;
        config.validate().map_err(ReconcileError::Config)?;
        Ok(Self { shape, config })
    }

    /// Reconciler for the built-in trust template
    pub fn trust_default() -> Self {
        Self {
            shape: TemplateShape::trust_default(),
            config: ReconcilerConfig::default(),
        }
    }

    /// The template shape in use
    pub fn shape(&self) -> &TemplateShape {
        &self.shape
    }

    /// The configuration in use
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Build a template from records
    pub fn reconcile(&self, records: &[ExtractionRecord]) -> Template {
        self.reconcile_with_report(records).template
    }

    /// Build a template from records and report what was used
    pub fn reconcile_with_report(&self, records: &[ExtractionRecord]) -> Reconciliation {
        let mut report = ReconcileReport::default();
        let usable = prepare_records(records, &mut report);

        let mut consumed = vec![false; usable.len()];
        let mut template = Template::new();

        for section in &self.shape.sections {
            let fields = self.build_fields(&section.fields, &usable, &mut consumed, &mut report);
            template.insert_section(section.name.clone(), fields);
        }

        let mut seen = HashSet::new();
        for (record, used) in usable.iter().zip(&consumed) {
            if !used && seen.insert(record.class.as_str()) {
                report.unmatched_classes.push(record.class.clone());
            }
        }
        if !report.unmatched_classes.is_empty() {
            debug!("Classes not consumed by template: {:?}", report.unmatched_classes);
        }

        info!(
            "Reconciled {} records: {} skipped, {} duplicates, {} fields defaulted",
            report.records_used,
            report.records_skipped,
            report.duplicates_removed,
            report.fields_defaulted
        );

        Reconciliation { template, report }
    }

    fn build_fields(
        &self,
        fields: &[FieldShape],
        records: &[&ExtractionRecord],
        consumed: &mut [bool],
        report: &mut ReconcileReport,
    ) -> BTreeMap<String, FieldValue> {
        let mut out = BTreeMap::new();
        for field in fields {
            if let Some(value) = self.build_field(field, records, consumed, report) {
                out.insert(field.name.clone(), value);
            }
        }
        out
    }

    /// Build one field; `None` only when filling is disabled and nothing matched
    fn build_field(
        &self,
        field: &FieldShape,
        records: &[&ExtractionRecord],
        consumed: &mut [bool],
        report: &mut ReconcileReport,
    ) -> Option<FieldValue> {
        let fill = &self.config.fill;
        let matcher = field.matcher();

        let value = match field.kind {
            FieldKind::Object if field.fields.is_empty() => {
                report.fields_defaulted += 1;
                return Some(FieldValue::Object(fill.object_default.clone()));
            }
            FieldKind::Object => {
                let nested = self.build_fields(&field.fields, records, consumed, report);
                return Some(FieldValue::Object(nested));
            }
            FieldKind::Singleton => matching(&matcher, records, consumed)
                .first()
                .map(|r| FieldValue::Text(r.text.trim().to_string())),
            FieldKind::List => {
                let matches = matching(&matcher, records, consumed);
                if matches.is_empty() {
                    report.fields_defaulted += 1;
                    return Some(FieldValue::List(fill.list_default.clone()));
                }
                Some(FieldValue::List(
                    matches.iter().map(|r| r.text.trim().to_string()).collect(),
                ))
            }
            FieldKind::Narrative => {
                let matches = matching(&matcher, records, consumed);
                if matches.is_empty() {
                    None
                } else {
                    Some(FieldValue::Text(self.narrative(&matches)))
                }
            }
            FieldKind::Presence => match matching(&matcher, records, consumed).first() {
                Some(first) => Some(FieldValue::Presence(PresenceField {
                    present: Presence::Yes,
                    description: first.text.trim().to_string(),
                })),
                None => {
                    if !fill.enabled {
                        return None;
                    }
                    report.fields_defaulted += 1;
                    return Some(FieldValue::Presence(PresenceField {
                        present: Presence::Unknown,
                        description: fill.scalar_default.clone(),
                    }));
                }
            },
        };

        match value {
            Some(value) => Some(value),
            None if fill.enabled => {
                report.fields_defaulted += 1;
                Some(FieldValue::Text(fill.scalar_default.clone()))
            }
            None => None,
        }
    }

    /// Join fragments, each truncated and followed by its `[class]` marker
    fn narrative(&self, matches: &[&ExtractionRecord]) -> String {
        matches
            .iter()
            .map(|r| {
                let text = truncate_chars(
                    r.text.trim(),
                    self.config.max_fragment_chars,
                    &self.config.ellipsis,
                );
                format!("{}[{}]", text, r.class)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Drop invalid records and (class, trimmed text) duplicates, keeping order
fn prepare_records<'a>(
    records: &'a [ExtractionRecord],
    report: &mut ReconcileReport,
) -> Vec<&'a ExtractionRecord> {
    let mut seen = HashSet::new();
    let mut usable = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        if let Err(e) = record.validate() {
            warn!("Skipping record {}: {}", idx, e);
            report.records_skipped += 1;
            continue;
        }
        if !seen.insert((record.class.as_str(), record.text.trim())) {
            debug!("Dropping duplicate record {} ({})", idx, record.class);
            report.duplicates_removed += 1;
            continue;
        }
        usable.push(record);
    }

    report.records_used = usable.len();
    usable
}

/// Records accepted by `matcher`, in input order, marking them consumed
fn matching<'a>(
    matcher: &ClassMatcher,
    records: &[&'a ExtractionRecord],
    consumed: &mut [bool],
) -> Vec<&'a ExtractionRecord> {
    let mut out = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        if matcher.matches(&record.class) {
            consumed[idx] = true;
            out.push(*record);
        }
    }
    out
}
