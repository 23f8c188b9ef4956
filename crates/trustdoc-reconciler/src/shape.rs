//! Template shape: which fields exist and which classes feed them
//!
//! The shape is the single declarative table the reconciler consults. It is
//! loaded from TOML or JSON, validated up front, and never inferred from the
//! records themselves.

use crate::error::ReconcileError;
use crate::matcher::ClassMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// How a field is assembled from matching records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Text of the first matching record
    Singleton,
    /// Texts of all matching records
    List,
    /// Concatenated, cited prose built from all matching records
    Narrative,
    /// "yes"/"unknown" flag plus description
    Presence,
    /// Nested sub-fields
    Object,
}

/// One field of a section or nested object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldShape {
    /// Output key
    pub name: String,

    /// Assembly rule
    pub kind: FieldKind,

    /// Classes accepted verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Class fragments accepted by substring match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<String>,

    /// Class fragments that veto a match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,

    /// Sub-fields, only for `object`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldShape>,
}

/// A top-level template section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionShape {
    /// Section key in the output
    pub name: String,

    /// Fields in declaration order
    pub fields: Vec<FieldShape>,
}

/// Full template definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateShape {
    /// Sections in declaration order
    pub sections: Vec<SectionShape>,
}

/// Class name a prompt would use for a template field name
///
/// `Grantor(s)` becomes `grantor`, `No-Contest Clause` becomes
/// `no_contest_clause`.
pub fn derive_class_name(field_name: &str) -> String {
    field_name
        .replace("(s)", "")
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' | '/' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl FieldShape {
    fn leaf(name: &str, kind: FieldKind, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind,
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            contains: Vec::new(),
            excludes: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Singleton field fed by the given classes
    pub fn singleton(name: &str, aliases: &[&str]) -> Self {
        Self::leaf(name, FieldKind::Singleton, aliases)
    }

    /// List field fed by the given classes
    pub fn list(name: &str, aliases: &[&str]) -> Self {
        Self::leaf(name, FieldKind::List, aliases)
    }

    /// Narrative field fed by the given classes
    pub fn narrative(name: &str, aliases: &[&str]) -> Self {
        Self::leaf(name, FieldKind::Narrative, aliases)
    }

    /// Presence field fed by the given classes
    pub fn presence(name: &str, aliases: &[&str]) -> Self {
        Self::leaf(name, FieldKind::Presence, aliases)
    }

    /// Object with nested fields
    pub fn object(name: &str, fields: Vec<FieldShape>) -> Self {
        Self {
            fields,
            ..Self::leaf(name, FieldKind::Object, &[])
        }
    }

    /// Add substring fragments
    pub fn with_contains(mut self, fragments: &[&str]) -> Self {
        self.contains.extend(fragments.iter().map(|s| s.to_string()));
        self
    }

    /// Add veto fragments
    pub fn with_excludes(mut self, fragments: &[&str]) -> Self {
        self.excludes.extend(fragments.iter().map(|s| s.to_string()));
        self
    }

    /// Aliases in effect: the declared ones, or the derived class name when
    /// the field declares no rule at all
    pub fn effective_aliases(&self) -> Vec<String> {
        if self.aliases.is_empty() && self.contains.is_empty() {
            vec![derive_class_name(&self.name)]
        } else {
            self.aliases.clone()
        }
    }

    /// Compiled match rule
    pub fn matcher(&self) -> ClassMatcher {
        ClassMatcher::new(
            self.effective_aliases(),
            self.contains.clone(),
            self.excludes.clone(),
        )
    }

    fn validate(&self, path: &str) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err(format!("{}: field name is empty", path));
        }
        let path = format!("{}.{}", path, self.name);
        let rules = self.aliases.iter().chain(&self.contains).chain(&self.excludes);
        if rules.clone().any(|r| r.trim().is_empty()) {
            return Err(format!("{}: match rules must not contain blank entries", path));
        }

        match self.kind {
            FieldKind::Object => {
                if rules.count() > 0 {
                    return Err(format!("{}: object fields take no match rules", path));
                }
                validate_fields(&self.fields, &path)
            }
            _ => {
                if !self.fields.is_empty() {
                    return Err(format!("{}: only object fields may have sub-fields", path));
                }
                Ok(())
            }
        }
    }

    fn collect_classes(&self, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        if self.kind == FieldKind::Object {
            for field in &self.fields {
                field.collect_classes(seen, out);
            }
            return;
        }
        for alias in self.effective_aliases() {
            if seen.insert(alias.clone()) {
                out.push(alias);
            }
        }
    }
}

fn validate_fields(fields: &[FieldShape], path: &str) -> Result<(), String> {
    let mut names = HashSet::new();
    for field in fields {
        field.validate(path)?;
        if !names.insert(field.name.as_str()) {
            return Err(format!("{}: duplicate field '{}'", path, field.name));
        }
    }
    Ok(())
}

impl TemplateShape {
    /// Parse a shape from TOML and validate it
    pub fn from_toml(toml_str: &str) -> Result<Self, ReconcileError> {
        let shape: Self = toml::from_str(toml_str)
            .map_err(|e| ReconcileError::TemplateParse(e.to_string()))?;
        shape.validate()?;
        Ok(shape)
    }

    /// Parse a shape from JSON and validate it
    pub fn from_json(json_str: &str) -> Result<Self, ReconcileError> {
        let shape: Self = serde_json::from_str(json_str)
            .map_err(|e| ReconcileError::TemplateParse(e.to_string()))?;
        shape.validate()?;
        Ok(shape)
    }

    /// Load a shape from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReconcileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_toml(&contents),
        }
    }

    /// Serialize the shape to TOML
    pub fn to_toml(&self) -> Result<String, ReconcileError> {
        toml::to_string_pretty(self)
            .map_err(|e| ReconcileError::TemplateParse(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Check the structure of the shape
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.sections.is_empty() {
            return Err(ReconcileError::InvalidTemplate("template has no sections".to_string()));
        }
        let mut names = HashSet::new();
        for section in &self.sections {
            if section.name.trim().is_empty() {
                return Err(ReconcileError::InvalidTemplate("section name is empty".to_string()));
            }
            if !names.insert(section.name.as_str()) {
                return Err(ReconcileError::InvalidTemplate(format!(
                    "duplicate section '{}'",
                    section.name
                )));
            }
            if section.fields.is_empty() {
                return Err(ReconcileError::InvalidTemplate(format!(
                    "section '{}' has no fields",
                    section.name
                )));
            }
            validate_fields(&section.fields, &section.name).map_err(ReconcileError::InvalidTemplate)?;
        }
        Ok(())
    }

    /// Every class the template can consume, in declaration order
    ///
    /// This is the vocabulary an extraction prompt should ask the model for.
    /// Substring fragments are not included.
    pub fn extraction_classes(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for section in &self.sections {
            for field in &section.fields {
                field.collect_classes(&mut seen, &mut out);
            }
        }
        out
    }

    /// Built-in trust document template
    pub fn trust_default() -> Self {
        Self {
            sections: vec![
                SectionShape {
                    name: "Basic_Information".to_string(),
                    fields: vec![
                        FieldShape::singleton("Trust_Name", &["trust_name"]),
                        FieldShape::singleton("Trust_Type", &["trust_type"]),
                        FieldShape::singleton("Effective_Date", &["effective_date", "trust_date"]),
                        FieldShape::list("Grantors", &["grantor", "settlor", "trustor"]),
                        FieldShape::object(
                            "Trustees",
                            vec![
                                FieldShape::list("Initial", &["initial_trustee", "trustee", "co_trustee"]),
                                FieldShape::list("Successor", &[]).with_contains(&["successor_trustee"]),
                            ],
                        ),
                        FieldShape::list("Primary_Beneficiaries", &["primary_beneficiary", "beneficiary"]),
                        FieldShape::list("Contingent_Beneficiaries", &["contingent_beneficiary"]),
                    ],
                },
                SectionShape {
                    name: "Summary".to_string(),
                    fields: vec![
                        FieldShape::narrative("Purpose_and_Intent", &["trust_purpose", "purpose", "intent"]),
                        FieldShape::narrative("How_the_Trust_Works", &["trust_operation", "how_the_trust_works"]),
                        FieldShape::narrative(
                            "Distribution_Provisions",
                            &[
                                "distribution_income",
                                "distribution_principal",
                                "distribution_timing",
                                "distribution_provisions",
                            ],
                        ),
                        FieldShape::narrative("Trustee_Powers_and_Duties", &["trustee_powers", "trustee_duties"]),
                        FieldShape::narrative(
                            "Amendment_and_Termination",
                            &["amendment", "termination", "amendment_and_termination"],
                        ),
                        FieldShape::narrative("Special_Provisions", &["special_provisions"]),
                    ],
                },
                SectionShape {
                    name: "Details".to_string(),
                    fields: vec![
                        FieldShape::singleton("Trust_Tax_ID", &["tax_id", "ein"]),
                        FieldShape::singleton("State_of_Formation", &["state_of_formation", "governing_law"]),
                        FieldShape::singleton("Trust_Situs", &["trust_situs"]),
                        FieldShape::object(
                            "Trust_Protector",
                            vec![
                                FieldShape::singleton("Name", &["trust_protector"]),
                                FieldShape::narrative("Powers", &["trust_protector_powers"]),
                            ],
                        ),
                        FieldShape::singleton("Investment_Advisor", &["investment_advisor"]),
                        FieldShape::singleton("Distribution_Advisor", &["distribution_advisor"]),
                        FieldShape::singleton("Law_Firm", &["law_firm"]),
                        FieldShape::presence("GST_Tax_Planning", &["gst_tax_planning"]),
                        FieldShape::presence("Marital_Deduction", &["marital_deduction"]),
                        FieldShape::presence("Spendthrift_Provision", &["spendthrift_provision", "spendthrift"]),
                        FieldShape::presence("No_Contest_Clause", &["no_contest_clause"]),
                        FieldShape::object("Other_Provisions", vec![]),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trust_default_is_valid() {
        assert!(TemplateShape::trust_default().validate().is_ok());
    }

    #[test]
    fn test_derive_class_name() {
        assert_eq!(derive_class_name("Grantor(s)"), "grantor");
        assert_eq!(derive_class_name("No-Contest Clause"), "no_contest_clause");
        assert_eq!(derive_class_name("Trust Tax ID/EIN"), "trust_tax_id_ein");
        assert_eq!(derive_class_name("Trust_Name"), "trust_name");
    }

    #[test]
    fn test_field_without_rules_uses_derived_alias() {
        let field = FieldShape::singleton("Law Firm", &[]);
        assert_eq!(field.effective_aliases(), vec!["law_firm".to_string()]);
        assert!(field.matcher().matches("law_firm"));
    }

    #[test]
    fn test_contains_only_field_has_no_derived_alias() {
        let field = FieldShape::list("Successor", &[]).with_contains(&["successor_trustee"]);
        assert!(field.effective_aliases().is_empty());
        assert!(!field.matcher().matches("successor"));
    }

    #[test]
    fn test_extraction_classes_are_unique_and_ordered() {
        let classes = TemplateShape::trust_default().extraction_classes();
        assert_eq!(classes[0], "trust_name");
        assert!(classes.contains(&"trust_protector_powers".to_string()));
        let unique: HashSet<_> = classes.iter().collect();
        assert_eq!(unique.len(), classes.len());
    }

    #[test]
    fn test_parse_toml_with_nested_object() {
        let shape = TemplateShape::from_toml(
            r#"
            [[sections]]
            name = "Basic_Information"

            [[sections.fields]]
            name = "Trust_Name"
            kind = "singleton"
            aliases = ["trust_name"]

            [[sections.fields]]
            name = "Trustees"
            kind = "object"

            [[sections.fields.fields]]
            name = "Initial"
            kind = "list"
            aliases = ["trustee"]
            "#,
        )
        .unwrap();
        let fields = &shape.sections[0].fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].kind, FieldKind::Object);
        assert_eq!(fields[1].fields[0].name, "Initial");
    }

    #[test]
    fn test_parse_json() {
        let shape = TemplateShape::from_json(
            r#"{"sections": [{"name": "Summary", "fields": [
                {"name": "Purpose", "kind": "narrative", "aliases": ["purpose"]}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(shape.sections[0].fields[0].kind, FieldKind::Narrative);
    }

    #[test]
    fn test_unparseable_template_is_fatal() {
        let result = TemplateShape::from_json("{not json");
        assert!(matches!(result, Err(ReconcileError::TemplateParse(_))));
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let result = TemplateShape::from_json(
            r#"{"sections": [{"name": "A", "fields": [{"name": "X", "kind": "tuple"}]}]}"#,
        );
        assert!(matches!(result, Err(ReconcileError::TemplateParse(_))));
    }

    #[test]
    fn test_unknown_key_is_fatal() {
        let result = TemplateShape::from_json(
            r#"{"sections": [{"name": "A", "fields": [{"name": "X", "kind": "list", "alias": ["x"]}]}]}"#,
        );
        assert!(matches!(result, Err(ReconcileError::TemplateParse(_))));
    }

    #[test]
    fn test_empty_template_is_invalid() {
        let result = TemplateShape::from_json(r#"{"sections": []}"#);
        assert!(matches!(result, Err(ReconcileError::InvalidTemplate(_))));
    }

    #[test]
    fn test_duplicate_field_is_invalid() {
        let shape = TemplateShape {
            sections: vec![SectionShape {
                name: "A".to_string(),
                fields: vec![
                    FieldShape::singleton("X", &["x"]),
                    FieldShape::list("X", &["y"]),
                ],
            }],
        };
        assert!(matches!(shape.validate(), Err(ReconcileError::InvalidTemplate(_))));
    }

    #[test]
    fn test_leaf_with_sub_fields_is_invalid() {
        let mut field = FieldShape::singleton("X", &["x"]);
        field.fields.push(FieldShape::singleton("Y", &["y"]));
        let shape = TemplateShape {
            sections: vec![SectionShape {
                name: "A".to_string(),
                fields: vec![field],
            }],
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_blank_alias_is_invalid() {
        let shape = TemplateShape {
            sections: vec![SectionShape {
                name: "A".to_string(),
                fields: vec![FieldShape::singleton("X", &[" "])],
            }],
        };
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let shape = TemplateShape::trust_default();
        let toml_str = shape.to_toml().unwrap();
        let parsed = TemplateShape::from_toml(&toml_str).unwrap();
        assert_eq!(shape, parsed);
    }

    #[test]
    fn test_shipped_template_matches_builtin() {
        let shipped = include_str!("../../../config/trust_template.toml");
        let parsed = TemplateShape::from_toml(shipped).unwrap();
        assert_eq!(parsed, TemplateShape::trust_default());
    }
}
