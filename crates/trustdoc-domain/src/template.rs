//! The populated output template
//!
//! A [`Template`] is a map of section name to fields. Every leaf is a
//! [`FieldValue`]; the reconciler guarantees that no declared leaf is missing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Presence flag
///
/// There is no `No`: a provision that was not extracted may still exist in
/// the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// At least one matching record was found
    Yes,
    /// Nothing matched
    Unknown,
}

/// A "presence + description" leaf, e.g. a spendthrift clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresenceField {
    /// Whether the provision was found
    #[serde(rename = "Present")]
    pub present: Presence,

    /// Text of the first matching record, or the fill value
    #[serde(rename = "Description")]
    pub description: String,
}

/// Value stored at a template leaf or nested object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Singleton or narrative text
    Text(String),
    /// List of extracted texts
    List(Vec<String>),
    /// Presence flag with description
    Presence(PresenceField),
    /// Nested sub-object
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Text content, if this is a text leaf
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// List content, if this is a list leaf
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Presence content, if this is a presence leaf
    pub fn as_presence(&self) -> Option<&PresenceField> {
        match self {
            FieldValue::Presence(p) => Some(p),
            _ => None,
        }
    }

    /// Nested fields, if this is an object
    pub fn as_object(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }
}

/// A fully reconciled template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    sections: BTreeMap<String, BTreeMap<String, FieldValue>>,
}

impl Template {
    /// Create an empty template
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a section
    pub fn insert_section(
        &mut self,
        name: impl Into<String>,
        fields: BTreeMap<String, FieldValue>,
    ) {
        self.sections.insert(name.into(), fields);
    }

    /// Get a section by name
    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, FieldValue>> {
        self.sections.get(name)
    }

    /// Iterate over sections in name order
    pub fn sections(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, FieldValue>)> {
        self.sections.iter()
    }

    /// Get a field by section and field name
    pub fn get(&self, section: &str, field: &str) -> Option<&FieldValue> {
        self.sections.get(section)?.get(field)
    }

    /// Walk a path of `section, field, sub-field, ...`
    pub fn get_path(&self, path: &[&str]) -> Option<&FieldValue> {
        let (section, rest) = path.split_first()?;
        let (field, nested) = rest.split_first()?;
        let mut value = self.get(section, field)?;
        for key in nested {
            value = value.as_object()?.get(*key)?;
        }
        Some(value)
    }

    /// All leaves as `(dotted path, value)` pairs, depth first
    ///
    /// Empty objects count as leaves.
    pub fn leaves(&self) -> Vec<(String, &FieldValue)> {
        let mut out = Vec::new();
        for (section, fields) in &self.sections {
            for (name, value) in fields {
                collect_leaves(format!("{}.{}", section, name), value, &mut out);
            }
        }
        out
    }
}

fn collect_leaves<'a>(path: String, value: &'a FieldValue, out: &mut Vec<(String, &'a FieldValue)>) {
    match value {
        FieldValue::Object(map) if !map.is_empty() => {
            for (name, nested) in map {
                collect_leaves(format!("{}.{}", path, name), nested, out);
            }
        }
        _ => out.push((path, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Template {
        let mut trustees = BTreeMap::new();
        trustees.insert("Initial".to_string(), FieldValue::List(vec!["JANE DOE".to_string()]));
        trustees.insert("Successor".to_string(), FieldValue::List(vec![]));

        let mut basic = BTreeMap::new();
        basic.insert("Trust_Name".to_string(), FieldValue::Text("DOE TRUST".to_string()));
        basic.insert("Trustees".to_string(), FieldValue::Object(trustees));

        let mut details = BTreeMap::new();
        details.insert(
            "Spendthrift_Provision".to_string(),
            FieldValue::Presence(PresenceField {
                present: Presence::Unknown,
                description: "Not specified".to_string(),
            }),
        );
        details.insert("Other_Provisions".to_string(), FieldValue::Object(BTreeMap::new()));

        let mut template = Template::new();
        template.insert_section("Basic_Information", basic);
        template.insert_section("Details", details);
        template
    }

    #[test]
    fn test_get_path_into_nested_object() {
        let template = sample();
        let initial = template
            .get_path(&["Basic_Information", "Trustees", "Initial"])
            .and_then(FieldValue::as_list)
            .unwrap();
        assert_eq!(initial, ["JANE DOE".to_string()]);
    }

    #[test]
    fn test_get_path_missing_returns_none() {
        let template = sample();
        assert!(template.get_path(&["Basic_Information", "Nope"]).is_none());
        assert!(template.get_path(&["Basic_Information"]).is_none());
    }

    #[test]
    fn test_leaves_include_empty_objects() {
        let template = sample();
        let paths: Vec<String> = template.leaves().into_iter().map(|(p, _)| p).collect();
        assert!(paths.contains(&"Details.Other_Provisions".to_string()));
        assert!(paths.contains(&"Basic_Information.Trustees.Successor".to_string()));
        assert_eq!(paths.len(), 5);
    }

    #[test]
    fn test_json_shape() {
        let template = sample();
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["Basic_Information"]["Trust_Name"], "DOE TRUST");
        assert_eq!(json["Details"]["Spendthrift_Provision"]["Present"], "unknown");
        assert_eq!(json["Details"]["Other_Provisions"], serde_json::json!({}));
    }

    #[test]
    fn test_sections_serialize_in_name_order() {
        let mut template = sample();
        template.insert_section("Summary", BTreeMap::new());
        template.insert_section("Annex", BTreeMap::new());
        let json = serde_json::to_string(&template).unwrap();

        let positions: Vec<usize> = ["Annex", "Basic_Information", "Details", "Summary"]
            .iter()
            .map(|name| json.find(&format!("\"{}\":", name)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn test_json_round_trip_keeps_variants() {
        let template = sample();
        let json = serde_json::to_string(&template).unwrap();
        let parsed: Template = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, template);
    }
}
