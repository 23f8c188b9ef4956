//! Placeholders for fields no record satisfied

use crate::template::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values substituted for unmatched fields
///
/// Lists never receive the scalar placeholder; they fall back to
/// `list_default`, which is empty unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// Fill unmatched scalar fields (when false they are left out)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Placeholder for singleton, narrative and description leaves
    #[serde(default = "default_scalar")]
    pub scalar_default: String,

    /// Value for unmatched list leaves
    #[serde(default)]
    pub list_default: Vec<String>,

    /// Value for objects that declare no sub-fields
    #[serde(default)]
    pub object_default: BTreeMap<String, FieldValue>,
}

fn default_enabled() -> bool {
    true
}

fn default_scalar() -> String {
    "Not specified".to_string()
}

impl Default for FillPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            scalar_default: default_scalar(),
            list_default: Vec::new(),
            object_default: BTreeMap::new(),
        }
    }
}

impl FillPolicy {
    /// Policy with a custom scalar placeholder
    pub fn with_scalar(scalar_default: impl Into<String>) -> Self {
        Self {
            scalar_default: scalar_default.into(),
            ..Self::default()
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.scalar_default.trim().is_empty() {
            return Err("scalar_default must not be blank when filling is enabled".to_string());
        }
        Ok(())
    }
}
