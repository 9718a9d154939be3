//! Data model for parsed annotation records — format-agnostic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One parsed annotation record, as supplied by an annotation call.
///
/// `name` is the only required field. Unknown fields are kept in `extra`
/// (in their original order) so user-supplied metadata survives into the
/// documentation database.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Record category: function, class, issue, etc. Filled in from the
    /// call's kind word when the annotation does not set it explicitly.
    #[serde(rename = "fieldType", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    pub name: String,

    /// Dotted path of the containing node; absent means the document root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,

    #[serde(rename = "baseClass", default, skip_serializing_if = "Option::is_none")]
    pub base_class: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Nested sub-records. These are stripped off before the record is
    /// stored and re-ingested as independent records parented under it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Record>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Record>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record {
    /// The dotted full path this record claims: `parent.name`, or just
    /// `name` at the root.
    pub fn full_path(&self) -> String {
        match self.parent.as_deref() {
            Some(parent) if !parent.is_empty() => format!("{parent}.{}", self.name),
            _ => self.name.clone(),
        }
    }
}

/// One entry of a function-like record's parameter list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,

    #[serde(rename = "defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}
