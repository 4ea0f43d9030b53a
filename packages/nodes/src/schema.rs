//! Input schema and descriptor types in the shape the host expects.
//!
//! The host asks each node type for a descriptor and renders its widgets from
//! it. Field order matters: the host lays widgets out in declaration order, so
//! fields are kept in a `Vec` and serialised as an ordered JSON object.
//!
//! ```json
//! {
//!   "input": {
//!     "required": { "prompt_text": ["STRING", { "multiline": true, "default": "" }] },
//!     "hidden": { "unique_id": "UNIQUE_ID" }
//!   },
//!   "output": ["STRING"],
//!   "output_name": ["prompt"],
//!   "category": "PromptWeaver",
//!   "function": "process",
//!   "display_name": "Prompt Weaver Text Receiver"
//! }
//! ```

use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};

/// Type tag the host uses for text values.
pub const STRING: &str = "STRING";

/// Type tag for the host-injected per-instance node identifier.
pub const UNIQUE_ID: &str = "UNIQUE_ID";

/// Semantic type of a single input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A text widget.
    String { multiline: bool, default: String },

    /// Filled in by the host with the node's instance id; never shown in the UI.
    UniqueId,
}

impl FieldKind {
    /// A multiline text field with an empty default.
    pub fn multiline_string() -> Self {
        FieldKind::String {
            multiline: true,
            default: String::new(),
        }
    }

    /// The host type tag for this field.
    pub fn type_tag(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => STRING,
            FieldKind::UniqueId => UNIQUE_ID,
        }
    }
}

#[derive(Serialize)]
struct StringOptions<'a> {
    multiline: bool,
    default: &'a str,
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Visible widgets are `[tag, options]`.
            FieldKind::String { multiline, default } => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(STRING)?;
                tuple.serialize_element(&StringOptions {
                    multiline: *multiline,
                    default,
                })?;
                tuple.end()
            }
            // Hidden inputs are the bare tag.
            FieldKind::UniqueId => serializer.serialize_str(UNIQUE_ID),
        }
    }
}

/// A named input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub name: String,
    pub kind: FieldKind,
}

impl InputField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An ordered group of fields, serialised as a JSON object keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldGroup(pub Vec<InputField>);

impl FieldGroup {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|f| f.name == name)
    }
}

impl Serialize for FieldGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in &self.0 {
            map.serialize_entry(&field.name, &field.kind)?;
        }
        map.end()
    }
}

/// The full input declaration of a node type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputTypes {
    /// Inputs the host must supply on every execution.
    pub required: FieldGroup,

    /// Inputs the host may omit.
    #[serde(skip_serializing_if = "FieldGroup::is_empty")]
    pub optional: FieldGroup,

    /// Inputs injected by the host and not shown to the user.
    #[serde(skip_serializing_if = "FieldGroup::is_empty")]
    pub hidden: FieldGroup,
}

/// Everything the host needs to know to place a node type in its UI and call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDescriptor {
    pub input: InputTypes,
    /// Output type tags, in output order.
    pub output: Vec<&'static str>,
    /// Output display names, parallel to `output`.
    pub output_name: Vec<&'static str>,
    pub category: &'static str,
    /// Name of the execution entry point.
    pub function: &'static str,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_field_serialises_as_tag_and_options() {
        let json = serde_json::to_value(FieldKind::multiline_string()).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["STRING", { "multiline": true, "default": "" }])
        );
    }

    #[test]
    fn unique_id_serialises_as_bare_tag() {
        let json = serde_json::to_string(&FieldKind::UniqueId).unwrap();
        assert_eq!(json, r#""UNIQUE_ID""#);
    }

    #[test]
    fn field_group_keeps_declaration_order() {
        let group = FieldGroup(vec![
            InputField::new("positive_text", FieldKind::multiline_string()),
            InputField::new("negative_text", FieldKind::multiline_string()),
        ]);
        let json = serde_json::to_string(&group).unwrap();
        let pos = json.find("positive_text").unwrap();
        let neg = json.find("negative_text").unwrap();
        assert!(pos < neg, "fields reordered: {json}");
    }

    #[test]
    fn empty_optional_group_is_omitted() {
        let types = InputTypes {
            required: FieldGroup(vec![InputField::new("a", FieldKind::multiline_string())]),
            optional: FieldGroup::default(),
            hidden: FieldGroup(vec![InputField::new("unique_id", FieldKind::UniqueId)]),
        };
        let json = serde_json::to_value(&types).unwrap();
        assert!(json.get("optional").is_none());
        assert_eq!(json["hidden"]["unique_id"], "UNIQUE_ID");
    }
}
