//! The node type contract and the relay nodes shipped with the plugin.

use serde_json::{Map, Value};

use crate::error::NodeError;
use crate::schema::{FieldGroup, FieldKind, InputField, InputTypes, STRING};

/// Category the host groups Prompt Weaver nodes under.
pub const CATEGORY: &str = "PromptWeaver";

/// Name of the execution entry point the host invokes.
pub const FUNCTION: &str = "process";

/// Name of the hidden host-injected instance id input.
pub const UNIQUE_ID_INPUT: &str = "unique_id";

/// A node type the host can place in a graph and execute.
///
/// Implementations must be pure: the outputs of [`NodeType::execute`] depend on
/// `inputs` alone, so the host may call the same node type from several graph
/// runs at once.
pub trait NodeType: Send + Sync {
    /// Declared inputs.
    fn input_types(&self) -> InputTypes;

    /// Output type tags, in output order.
    fn return_types(&self) -> Vec<&'static str>;

    /// Output display names, parallel to [`NodeType::return_types`].
    fn return_names(&self) -> Vec<&'static str>;

    fn category(&self) -> &'static str {
        CATEGORY
    }

    fn function(&self) -> &'static str {
        FUNCTION
    }

    /// Run the node with keyword arguments keyed by input name.
    ///
    /// Returns one value per declared output, in declared order.
    fn execute(&self, inputs: &Map<String, Value>) -> Result<Vec<String>, NodeError>;
}

/// One relayed value: the input it is read from and the output it is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayField {
    pub input: &'static str,
    pub output: &'static str,
}

/// A node that passes each of its text inputs through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayNode {
    fields: &'static [RelayField],
}

impl RelayNode {
    pub const fn new(fields: &'static [RelayField]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [RelayField] {
        self.fields
    }
}

impl NodeType for RelayNode {
    fn input_types(&self) -> InputTypes {
        InputTypes {
            required: FieldGroup(
                self.fields
                    .iter()
                    .map(|f| InputField::new(f.input, FieldKind::multiline_string()))
                    .collect(),
            ),
            optional: FieldGroup::default(),
            hidden: FieldGroup(vec![InputField::new(UNIQUE_ID_INPUT, FieldKind::UniqueId)]),
        }
    }

    fn return_types(&self) -> Vec<&'static str> {
        self.fields.iter().map(|_| STRING).collect()
    }

    fn return_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.output).collect()
    }

    fn execute(&self, inputs: &Map<String, Value>) -> Result<Vec<String>, NodeError> {
        // `unique_id` and any extra keys are ignored.
        self.fields
            .iter()
            .map(|f| match inputs.get(f.input) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(NodeError::InvalidInputType {
                    name: f.input.to_string(),
                    found: json_type_name(other),
                }),
                None => Err(NodeError::MissingInput(f.input.to_string())),
            })
            .collect()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Relays a positive and a negative prompt from the Prompt Weaver app into a graph.
pub const PROMPT_WEAVER_RECEIVER: RelayNode = RelayNode::new(&[
    RelayField {
        input: "positive_text",
        output: "positive",
    },
    RelayField {
        input: "negative_text",
        output: "negative",
    },
]);

/// Relays a single prompt.
pub const PROMPT_WEAVER_TEXT_RECEIVER: RelayNode = RelayNode::new(&[RelayField {
    input: "prompt_text",
    output: "prompt",
}]);
