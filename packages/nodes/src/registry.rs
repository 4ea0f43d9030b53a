//! The node registry: identifier → node class and identifier → display name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{NodeError, RegistryError};
use crate::node::{NodeType, PROMPT_WEAVER_RECEIVER, PROMPT_WEAVER_TEXT_RECEIVER};
use crate::schema::NodeDescriptor;

/// A shareable handle to a node type.
pub type NodeClass = Arc<dyn NodeType>;

struct Entry {
    class: NodeClass,
    display_name: String,
}

/// Registered node types, keyed by a stable identifier.
///
/// Built once at plugin load and read-only afterwards.
#[derive(Default)]
pub struct NodeRegistry {
    entries: BTreeMap<String, Entry>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node types shipped with the plugin.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(
            "PromptWeaverReceiver",
            "Prompt Weaver Receiver",
            Arc::new(PROMPT_WEAVER_RECEIVER),
        )?;
        registry.register(
            "PromptWeaverTextReceiver",
            "Prompt Weaver Text Receiver",
            Arc::new(PROMPT_WEAVER_TEXT_RECEIVER),
        )?;
        Ok(registry)
    }

    /// Add a node type. Identifiers must be non-empty and unique.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
        class: NodeClass,
    ) -> Result<(), RegistryError> {
        let id = id.into();
        let display_name = display_name.into();
        if id.trim().is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }
        if display_name.trim().is_empty() {
            return Err(RegistryError::EmptyDisplayName(id));
        }
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateIdentifier(id));
        }
        tracing::debug!(node_type = %id, "registered node type");
        self.entries.insert(id, Entry { class, display_name });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&NodeClass> {
        self.entries.get(id).map(|e| &e.class)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|e| e.display_name.as_str())
    }

    /// Identifier → node class, as exported to the host.
    pub fn class_mappings(&self) -> BTreeMap<String, NodeClass> {
        self.entries
            .iter()
            .map(|(id, e)| (id.clone(), Arc::clone(&e.class)))
            .collect()
    }

    /// Identifier → display name, with exactly the keys of [`Self::class_mappings`].
    pub fn display_name_mappings(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(id, e)| (id.clone(), e.display_name.clone()))
            .collect()
    }

    pub fn descriptor(&self, id: &str) -> Option<NodeDescriptor> {
        self.entries.get(id).map(|e| NodeDescriptor {
            input: e.class.input_types(),
            output: e.class.return_types(),
            output_name: e.class.return_names(),
            category: e.class.category(),
            function: e.class.function(),
            display_name: e.display_name.clone(),
        })
    }

    /// Descriptors for every registered node type.
    pub fn descriptors(&self) -> BTreeMap<String, NodeDescriptor> {
        self.entries
            .keys()
            .filter_map(|id| self.descriptor(id).map(|d| (id.clone(), d)))
            .collect()
    }

    /// Execute node type `id` with the host's keyword arguments.
    pub fn execute(
        &self,
        id: &str,
        inputs: &Map<String, Value>,
    ) -> Result<Vec<String>, NodeError> {
        let class = self
            .get(id)
            .ok_or_else(|| NodeError::UnknownNodeType(id.to_string()))?;
        class.execute(inputs)
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(id, e)| (id, &e.display_name)))
            .finish()
    }
}
