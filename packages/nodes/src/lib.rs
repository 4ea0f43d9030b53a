//! Relay node types exported by the Prompt Weaver plugin.
//!
//! The host builds graphs out of node types. Prompt Weaver contributes relay
//! nodes: each one takes text typed into (or sent from) the Prompt Weaver app
//! and hands it unchanged to the rest of the graph.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`schema`] | Input field declarations and the serialisable [`NodeDescriptor`] |
//! | [`node`] | The [`NodeType`] contract and the shipped [`RelayNode`]s |
//! | [`registry`] | [`NodeRegistry`]: identifier → class and identifier → display name |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use prompt_weaver_nodes::NodeRegistry;
//!
//! let registry = NodeRegistry::builtin()?;
//! let inputs = serde_json::json!({ "prompt_text": "a lighthouse at dusk" });
//! let out = registry.execute("PromptWeaverTextReceiver", inputs.as_object().unwrap())?;
//! assert_eq!(out, vec!["a lighthouse at dusk"]);
//! ```

pub mod error;
pub mod node;
pub mod registry;
pub mod schema;

pub use error::{NodeError, RegistryError};
pub use node::{NodeType, RelayField, RelayNode, PROMPT_WEAVER_RECEIVER, PROMPT_WEAVER_TEXT_RECEIVER};
pub use registry::{NodeClass, NodeRegistry};
pub use schema::{FieldGroup, FieldKind, InputField, InputTypes, NodeDescriptor};
