//! The plugin's load entry point and the values it exports to the host.

use std::collections::BTreeMap;

use prompt_weaver_nodes::{NodeClass, NodeRegistry, RegistryError};

use crate::{
    config::PluginConfig,
    mount::{self, MountReport},
    routes::RouteTable,
};

/// Directory, relative to the plugin root, the host loads client scripts from.
pub const WEB_DIRECTORY: &str = "./web/comfyui";

/// Everything the plugin hands back to the host after loading.
#[derive(Debug)]
pub struct PluginExports {
    pub nodes: NodeRegistry,
    pub web_directory: &'static str,
    pub mount: MountReport,
}

impl PluginExports {
    /// Node type identifier → node class.
    pub fn node_class_mappings(&self) -> BTreeMap<String, NodeClass> {
        self.nodes.class_mappings()
    }

    /// Node type identifier → display name.
    pub fn node_display_name_mappings(&self) -> BTreeMap<String, String> {
        self.nodes.display_name_mappings()
    }
}

/// Load the plugin: register routes on the host's table, then build the node
/// registry.
///
/// Never fails. A missing app build leaves the nodes working; a broken node
/// registry leaves the app working.
pub fn load(table: &mut dyn RouteTable, config: &PluginConfig) -> PluginExports {
    let report = mount::register(table, config);
    finish_load(report, NodeRegistry::builtin())
}

/// Combine a mount report with a registry build result.
pub fn finish_load(
    mount: MountReport,
    nodes: Result<NodeRegistry, RegistryError>,
) -> PluginExports {
    let nodes = match nodes {
        Ok(registry) => {
            tracing::info!(count = registry.len(), "nodes loaded");
            registry
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load nodes; exporting none");
            NodeRegistry::new()
        }
    };

    tracing::info!(
        mounted = mount.outcome.is_mounted(),
        routes = mount.registered.len(),
        "initialization complete"
    );

    PluginExports {
        nodes,
        web_directory: WEB_DIRECTORY,
        mount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mount::MountOutcome;
    use crate::routes::RecordingRouteTable;

    #[test]
    fn nodes_load_even_without_an_app_build() {
        let tmp = tempfile::tempdir().unwrap();
        let mut table = RecordingRouteTable::new();
        let exports = load(&mut table, &PluginConfig::with_root(tmp.path()));

        assert!(matches!(exports.mount.outcome, MountOutcome::Skipped(_)));
        assert_eq!(exports.node_class_mappings().len(), 2);
        assert_eq!(exports.web_directory, "./web/comfyui");
        assert_eq!(table.paths(), vec!["/prompt_weaver_test"]);
    }

    #[test]
    fn registry_failure_degrades_to_empty_mappings() {
        let mut table = RecordingRouteTable::new();
        let tmp = tempfile::tempdir().unwrap();
        let report = mount::register(&mut table, &PluginConfig::with_root(tmp.path()));

        let exports = finish_load(report, Err(RegistryError::EmptyIdentifier));

        assert!(exports.node_class_mappings().is_empty());
        assert!(exports.node_display_name_mappings().is_empty());
        assert!(exports.mount.probe.is_ok());
    }

    #[test]
    fn mapping_key_sets_match() {
        let mut table = RecordingRouteTable::new();
        let tmp = tempfile::tempdir().unwrap();
        let exports = load(&mut table, &PluginConfig::with_root(tmp.path()));

        let classes: Vec<_> = exports.node_class_mappings().into_keys().collect();
        let names: Vec<_> = exports.node_display_name_mappings().into_keys().collect();
        assert_eq!(classes, names);
    }
}
