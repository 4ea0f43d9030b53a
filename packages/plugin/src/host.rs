//! A minimal host used to run the plugin outside the real authoring host.
//!
//! It owns the router, adds a couple of routes of its own, loads the plugin
//! onto it and wraps the result in request tracing. The demo binary and the
//! conformance suite both build their server here.

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::{
    config::PluginConfig,
    plugin::{self, PluginExports},
    router::AxumRouteTable,
};

/// Build the host router with the plugin loaded onto it.
pub fn build_host(config: &PluginConfig) -> (Router, PluginExports) {
    let mut table = AxumRouteTable::new();
    host_route(&mut table, "/", get(|| async { "Prompt Weaver demo host" }));

    let exports = plugin::load(&mut table, config);

    // Descriptors of every loaded node type, as the host's UI would fetch them.
    let descriptors = exports.nodes.descriptors();
    host_route(
        &mut table,
        "/object_info",
        get(move || {
            let descriptors = descriptors.clone();
            async move { Json(descriptors) }
        }),
    );

    let router = table.into_router().layer(TraceLayer::new_for_http());
    (router, exports)
}

fn host_route(table: &mut AxumRouteTable, path: &str, method_router: axum::routing::MethodRouter) {
    if let Err(e) = table.route(path, method_router) {
        tracing::warn!(path, error = %e, "host route not added");
    }
}
