//! `prompt-weaver-host`: runs the Prompt Weaver plugin inside a minimal host.
//!
//! # Quick start
//!
//! ```sh
//! # From a checkout with the app built into ./dist:
//! prompt-weaver-host
//!
//! # Installed elsewhere, mounted at the alternate prefix:
//! PROMPT_WEAVER_ROOT=/opt/prompt-weaver PROMPT_WEAVER_PREFIX=/prompt_weaver_app prompt-weaver-host
//! ```
//!
//! # Environment variables
//!
//! See [`prompt_weaver::HostConfig`] and [`prompt_weaver::PluginConfig`].

use prompt_weaver::{build_host, HostConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_weaver=info,tower_http=debug".into()),
        )
        .init();

    let config = HostConfig::from_env().unwrap_or_else(|e| panic!("{e}"));

    let (app, exports) = build_host(&config.plugin);
    for (id, name) in exports.node_display_name_mappings() {
        tracing::info!("node type {id} ({name})");
    }

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app).await.expect("server error");
}
