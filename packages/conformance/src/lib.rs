//! Shared helpers for the Prompt Weaver conformance test suite.
//!
//! Provides [`spawn_host`]: binds a `TcpListener` on an ephemeral port, builds
//! the demo host with the plugin loaded from a throwaway plugin root, and
//! returns the base URL together with the root so tests can inspect or extend
//! the asset tree.

use std::fs;
use std::path::Path;

use prompt_weaver::{build_host, PluginConfig, PluginExports};

/// Entry document written by [`write_built_app`].
pub const INDEX_HTML: &str =
    "<!doctype html><html><body><div id=\"root\"></div><script type=\"module\" src=\"./assets/index.js\"></script></body></html>";

/// Script asset written by [`write_built_app`].
pub const INDEX_JS: &str = "import('./chunk.js');\n";

/// A running in-process host.
pub struct SpawnedHost {
    pub base_url: String,
    pub root: tempfile::TempDir,
    pub exports: PluginExports,
}

/// Lay out a plugin root containing a built app at `root/dist`.
pub fn write_built_app(root: &Path) {
    let dist = root.join("dist");
    fs::create_dir_all(dist.join("assets")).expect("create dist");
    fs::write(root.join("plugin.json"), "{\"name\":\"prompt-weaver\"}").expect("write marker");
    fs::write(dist.join("index.html"), INDEX_HTML).expect("write index");
    fs::write(dist.join("assets/index.js"), INDEX_JS).expect("write asset");
}

/// Start an ephemeral host. `prepare` lays out the plugin root before the
/// plugin is loaded.
///
/// # Panics
///
/// Panics if the temporary directory or the TCP listener cannot be created.
pub async fn spawn_host(prepare: impl FnOnce(&Path), config: PluginConfig) -> SpawnedHost {
    let root = tempfile::tempdir().expect("create plugin root");
    prepare(root.path());

    let config = PluginConfig {
        plugin_root: Some(root.path().to_path_buf()),
        ..config
    };
    let (router, exports) = build_host(&config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance host error");
    });

    SpawnedHost {
        base_url: format!("http://{addr}"),
        root,
        exports,
    }
}

/// An HTTP client that reports redirects instead of following them.
pub fn make_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build client")
}
