//! Plugin and demo-host configuration, populated from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_MOUNT_PREFIX: &str = "/prompt_weaver";
pub const DEFAULT_PROBE_PATH: &str = "/prompt_weaver_test";
pub const DEFAULT_ROOT_MARKER: &str = "plugin.json";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_ENTRY_DOCUMENT: &str = "index.html";
pub const DEFAULT_BIND: &str = "127.0.0.1:8188";

/// Where the plugin mounts the app and where it looks for the built assets.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PROMPT_WEAVER_PREFIX` | `/prompt_weaver` | URL prefix the app is served under |
/// | `PROMPT_WEAVER_PROBE_PATH` | `/prompt_weaver_test` | Reachability probe route |
/// | `PROMPT_WEAVER_ROOT` | (absent = search upward) | Absolute plugin root directory |
/// | `PROMPT_WEAVER_ROOT_MARKER` | `plugin.json` | File that marks the plugin root |
/// | `PROMPT_WEAVER_DIST` | `dist` | Built app directory, relative to the root |
/// | `PROMPT_WEAVER_ENTRY` | `index.html` | Entry document inside the built app |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    pub mount_prefix: String,
    pub probe_path: String,

    /// Explicit plugin root. `None` means search upward from the install
    /// location for [`PluginConfig::root_marker`].
    pub plugin_root: Option<PathBuf>,

    pub root_marker: String,
    pub dist_dir: String,
    pub entry_document: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            mount_prefix: DEFAULT_MOUNT_PREFIX.into(),
            probe_path: DEFAULT_PROBE_PATH.into(),
            plugin_root: None,
            root_marker: DEFAULT_ROOT_MARKER.into(),
            dist_dir: DEFAULT_DIST_DIR.into(),
            entry_document: DEFAULT_ENTRY_DOCUMENT.into(),
        }
    }
}

impl PluginConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            mount_prefix: lookup("PROMPT_WEAVER_PREFIX").unwrap_or(defaults.mount_prefix),
            probe_path: lookup("PROMPT_WEAVER_PROBE_PATH").unwrap_or(defaults.probe_path),
            plugin_root: lookup("PROMPT_WEAVER_ROOT").map(PathBuf::from),
            root_marker: lookup("PROMPT_WEAVER_ROOT_MARKER").unwrap_or(defaults.root_marker),
            dist_dir: lookup("PROMPT_WEAVER_DIST").unwrap_or(defaults.dist_dir),
            entry_document: lookup("PROMPT_WEAVER_ENTRY").unwrap_or(defaults.entry_document),
        }
    }

    /// Config for a plugin installed at a known root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            plugin_root: Some(root.into()),
            ..Self::default()
        }
    }
}

/// Errors from reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PROMPT_WEAVER_BIND must be a valid socket address (e.g. 127.0.0.1:8188), got {0:?}")]
    InvalidBindAddr(String),
}

/// Configuration for the demo host binary.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PROMPT_WEAVER_BIND` | `127.0.0.1:8188` | TCP socket address to listen on |
///
/// Plus everything in [`PluginConfig`].
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub bind_addr: SocketAddr,
    pub plugin: PluginConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw = lookup("PROMPT_WEAVER_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw.clone()))?;
        Ok(Self {
            bind_addr,
            plugin: PluginConfig::from_lookup(lookup),
        })
    }
}
