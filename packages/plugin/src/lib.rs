//! Public surface for the `prompt-weaver` host plugin.
//!
//! The plugin contributes relay nodes to the host's graph engine and serves
//! the built Prompt Weaver app through the host's web server. It never owns
//! the server: the host hands over a [`RouteTable`] and the plugin appends to
//! it.
//!
//! ```rust,ignore
//! use prompt_weaver::{load, AxumRouteTable, PluginConfig};
//!
//! let mut table = AxumRouteTable::from_router(host_router);
//! let exports = load(&mut table, &PluginConfig::from_env());
//! let router = table.into_router();
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod host;
pub mod mount;
pub mod paths;
pub mod plugin;
pub mod router;
pub mod routes;

pub use config::{ConfigError, HostConfig, PluginConfig};
pub use host::build_host;
pub use mount::{MountDescriptor, MountError, MountOutcome, MountReport};
pub use plugin::{load, PluginExports, WEB_DIRECTORY};
pub use router::AxumRouteTable;
pub use routes::{RecordingRouteTable, Route, RouteError, RouteKind, RouteTable};
