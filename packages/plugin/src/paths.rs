//! Locating the plugin root on disk.
//!
//! The process working directory belongs to the host, so nothing here looks at
//! it. The root is either configured explicitly or found by walking upward from
//! the plugin's install location until a marker file turns up. Walking for a
//! marker keeps resolution independent of how deeply the calling code sits
//! below the root.

use std::path::{Path, PathBuf};

use crate::config::PluginConfig;
use crate::mount::MountError;

/// Walk `start` and its ancestors, returning the first directory that
/// contains a file named `marker`.
pub fn find_plugin_root(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_file())
        .map(Path::to_path_buf)
}

/// Directories the plugin is installed under, most specific first.
///
/// The running executable's directory comes first; the crate's source
/// directory is the fallback for in-tree runs.
pub fn install_anchors() -> Vec<PathBuf> {
    let mut anchors = Vec::with_capacity(2);
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        anchors.push(dir);
    }
    anchors.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    anchors
}

/// Resolve the plugin root for `config`, searching from `anchors` when no
/// explicit root is configured.
pub fn resolve_plugin_root(
    config: &PluginConfig,
    anchors: &[PathBuf],
) -> Result<PathBuf, MountError> {
    if let Some(root) = &config.plugin_root {
        if !root.is_absolute() {
            return Err(MountError::RelativeRoot(root.clone()));
        }
        return Ok(root.clone());
    }

    anchors
        .iter()
        .find_map(|anchor| find_plugin_root(anchor, &config.root_marker))
        .ok_or_else(|| MountError::PluginRootNotFound {
            searched: anchors.to_vec(),
            marker: config.root_marker.clone(),
        })
}
