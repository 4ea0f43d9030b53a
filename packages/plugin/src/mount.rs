//! Mounting the built Prompt Weaver app on the host server.
//!
//! The app is a client-side-routed single-page app whose asset references are
//! relative. That dictates the route set:
//!
//! | Route | Behaviour |
//! |-------|-----------|
//! | `GET <probe>` | fixed JSON acknowledgment, registered even without assets |
//! | `GET P` | `301` to `P/`, query preserved, so relative URLs resolve under `P/` |
//! | `GET P/` | entry document |
//! | `GET P/index.html` | entry document |
//! | `GET P/<path>` | file under the asset directory, `404` when absent |
//!
//! Everything except the probe is all-or-nothing: if the asset directory or its
//! entry document is missing, or any route would collide with one the host
//! already has, none of them are added.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::PluginConfig;
use crate::paths;
use crate::routes::{check_path, Route, RouteError, RouteKind, RouteTable};

/// Why the app was not mounted.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no {marker:?} found above any of {searched:?}")]
    PluginRootNotFound {
        searched: Vec<PathBuf>,
        marker: String,
    },

    #[error("plugin root must be an absolute path, got {0:?}")]
    RelativeRoot(PathBuf),

    #[error("mount prefix must start with '/' and name a path segment, got {0:?}")]
    InvalidPrefix(String),

    #[error("asset directory {0:?} not found; has the app been built?")]
    BaseDirMissing(PathBuf),

    #[error("asset path {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("asset directory exists but has no entry document at {path:?}")]
    EntryDocumentMissing {
        path: PathBuf,
        /// Names found in the asset directory, when it could be listed.
        listing: Option<Vec<String>>,
    },

    #[error("failed to inspect {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// A validated mount: the asset directory, its entry document and the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountDescriptor {
    pub base_dir: PathBuf,
    pub entry_document: PathBuf,
    pub prefix: String,
}

impl MountDescriptor {
    /// Resolve and validate the mount described by `config`.
    pub fn resolve(config: &PluginConfig, anchors: &[PathBuf]) -> Result<Self, MountError> {
        let prefix = normalize_prefix(&config.mount_prefix)?;
        let root = paths::resolve_plugin_root(config, anchors)?;
        let base_dir = root.join(&config.dist_dir);

        tracing::debug!(root = %root.display(), base_dir = %base_dir.display(), "resolved asset paths");

        let entry_document = validate_base_dir(&base_dir, &config.entry_document)?;
        Ok(Self {
            base_dir,
            entry_document,
            prefix,
        })
    }

    /// The routes this mount adds, in registration order.
    ///
    /// The explicit entry-document routes come before the recursive asset
    /// route, which only adds to them.
    pub fn routes(&self) -> Vec<Route> {
        let entry_name = self
            .entry_document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index.html".into());
        let mut routes = vec![
            Route::new(self.prefix.clone(), RouteKind::RedirectToSlash),
            Route::new(
                format!("{}/", self.prefix),
                RouteKind::EntryDocument(self.entry_document.clone()),
            ),
            Route::new(
                format!("{}/{}", self.prefix, entry_name),
                RouteKind::EntryDocument(self.entry_document.clone()),
            ),
        ];
        // A custom entry document still answers to index.html.
        if entry_name != "index.html" {
            routes.push(Route::new(
                format!("{}/index.html", self.prefix),
                RouteKind::EntryDocument(self.entry_document.clone()),
            ));
        }
        routes.push(Route::new(
            self.prefix.clone(),
            RouteKind::Assets {
                root: self.base_dir.clone(),
            },
        ));
        routes
    }
}

/// Result of the best-effort mount.
#[derive(Debug)]
pub enum MountOutcome {
    Mounted(MountDescriptor),
    Skipped(MountError),
}

impl MountOutcome {
    pub fn is_mounted(&self) -> bool {
        matches!(self, MountOutcome::Mounted(_))
    }
}

/// What [`register`] did to the route table.
#[derive(Debug)]
pub struct MountReport {
    /// `Err` when the probe route could not be added.
    pub probe: Result<(), RouteError>,
    pub outcome: MountOutcome,
    /// Paths appended to the route table, in order.
    pub registered: Vec<String>,
}

/// Register the probe and, when the app is built, the app routes.
///
/// Never fails: every problem ends up in the returned report and the log.
pub fn register(table: &mut dyn RouteTable, config: &PluginConfig) -> MountReport {
    register_with_anchors(table, config, &paths::install_anchors())
}

/// [`register`] with explicit install anchors for plugin-root search.
pub fn register_with_anchors(
    table: &mut dyn RouteTable,
    config: &PluginConfig,
    anchors: &[PathBuf],
) -> MountReport {
    let mut registered = Vec::new();

    let probe = table.add(Route::new(config.probe_path.clone(), RouteKind::Probe));
    match &probe {
        Ok(()) => registered.push(config.probe_path.clone()),
        Err(e) => tracing::error!(path = %config.probe_path, error = %e, "probe route not registered"),
    }

    let outcome = match mount(table, config, anchors, &mut registered) {
        Ok(descriptor) => {
            tracing::info!(
                prefix = %descriptor.prefix,
                base_dir = %descriptor.base_dir.display(),
                "app mounted; entry document and assets served under the prefix"
            );
            MountOutcome::Mounted(descriptor)
        }
        Err(e) => {
            report_failure(&e);
            MountOutcome::Skipped(e)
        }
    };

    MountReport {
        probe,
        outcome,
        registered,
    }
}

fn mount(
    table: &mut dyn RouteTable,
    config: &PluginConfig,
    anchors: &[PathBuf],
    registered: &mut Vec<String>,
) -> Result<MountDescriptor, MountError> {
    let descriptor = MountDescriptor::resolve(config, anchors)?;
    let routes = descriptor.routes();

    // Check everything first so a conflict leaves nothing half-mounted.
    for route in &routes {
        check_path(&route.path)?;
    }
    if let Some(taken) = routes.iter().find(|r| table.contains(r)) {
        return Err(RouteError::Conflict(taken.path.clone()).into());
    }
    for route in routes {
        let path = route.path.clone();
        table.add(route)?;
        registered.push(path);
    }
    Ok(descriptor)
}

fn report_failure(error: &MountError) {
    match error {
        MountError::BaseDirMissing(path) => {
            tracing::error!(expected = %path.display(), "app assets not found, skipping mount; build the app first");
        }
        MountError::EntryDocumentMissing { path, listing } => {
            tracing::error!(
                expected = %path.display(),
                contents = ?listing,
                "asset directory has no entry document, skipping mount"
            );
        }
        other => tracing::error!(error = %other, "app mount skipped"),
    }
}

/// Normalise a mount prefix to `/segment[/segment...]` with no trailing slash.
pub fn normalize_prefix(raw: &str) -> Result<String, MountError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('/') {
        return Err(MountError::InvalidPrefix(raw.to_string()));
    }
    let prefix = trimmed.trim_end_matches('/');
    if prefix.is_empty()
        || prefix.contains("//")
        || prefix.contains(['{', '}', '*', '?', '#'])
        || check_path(prefix).is_err()
    {
        return Err(MountError::InvalidPrefix(raw.to_string()));
    }
    Ok(prefix.to_string())
}

/// Check that `base_dir` is a directory holding `entry_name`, returning the
/// entry document's path.
pub fn validate_base_dir(base_dir: &Path, entry_name: &str) -> Result<PathBuf, MountError> {
    match fs::metadata(base_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(MountError::NotADirectory(base_dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(MountError::BaseDirMissing(base_dir.to_path_buf()))
        }
        Err(source) => {
            return Err(MountError::Io {
                path: base_dir.to_path_buf(),
                source,
            })
        }
    }

    let entry = base_dir.join(entry_name);
    if entry.is_file() {
        Ok(entry)
    } else {
        Err(MountError::EntryDocumentMissing {
            path: entry,
            listing: list_dir(base_dir),
        })
    }
}

fn list_dir(dir: &Path) -> Option<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RecordingRouteTable;

    fn plugin_root(with_dist: bool, with_index: bool) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("plugin.json"), "{}").unwrap();
        if with_dist {
            fs::create_dir_all(tmp.path().join("dist/assets")).unwrap();
            fs::write(tmp.path().join("dist/assets/app.js"), "console.log(1)").unwrap();
        }
        if with_index {
            fs::write(tmp.path().join("dist/index.html"), "<!doctype html>").unwrap();
        }
        tmp
    }

    #[test]
    fn prefix_normalisation() {
        assert_eq!(normalize_prefix("/prompt_weaver").unwrap(), "/prompt_weaver");
        assert_eq!(normalize_prefix("/prompt_weaver/").unwrap(), "/prompt_weaver");
        assert_eq!(normalize_prefix(" /apps/weaver// ").unwrap(), "/apps/weaver");
        let bad_prefixes = [
            "", "/", "///", "prompt_weaver", "/a//b", "/{x}", "/a?b", "/:weaver", "/apps/:weaver",
            "/*all",
        ];
        for bad in bad_prefixes {
            assert!(
                matches!(normalize_prefix(bad), Err(MountError::InvalidPrefix(_))),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn valid_mount_registers_everything_in_order() {
        let tmp = plugin_root(true, true);
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &PluginConfig::with_root(tmp.path()), &[]);

        assert!(report.probe.is_ok());
        assert!(report.outcome.is_mounted());
        assert_eq!(
            table.paths(),
            vec![
                "/prompt_weaver_test",
                "/prompt_weaver",
                "/prompt_weaver/",
                "/prompt_weaver/index.html",
                "/prompt_weaver",
            ]
        );
        assert_eq!(report.registered.len(), 5);
        assert_eq!(
            table.routes().last().unwrap().kind,
            RouteKind::Assets {
                root: tmp.path().join("dist")
            }
        );
    }

    #[test]
    fn missing_dist_registers_only_the_probe() {
        let tmp = plugin_root(false, false);
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &PluginConfig::with_root(tmp.path()), &[]);

        assert!(report.probe.is_ok());
        assert!(matches!(
            report.outcome,
            MountOutcome::Skipped(MountError::BaseDirMissing(ref p)) if *p == tmp.path().join("dist")
        ));
        assert_eq!(table.paths(), vec!["/prompt_weaver_test"]);
    }

    #[test]
    fn dist_without_index_registers_only_the_probe() {
        let tmp = plugin_root(true, false);
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &PluginConfig::with_root(tmp.path()), &[]);

        match report.outcome {
            MountOutcome::Skipped(MountError::EntryDocumentMissing { path, listing }) => {
                assert_eq!(path, tmp.path().join("dist/index.html"));
                assert_eq!(listing, Some(vec!["assets".to_string()]));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(table.paths(), vec!["/prompt_weaver_test"]);
    }

    #[test]
    fn dist_as_file_is_not_a_directory() {
        let tmp = plugin_root(false, false);
        fs::write(tmp.path().join("dist"), "not a dir").unwrap();
        let err = validate_base_dir(&tmp.path().join("dist"), "index.html").unwrap_err();
        assert!(matches!(err, MountError::NotADirectory(_)));
    }

    #[test]
    fn entry_document_must_be_a_file() {
        let tmp = plugin_root(true, false);
        fs::create_dir_all(tmp.path().join("dist/index.html")).unwrap();
        let err = validate_base_dir(&tmp.path().join("dist"), "index.html").unwrap_err();
        assert!(matches!(err, MountError::EntryDocumentMissing { .. }));
    }

    #[test]
    fn conflict_leaves_no_partial_mount() {
        let tmp = plugin_root(true, true);
        let mut table = RecordingRouteTable::new();
        // The host already serves something at P/index.html.
        table
            .add(Route::new(
                "/prompt_weaver/index.html",
                RouteKind::EntryDocument("/host/index.html".into()),
            ))
            .unwrap();

        let report = register_with_anchors(&mut table, &PluginConfig::with_root(tmp.path()), &[]);

        assert!(matches!(
            report.outcome,
            MountOutcome::Skipped(MountError::Route(RouteError::Conflict(ref p))) if p == "/prompt_weaver/index.html"
        ));
        assert_eq!(
            table.paths(),
            vec!["/prompt_weaver/index.html", "/prompt_weaver_test"]
        );
        assert_eq!(report.registered, vec!["/prompt_weaver_test"]);
    }

    #[test]
    fn probe_conflict_does_not_block_the_mount() {
        let tmp = plugin_root(true, true);
        let mut table = RecordingRouteTable::new();
        table.add(Route::new("/prompt_weaver_test", RouteKind::Probe)).unwrap();

        let report = register_with_anchors(&mut table, &PluginConfig::with_root(tmp.path()), &[]);

        assert_eq!(
            report.probe,
            Err(RouteError::Conflict("/prompt_weaver_test".into()))
        );
        assert!(report.outcome.is_mounted());
    }

    #[test]
    fn invalid_prefix_skips_mount_but_keeps_probe() {
        let tmp = plugin_root(true, true);
        let config = PluginConfig {
            mount_prefix: "/".into(),
            ..PluginConfig::with_root(tmp.path())
        };
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &config, &[]);

        assert!(matches!(report.outcome, MountOutcome::Skipped(MountError::InvalidPrefix(_))));
        assert_eq!(table.paths(), vec!["/prompt_weaver_test"]);
    }

    #[test]
    fn capture_syntax_in_reachability_path_is_refused_but_app_mounts() {
        let tmp = plugin_root(true, true);
        let config = PluginConfig {
            probe_path: "/:check".into(),
            ..PluginConfig::with_root(tmp.path())
        };
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &config, &[]);

        assert_eq!(report.probe, Err(RouteError::InvalidPath("/:check".into())));
        assert!(report.outcome.is_mounted());
        assert_eq!(table.find("/:check"), None);
    }

    #[test]
    fn alternate_prefix_and_root_search() {
        let tmp = plugin_root(true, true);
        let nested = tmp.path().join("target/debug");
        fs::create_dir_all(&nested).unwrap();
        let config = PluginConfig {
            mount_prefix: "/prompt_weaver_app/".into(),
            ..PluginConfig::default()
        };
        let mut table = RecordingRouteTable::new();
        let report = register_with_anchors(&mut table, &config, &[nested]);

        match report.outcome {
            MountOutcome::Mounted(descriptor) => {
                assert_eq!(descriptor.prefix, "/prompt_weaver_app");
                assert_eq!(descriptor.base_dir, tmp.path().join("dist"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(table.find("/prompt_weaver_app/").is_some());
    }

    #[test]
    fn custom_entry_document_still_answers_to_index_html() {
        let descriptor = MountDescriptor {
            base_dir: "/srv/app".into(),
            entry_document: "/srv/app/app.html".into(),
            prefix: "/weaver".into(),
        };
        let paths: Vec<_> = descriptor.routes().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/weaver", "/weaver/", "/weaver/app.html", "/weaver/index.html", "/weaver"]
        );
    }
}
