//! The host's route table as seen by the plugin.
//!
//! The plugin never owns the server. It receives a [`RouteTable`] from the
//! host, checks it for conflicts and appends [`Route`]s to it. Routes are plain
//! data so the same mount logic can drive the real axum router
//! ([`crate::router::AxumRouteTable`]) or a [`RecordingRouteTable`] that only
//! remembers what was asked of it.

use std::path::PathBuf;

use thiserror::Error;

/// What a route does when it is hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// Fixed JSON acknowledgment.
    Probe,

    /// `301` to the request path with a trailing slash, query preserved.
    RedirectToSlash,

    /// Serve this file.
    EntryDocument(PathBuf),

    /// Serve any file under `root`, addressed by the request path below the
    /// route's path.
    Assets { root: PathBuf },
}

/// A `GET` route the plugin wants on the host server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub kind: RouteKind,
}

impl Route {
    pub fn new(path: impl Into<String>, kind: RouteKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Whether this route also matches everything below its path.
    pub fn is_recursive(&self) -> bool {
        matches!(self.kind, RouteKind::Assets { .. })
    }
}

/// Errors from appending to a route table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {0:?} is already registered")]
    Conflict(String),

    #[error("route path must start with '/' and hold no pattern syntax, got {0:?}")]
    InvalidPath(String),
}

/// An append-only view of the host's routes.
pub trait RouteTable {
    /// Whether adding `route` would collide with a route already present.
    fn contains(&self, route: &Route) -> bool;

    /// Append `route`. Never replaces an existing route.
    fn add(&mut self, route: Route) -> Result<(), RouteError>;
}

/// Checks shared by every [`RouteTable`] implementation.
///
/// Plugin paths are literal: no segment may read as a router capture or
/// wildcard, in either the `{name}` or the older `:name`/`*name` form.
pub(crate) fn check_path(path: &str) -> Result<(), RouteError> {
    let literal = !path.contains(['{', '}', '?', '#'])
        && path.split('/').all(|segment| !segment.starts_with([':', '*']));
    if path.starts_with('/') && literal {
        Ok(())
    } else {
        Err(RouteError::InvalidPath(path.to_string()))
    }
}

/// A route table that records routes without serving them.
///
/// Used by the CLI to show what a mount would register, and by tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingRouteTable {
    routes: Vec<Route>,
}

impl RecordingRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.path.as_str()).collect()
    }

    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }
}

impl RouteTable for RecordingRouteTable {
    fn contains(&self, route: &Route) -> bool {
        self.routes
            .iter()
            .any(|r| r.path == route.path && r.is_recursive() == route.is_recursive())
    }

    fn add(&mut self, route: Route) -> Result<(), RouteError> {
        check_path(&route.path)?;
        if self.contains(&route) {
            return Err(RouteError::Conflict(route.path));
        }
        self.routes.push(route);
        Ok(())
    }
}
