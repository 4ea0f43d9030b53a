//! Realises plugin [`Route`]s on an axum [`Router`].

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use axum::{
    routing::{get, get_service, MethodRouter},
    Router,
};
use tower_http::services::ServeFile;

use crate::{
    handlers::{
        assets::{serve_asset, AssetState},
        probe::probe,
        redirect::redirect_to_slash,
    },
    routes::{check_path, Route, RouteError, RouteKind, RouteTable},
};

/// An axum [`Router`] wrapped so that paths are only ever appended.
///
/// axum panics when two routes claim the same path or when a path does not
/// parse. Paths added through this table are tracked, and every insertion is
/// first tried on a copy of the router, so a claim the router refuses (one
/// already made on a router passed to [`AxumRouteTable::from_router`]
/// included) becomes [`RouteError::Conflict`] and leaves the table as it was.
#[derive(Default)]
pub struct AxumRouteTable {
    router: Router,
    paths: BTreeSet<String>,
}

impl AxumRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_router(router: Router) -> Self {
        Self {
            router,
            paths: BTreeSet::new(),
        }
    }

    /// Add a host-owned route at an exact axum path.
    ///
    /// Unlike plugin routes, host paths may use axum captures such as `{id}`.
    pub fn route(&mut self, path: &str, method_router: MethodRouter) -> Result<(), RouteError> {
        if !path.starts_with('/') {
            return Err(RouteError::InvalidPath(path.to_string()));
        }
        if self.paths.contains(path) || !self.append(path.to_string(), method_router) {
            return Err(RouteError::Conflict(path.to_string()));
        }
        Ok(())
    }

    /// Paths added through this table, in axum syntax.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Returns `false`, leaving the table untouched, when the router refuses
    /// the path.
    fn append(&mut self, path: String, method_router: MethodRouter) -> bool {
        match try_route(&self.router, &path, method_router) {
            Some(router) => {
                self.router = router;
                self.paths.insert(path);
                true
            }
            None => false,
        }
    }
}

/// `router` with `path` added, or `None` if axum rejects the path.
fn try_route(router: &Router, path: &str, method_router: MethodRouter) -> Option<Router> {
    let router = router.clone();
    panic::catch_unwind(AssertUnwindSafe(move || router.route(path, method_router))).ok()
}

impl RouteTable for AxumRouteTable {
    fn contains(&self, route: &Route) -> bool {
        let path = axum_path(route);
        if self.paths.contains(&path) {
            return true;
        }
        // Routes the host added before handing the router over are only
        // visible by trying the insertion.
        check_path(&route.path).is_ok()
            && try_route(&self.router, &path, get(|| async {})).is_none()
    }

    fn add(&mut self, route: Route) -> Result<(), RouteError> {
        check_path(&route.path)?;
        let path = axum_path(&route);
        if self.paths.contains(&path) || !self.append(path, method_router(&route)) {
            return Err(RouteError::Conflict(route.path));
        }
        Ok(())
    }
}

/// The axum path pattern a route occupies.
fn axum_path(route: &Route) -> String {
    if route.is_recursive() {
        // Wildcards don't match the empty segment, so `P/` stays with the
        // explicit entry-document route.
        format!("{}/{{*path}}", route.path.trim_end_matches('/'))
    } else {
        route.path.clone()
    }
}

fn method_router(route: &Route) -> MethodRouter {
    match &route.kind {
        RouteKind::Probe => get(probe),
        RouteKind::RedirectToSlash => get(redirect_to_slash),
        RouteKind::EntryDocument(path) => get_service(ServeFile::new(path)),
        RouteKind::Assets { root } => get(serve_asset).with_state(AssetState::new(
            route.path.trim_end_matches('/'),
            root,
        )),
    }
}
