//! Static assets: `GET P/<path>`.
//!
//! Requests are re-rooted below the prefix and handed to `tower-http`'s
//! [`ServeDir`], which resolves them inside the asset directory, refuses
//! traversal out of it, follows symlinks and guesses content types.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header, HeaderValue, Uri},
    response::{IntoResponse, Response},
};
use tower_http::services::ServeDir;

use super::redirect::slash_target;
use crate::error::AppError;

/// Per-route state for the asset handler.
#[derive(Clone)]
pub struct AssetState {
    prefix: Arc<str>,
    dir: ServeDir,
}

impl AssetState {
    pub fn new(prefix: &str, root: impl AsRef<std::path::Path>) -> Self {
        Self {
            prefix: Arc::from(prefix),
            dir: ServeDir::new(root),
        }
    }
}

/// `GET P/{*path}`
pub async fn serve_asset(
    State(state): State<AssetState>,
    OriginalUri(original): OriginalUri,
    req: Request,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    parts.uri = strip_prefix(&parts.uri, &state.prefix)?;

    let mut dir = state.dir.clone();
    let mut response = dir.try_call(Request::from_parts(parts, body)).await?;

    // ServeDir redirects directories to a trailing slash, but it only saw the
    // path below the prefix, and the host may have nested us further down.
    if response.status().is_redirection() && response.headers().contains_key(header::LOCATION) {
        let location = HeaderValue::try_from(slash_target(&original))
            .map_err(|e| AppError::Internal(format!("invalid redirect target: {e}")))?;
        response.headers_mut().insert(header::LOCATION, location);
    }
    Ok(response.into_response())
}

/// `uri` with `prefix` removed from the front of its path.
fn strip_prefix(uri: &Uri, prefix: &str) -> Result<Uri, AppError> {
    let tail = uri
        .path()
        .strip_prefix(prefix)
        .filter(|tail| tail.starts_with('/'))
        .ok_or_else(|| AppError::NotFound("not found".into()))?;
    let path_and_query = match uri.query() {
        Some(query) => format!("{tail}?{query}"),
        None => tail.to_string(),
    };
    Uri::builder()
        .path_and_query(path_and_query)
        .build()
        .map_err(|e| AppError::BadRequest(format!("invalid asset path: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_keeps_query() {
        let uri: Uri = "/prompt_weaver/assets/app.js?v=3".parse().unwrap();
        let stripped = strip_prefix(&uri, "/prompt_weaver").unwrap();
        assert_eq!(stripped, "/assets/app.js?v=3");
    }

    #[test]
    fn keeps_percent_encoding_for_serve_dir() {
        let uri: Uri = "/prompt_weaver/images/my%20cat.png".parse().unwrap();
        let stripped = strip_prefix(&uri, "/prompt_weaver").unwrap();
        assert_eq!(stripped.path(), "/images/my%20cat.png");
    }

    async fn call(state: &AssetState, uri: &str) -> Response {
        let req = Request::get(uri).body(axum::body::Body::empty()).unwrap();
        let original = OriginalUri(req.uri().clone());
        serve_asset(State(state.clone()), original, req)
            .await
            .into_response()
    }

    #[tokio::test]
    async fn directory_redirect_stays_under_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
        let state = AssetState::new("/prompt_weaver", tmp.path());

        let res = call(&state, "/prompt_weaver/assets").await;
        assert!(res.status().is_redirection());
        assert_eq!(res.headers()[header::LOCATION], "/prompt_weaver/assets/");

        // No index.html inside, and no listing either.
        let res = call(&state, "/prompt_weaver/assets/").await;
        assert_eq!(res.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn directory_redirect_keeps_outer_nesting_and_query() {
        use axum::{routing::get, Router};
        use tower::ServiceExt;

        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("assets")).unwrap();
        let state = AssetState::new("/prompt_weaver", tmp.path());
        let inner = Router::new().route("/prompt_weaver/{*path}", get(serve_asset).with_state(state));
        let app = Router::new().nest("/outer", inner);

        let res = app
            .oneshot(
                Request::get("/outer/prompt_weaver/assets?v=2")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(res.status().is_redirection());
        assert_eq!(res.headers()[header::LOCATION], "/outer/prompt_weaver/assets/?v=2");
    }

    #[test]
    fn sibling_path_with_shared_prefix_is_not_ours() {
        let uri: Uri = "/prompt_weaver_other/app.js".parse().unwrap();
        assert!(matches!(
            strip_prefix(&uri, "/prompt_weaver"),
            Err(AppError::NotFound(_))
        ));
    }
}
