//! Bare-prefix redirect: `GET P` → `301 P/`.
//!
//! The app's asset URLs are relative, so the browser must be sitting at a path
//! ending in `/` for them to resolve under the prefix.

use axum::{
    extract::OriginalUri,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// `GET P`
pub async fn redirect_to_slash(OriginalUri(uri): OriginalUri) -> Response {
    let target = slash_target(&uri);
    tracing::debug!(from = %uri, to = %target, "redirecting to trailing slash");
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response()
}

/// The request path with `/` appended, query string carried over verbatim.
pub fn slash_target(uri: &Uri) -> String {
    match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_slash() {
        let uri: Uri = "/prompt_weaver".parse().unwrap();
        assert_eq!(slash_target(&uri), "/prompt_weaver/");
    }

    #[test]
    fn keeps_query_unchanged() {
        let uri: Uri = "/prompt_weaver?tab=templates&lang=de%20DE".parse().unwrap();
        assert_eq!(slash_target(&uri), "/prompt_weaver/?tab=templates&lang=de%20DE");
    }

    #[test]
    fn empty_query_is_kept() {
        let uri: Uri = "/prompt_weaver?".parse().unwrap();
        assert_eq!(slash_target(&uri), "/prompt_weaver/?");
    }
}
