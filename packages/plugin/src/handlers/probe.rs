//! Reachability probe: `GET /prompt_weaver_test`.

use axum::Json;
use serde::{Deserialize, Serialize};

pub const PROBE_STATUS: &str = "ok";
pub const PROBE_MESSAGE: &str = "Prompt Weaver is reachable";

/// The fixed probe body.
///
/// ```json
/// { "status": "ok", "message": "Prompt Weaver is reachable" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: String,
    pub message: String,
}

impl Default for ProbeResponse {
    fn default() -> Self {
        Self {
            status: PROBE_STATUS.into(),
            message: PROBE_MESSAGE.into(),
        }
    }
}

/// Answers whether or not the app itself is mounted.
pub async fn probe() -> Json<ProbeResponse> {
    tracing::debug!("probe route hit");
    Json(ProbeResponse::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_body_is_fixed() {
        let json = serde_json::to_value(ProbeResponse::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "ok", "message": "Prompt Weaver is reachable" })
        );
    }
}
