//! ArtVaani API Routes
//!
//! - /artvaani/listings - Product listing from photo + description
//! - /artvaani/insights - Cultural insights for a craft
//! - /artvaani/narratives - Cultural narrative from a voice recording
//! - /artvaani/stories - Transcription + story from a voice recording
//! - /artvaani/verifications - Artisan location/photo verification

pub mod flows;
pub mod swagger;

use axum::http::StatusCode;
use serde_json::{Map, Value};

use artvaani::{ErrorKind, FlowError};

/// Top-level fields of a request body; anything but an object is a 400
pub fn body_fields(body: Value) -> Result<Map<String, Value>, (StatusCode, String)> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err((
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// Map a flow failure onto an HTTP status and message
pub fn flow_error(err: FlowError) -> (StatusCode, String) {
    let status = match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Transport | ErrorKind::Schema => StatusCode::BAD_GATEWAY,
        ErrorKind::BusinessEmpty => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Template => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "Flow failed");
    } else {
        tracing::info!(error = %err, "Flow rejected request");
    }

    (status, err.to_string())
}
