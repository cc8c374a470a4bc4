//! Flow Routes
//!
//! HTTP handlers that hand the raw request body to the matching flow.
//!
//! Bodies are taken as untyped JSON: field kinds are checked by the flow's
//! input validator, not by the extractor, so one 400 names every bad field.
//! The typed request models appear only in the OpenAPI document.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::Value;

use crate::models::{
    AudioRequest, InsightsRequest, InsightsResponse, ListingRequest, ListingResponse,
    NarrativeResponse, StoryResponse, VerificationRequest, VerificationResponse,
};
use crate::AppState;

use super::{body_fields, flow_error};

/// Generate a product listing
#[utoipa::path(
    post,
    path = "/artvaani/listings",
    request_body = ListingRequest,
    responses(
        (status = 200, description = "Listing generated", body = ListingResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Model unavailable or returned malformed output")
    ),
    tag = "Listing"
)]
pub async fn generate_listing(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ListingResponse>, (StatusCode, String)> {
    let listing = state
        .flows
        .listing()
        .run(&body_fields(payload)?)
        .await
        .map_err(flow_error)?;

    Ok(Json(listing.into()))
}

/// Explain the cultural background of a craft
#[utoipa::path(
    post,
    path = "/artvaani/insights",
    request_body = InsightsRequest,
    responses(
        (status = 200, description = "Insights generated", body = InsightsResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Model unavailable or returned malformed output")
    ),
    tag = "Insights"
)]
pub async fn cultural_insights(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<InsightsResponse>, (StatusCode, String)> {
    let insights = state
        .flows
        .insights()
        .run(&body_fields(payload)?)
        .await
        .map_err(flow_error)?;

    Ok(Json(insights.into()))
}

/// Turn a voice recording into a cultural narrative
#[utoipa::path(
    post,
    path = "/artvaani/narratives",
    request_body = AudioRequest,
    responses(
        (status = 200, description = "Narrative generated", body = NarrativeResponse),
        (status = 400, description = "Invalid input"),
        (status = 422, description = "Recording produced no transcription or narrative"),
        (status = 502, description = "Model unavailable or returned malformed output")
    ),
    tag = "Audio"
)]
pub async fn cultural_narrative(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<NarrativeResponse>, (StatusCode, String)> {
    let narrative = state
        .flows
        .narrative()
        .run(&body_fields(payload)?)
        .await
        .map_err(flow_error)?;

    Ok(Json(narrative.into()))
}

/// Transcribe a voice recording and write a story from it
#[utoipa::path(
    post,
    path = "/artvaani/stories",
    request_body = AudioRequest,
    responses(
        (status = 200, description = "Story generated", body = StoryResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Model unavailable or returned malformed output")
    ),
    tag = "Audio"
)]
pub async fn story_from_audio(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<StoryResponse>, (StatusCode, String)> {
    let story = state
        .flows
        .story()
        .run(&body_fields(payload)?)
        .await
        .map_err(flow_error)?;

    Ok(Json(story.into()))
}

/// Compare an artisan's declared city with their location and photo
#[utoipa::path(
    post,
    path = "/artvaani/verifications",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification decided", body = VerificationResponse),
        (status = 400, description = "Invalid input"),
        (status = 502, description = "Geocoder or model unavailable, or malformed output")
    ),
    tag = "Verification"
)]
pub async fn verify_identity(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<VerificationResponse>, (StatusCode, String)> {
    let verdict = state
        .flows
        .verification()
        .run_observed(&body_fields(payload)?, |stage| {
            tracing::debug!(stage = %stage, "Verification progress");
        })
        .await
        .map_err(flow_error)?;

    Ok(Json(verdict.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/artvaani/listings", post(generate_listing))
        .route("/artvaani/insights", post(cultural_insights))
        .route("/artvaani/narratives", post(cultural_narrative))
        .route("/artvaani/stories", post(story_from_audio))
        .route("/artvaani/verifications", post(verify_identity))
}
