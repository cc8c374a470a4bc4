//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AudioRequest, InsightsRequest, InsightsResponse, ListingRequest, ListingResponse,
    NarrativeResponse, StoryResponse, VerificationRequest, VerificationResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::flows::generate_listing,
        super::flows::cultural_insights,
        super::flows::cultural_narrative,
        super::flows::story_from_audio,
        super::flows::verify_identity,
    ),
    info(
        title = "ArtVaani API",
        version = "0.1.0",
        description = "AI content flows for artisans: listings, cultural insights, voice stories and location verification.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Listing", description = "Product listing from a photo and description"),
        (name = "Insights", description = "Cultural background of a craft"),
        (name = "Audio", description = "Narratives and stories from voice recordings"),
        (name = "Verification", description = "Artisan location and photo verification"),
    ),
    components(
        schemas(
            ListingRequest,
            ListingResponse,
            InsightsRequest,
            InsightsResponse,
            AudioRequest,
            NarrativeResponse,
            StoryResponse,
            VerificationRequest,
            VerificationResponse,
        )
    ),
)]
pub struct ApiDoc;
