//! Flow request/response bodies
//!
//! The request types document the expected bodies in OpenAPI only. Handlers
//! take the raw JSON object so that missing and wrong-kind fields all reach
//! the flow's input validator, which reports every offending field at once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use artvaani::{
    CulturalInsightsOutput, CulturalNarrativeOutput, GenerateProductListingOutput,
    StoryCreationOutput, VerifyArtisanIdentityOutput,
};

// ============================================
// Product listing
// ============================================

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    /// Product photo as `data:image/<type>;base64,<data>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_uri: Option<String>,
    /// Artisan's description (at least 10 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Output language, defaults to `en`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "hi-IN")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "home decor buyers")]
    pub target_audience: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub title: String,
    pub description: String,
    pub story: String,
    #[schema(example = "handmade, terracotta, decorative")]
    pub hashtags: String,
    #[schema(example = "Suggested price (not market data): ₹1,499")]
    pub suggested_price: String,
}

impl From<GenerateProductListingOutput> for ListingResponse {
    fn from(out: GenerateProductListingOutput) -> Self {
        Self {
            title: out.title,
            description: out.description,
            story: out.story,
            hashtags: out.hashtags,
            suggested_price: out.suggested_price,
        }
    }
}

// ============================================
// Cultural insights
// ============================================

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Madhubani painting")]
    pub craft_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "en")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub cultural_insights: String,
}

impl From<CulturalInsightsOutput> for InsightsResponse {
    fn from(out: CulturalInsightsOutput) -> Self {
        Self {
            cultural_insights: out.cultural_insights,
        }
    }
}

// ============================================
// Narrative / story (audio)
// ============================================

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AudioRequest {
    /// Recording as `data:audio/<type>;base64,<data>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "ta-IN")]
    pub language: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NarrativeResponse {
    pub narrative: String,
}

impl From<CulturalNarrativeOutput> for NarrativeResponse {
    fn from(out: CulturalNarrativeOutput) -> Self {
        Self {
            narrative: out.narrative,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    pub transcription: String,
    pub story: String,
}

impl From<StoryCreationOutput> for StoryResponse {
    fn from(out: StoryCreationOutput) -> Self {
        Self {
            transcription: out.transcription,
            story: out.story,
        }
    }
}

// ============================================
// Verification
// ============================================

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Live photo as `data:image/<type>;base64,<data>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 28.4595)]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 77.0266)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "New Delhi")]
    pub declared_city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    /// verified | flagged | mismatch
    #[schema(example = "verified")]
    pub status: String,
    pub resolved_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch_reason: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl From<VerifyArtisanIdentityOutput> for VerificationResponse {
    fn from(out: VerifyArtisanIdentityOutput) -> Self {
        Self {
            status: out.status.to_string(),
            resolved_city: out.resolved_city,
            mismatch_reason: out.mismatch_reason,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_request_uses_camel_case() {
        let request: ListingRequest = serde_json::from_str(
            r#"{"photoDataUri": "data:image/png;base64,AA==", "targetAudience": "gift buyers"}"#,
        )
        .unwrap();
        assert!(request.photo_data_uri.is_some());
        assert_eq!(request.target_audience.as_deref(), Some("gift buyers"));
        assert!(request.description.is_none());
    }

    #[test]
    fn test_verification_response_omits_empty_reason() {
        let response = VerificationResponse {
            status: "verified".to_string(),
            resolved_city: "Gurgaon".to_string(),
            mismatch_reason: None,
            checked_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["resolvedCity"], "Gurgaon");
        assert!(json.get("mismatchReason").is_none());
        assert!(json["checkedAt"].is_string());
    }
}
