//! ArtVaani API Client

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// API Client for ArtVaani
pub struct ArtVaaniClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request Types
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRequest {
    pub photo_data_uri: String,
    pub description: String,
    pub language: String,
    pub target_audience: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    pub craft_name: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioRequest {
    pub audio_data_uri: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub photo_data_uri: String,
    pub latitude: f64,
    pub longitude: f64,
    pub declared_city: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub title: String,
    pub description: String,
    pub story: String,
    pub hashtags: String,
    pub suggested_price: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub cultural_insights: String,
}

#[derive(Debug, Deserialize)]
pub struct NarrativeResponse {
    pub narrative: String,
}

#[derive(Debug, Deserialize)]
pub struct StoryResponse {
    pub transcription: String,
    pub story: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub status: String,
    pub resolved_city: String,
    #[serde(default)]
    pub mismatch_reason: Option<String>,
    pub checked_at: String,
}

impl ArtVaaniClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check that the stored key is accepted by a protected route.
    /// An empty insights request passes auth and then fails validation.
    pub async fn check_key(&self) -> Result<bool> {
        let url = format!("{}/artvaani/insights", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(&serde_json::json!({}))
            .send()
            .await
            .context("Failed to connect to ArtVaani API")?;
        Ok(resp.status() != reqwest::StatusCode::UNAUTHORIZED)
    }

    pub async fn generate_listing(&self, request: &ListingRequest) -> Result<ListingResponse> {
        self.post("/artvaani/listings", request).await
    }

    pub async fn cultural_insights(&self, request: &InsightsRequest) -> Result<InsightsResponse> {
        self.post("/artvaani/insights", request).await
    }

    pub async fn cultural_narrative(&self, request: &AudioRequest) -> Result<NarrativeResponse> {
        self.post("/artvaani/narratives", request).await
    }

    pub async fn story_from_audio(&self, request: &AudioRequest) -> Result<StoryResponse> {
        self.post("/artvaani/stories", request).await
    }

    pub async fn verify_identity(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationResponse> {
        self.post("/artvaani/verifications", request).await
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let resp = self
            .authorized(self.client.post(&url))
            .json(body)
            .send()
            .await
            .context("Failed to connect to ArtVaani API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }
}
