//! Flows
//!
//! One pipeline per feature: validate input -> compose prompt -> invoke
//! model -> validate response. Multi-step flows chain single steps and pass
//! intermediate output forward.
//!
//! - product_listing: photo + description -> listing
//! - cultural_insights: craft name -> insights
//! - cultural_narrative: audio -> transcription -> narrative
//! - story_creation: audio -> transcription -> story
//! - verification: geocode + photo analysis -> comparison

pub mod cultural_insights;
pub mod cultural_narrative;
mod invoker;
pub mod product_listing;
pub mod story_creation;
pub mod verification;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::errors::FlowError;
use crate::ports::{GenerativeModel, ReverseGeocoder};

pub use cultural_insights::{CulturalInsightsFlow, CulturalInsightsInput, CulturalInsightsOutput};
pub use cultural_narrative::{
    CulturalNarrativeFlow, CulturalNarrativeInput, CulturalNarrativeOutput,
};
pub use invoker::ModelInvoker;
pub use product_listing::{
    GenerateProductListingInput, GenerateProductListingOutput, ProductListingFlow,
};
pub use story_creation::{StoryCreationFlow, StoryCreationInput, StoryCreationOutput};
pub use verification::{
    VerificationFlow, VerificationStage, VerifyArtisanIdentityInput, VerifyArtisanIdentityOutput,
};

/// Typed caller input -> raw field map for the input validator.
///
/// The `*Input` structs hold only strings, optional strings and `f64`s, so
/// serialization cannot fail and always yields an object (a non-finite
/// number becomes `null` and is reported by the validator as missing).
/// The empty-map arm is unreachable for them; an empty map would in any
/// case fail validation rather than reach the model.
pub(crate) fn raw_fields<T: Serialize>(input: &T) -> Map<String, Value> {
    match serde_json::to_value(input) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

pub(crate) fn flow_span(flow: &'static str) -> tracing::Span {
    tracing::info_span!("flow", flow, invocation_id = %Uuid::new_v4())
}

/// All caller-facing flows, wired to one model and one geocoder
#[derive(Clone)]
pub struct ArtisanFlows {
    listing: ProductListingFlow,
    insights: CulturalInsightsFlow,
    narrative: CulturalNarrativeFlow,
    story: StoryCreationFlow,
    verification: VerificationFlow,
}

impl ArtisanFlows {
    pub fn new(model: Arc<dyn GenerativeModel>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        let invoker = ModelInvoker::new(model);
        Self {
            listing: ProductListingFlow::new(invoker.clone()),
            insights: CulturalInsightsFlow::new(invoker.clone()),
            narrative: CulturalNarrativeFlow::new(invoker.clone()),
            story: StoryCreationFlow::new(invoker.clone()),
            verification: VerificationFlow::new(invoker, geocoder),
        }
    }

    pub async fn generate_product_listing(
        &self,
        input: &GenerateProductListingInput,
    ) -> Result<GenerateProductListingOutput, FlowError> {
        self.listing.run(&raw_fields(input)).await
    }

    pub async fn get_cultural_insights(
        &self,
        input: &CulturalInsightsInput,
    ) -> Result<CulturalInsightsOutput, FlowError> {
        self.insights.run(&raw_fields(input)).await
    }

    pub async fn create_cultural_narrative(
        &self,
        input: &CulturalNarrativeInput,
    ) -> Result<CulturalNarrativeOutput, FlowError> {
        self.narrative.run(&raw_fields(input)).await
    }

    pub async fn create_story_from_audio(
        &self,
        input: &StoryCreationInput,
    ) -> Result<StoryCreationOutput, FlowError> {
        self.story.run(&raw_fields(input)).await
    }

    pub async fn verify_artisan_identity(
        &self,
        input: &VerifyArtisanIdentityInput,
    ) -> Result<VerifyArtisanIdentityOutput, FlowError> {
        self.verification.run(&raw_fields(input)).await
    }

    // Raw-field entry points, for callers that hold untyped input

    pub fn listing(&self) -> &ProductListingFlow {
        &self.listing
    }

    pub fn insights(&self) -> &CulturalInsightsFlow {
        &self.insights
    }

    pub fn narrative(&self) -> &CulturalNarrativeFlow {
        &self.narrative
    }

    pub fn story(&self) -> &StoryCreationFlow {
        &self.story
    }

    pub fn verification(&self) -> &VerificationFlow {
        &self.verification
    }
}
