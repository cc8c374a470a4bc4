//! Verification Flow
//!
//! Checks an artisan's declared city against their device location:
//! reverse-geocode the coordinates, describe the photo's surroundings, then
//! let the model compare declared city, resolved city and photo context.
//!
//! ```text
//! idle -> resolving-location -> analyzing-photo -> comparing -> verified | flagged | mismatch
//!   \________________________________ error ______________________________/
//! ```
//!
//! The decision itself is the model's; it is passed through unmodified
//! apart from requiring a reason on `flagged` and `mismatch`.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use super::{flow_span, ModelInvoker};
use crate::domain::entities::{
    FieldSpec, FlowRequest, InputSchema, OutputField, OutputSchema, PromptTemplate,
};
use crate::domain::errors::FlowError;
use crate::domain::services::validate_input;
use crate::domain::value_objects::VerificationStatus;
use crate::ports::ReverseGeocoder;

const FLOW: &str = "verify_artisan_identity";
const PHOTO_STEP: &str = "photo_analysis";
const COMPARE_STEP: &str = "city_comparison";

/// Used when the photo step returns an empty description
pub const PHOTO_ANALYSIS_FALLBACK: &str = "Could not analyze photo.";

const PHOTO_TEMPLATE: &str = "Analyze the background of this photo for clues about where it was taken (landmarks, architecture, type of surroundings). Reply with a brief, one-sentence summary.

Photo: {{media photoDataUri}}";

const COMPARE_TEMPLATE: &str = r#"You are the verification agent of ArtVaani, an artisan marketplace. Decide whether an artisan's location is genuine from three inputs: the city they declared, the city resolved from their device GPS, and a description of a live photo they just took.

Inputs:
1. Declared city (from the artisan's profile): `{{declaredCity}}`
2. Resolved GPS city: `{{resolvedCity}}`
3. Live photo analysis: `{{photoAnalysis}}`

Compare the declared city with the resolved GPS city:
- Same city, or obviously the same metropolitan area (e.g. "Gurgaon" and "New Delhi"): status "verified".
- Different cities in the same state, or well-known neighbouring cities (e.g. "Pune" and "Mumbai"): status "flagged". This goes to manual review; give a brief reason.
- Different states or far apart (e.g. "Kolkata" and "Bengaluru"): status "mismatch". Give a brief reason.

Use the photo analysis as context only; base the decision on the city comparison.

Respond with 'status', 'resolvedCity' and, when applicable, 'mismatchReason'."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyArtisanIdentityInput {
    pub photo_data_uri: String,
    pub latitude: f64,
    pub longitude: f64,
    pub declared_city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyArtisanIdentityOutput {
    pub status: VerificationStatus,
    pub resolved_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mismatch_reason: Option<String>,
}

/// Progress of a single verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationStage {
    Idle,
    ResolvingLocation,
    AnalyzingPhoto,
    Comparing,
    Verified,
    Flagged,
    Mismatch,
    Error,
}

impl VerificationStage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VerificationStage::Verified
                | VerificationStage::Flagged
                | VerificationStage::Mismatch
                | VerificationStage::Error
        )
    }
}

impl From<VerificationStatus> for VerificationStage {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::Verified => VerificationStage::Verified,
            VerificationStatus::Flagged => VerificationStage::Flagged,
            VerificationStatus::Mismatch => VerificationStage::Mismatch,
        }
    }
}

impl std::fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VerificationStage::Idle => "idle",
            VerificationStage::ResolvingLocation => "resolving-location",
            VerificationStage::AnalyzingPhoto => "analyzing-photo",
            VerificationStage::Comparing => "comparing",
            VerificationStage::Verified => "verified",
            VerificationStage::Flagged => "flagged",
            VerificationStage::Mismatch => "mismatch",
            VerificationStage::Error => "error",
        };
        write!(f, "{}", name)
    }
}

pub fn input_schema() -> &'static InputSchema {
    static SCHEMA: OnceLock<InputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        InputSchema::new(
            FLOW,
            vec![
                FieldSpec::image("photoDataUri"),
                FieldSpec::number("latitude").range(-90.0, 90.0),
                FieldSpec::number("longitude").range(-180.0, 180.0),
                FieldSpec::text("declaredCity").min_len(2),
            ],
        )
    })
}

fn photo_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            PHOTO_STEP,
            vec![OutputField::text(
                "analysis",
                "A brief description of the surroundings visible in the photo.",
            )],
        )
    })
}

pub fn output_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            COMPARE_STEP,
            vec![
                OutputField::text(
                    "status",
                    "\"verified\" if locations match, \"flagged\" for slight mismatches needing review, \"mismatch\" for significant differences.",
                )
                .one_of(VerificationStatus::NAMES),
                OutputField::text("resolvedCity", "The city name resolved from the GPS coordinates."),
                OutputField::text("mismatchReason", "An explanation if a mismatch is detected.")
                    .optional(),
            ],
        )
    })
}

fn photo_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(PHOTO_STEP, PHOTO_TEMPLATE))
}

fn compare_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(COMPARE_STEP, COMPARE_TEMPLATE))
}

#[derive(Clone)]
pub struct VerificationFlow {
    invoker: ModelInvoker,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl VerificationFlow {
    pub fn new(invoker: ModelInvoker, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { invoker, geocoder }
    }

    pub async fn run(
        &self,
        raw: &Map<String, Value>,
    ) -> Result<VerifyArtisanIdentityOutput, FlowError> {
        self.run_observed(raw, |_| {}).await
    }

    /// Run the flow, reporting every stage transition to `observe`
    pub async fn run_observed<F>(
        &self,
        raw: &Map<String, Value>,
        mut observe: F,
    ) -> Result<VerifyArtisanIdentityOutput, FlowError>
    where
        F: FnMut(VerificationStage) + Send,
    {
        async move {
            let mut enter = |stage: VerificationStage| {
                tracing::info!(stage = %stage, "Verification stage");
                observe(stage);
            };

            enter(VerificationStage::Idle);
            let result = self.execute(raw, &mut enter).await;

            match &result {
                Ok(outcome) => enter(outcome.status.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "Verification failed");
                    enter(VerificationStage::Error);
                }
            }
            result
        }
        .instrument(flow_span(FLOW))
        .await
    }

    async fn execute<F>(
        &self,
        raw: &Map<String, Value>,
        enter: &mut F,
    ) -> Result<VerifyArtisanIdentityOutput, FlowError>
    where
        F: FnMut(VerificationStage) + Send,
    {
        let request = validate_input(input_schema(), raw)?;
        let latitude = request.require_number("latitude")?;
        let longitude = request.require_number("longitude")?;
        let photo = request.require_media("photoDataUri")?;
        let declared_city = request.require_text("declaredCity")?;

        enter(VerificationStage::ResolvingLocation);
        let resolved_city = self.geocoder.resolve_city(latitude, longitude).await?;

        enter(VerificationStage::AnalyzingPhoto);
        let photo_request = FlowRequest::new().with("photoDataUri", photo.clone());
        let analyzed = self
            .invoker
            .run_step(PHOTO_STEP, photo_template(), &photo_request, photo_schema())
            .await?;
        let analysis = match analyzed.required_text("analysis")?.trim() {
            "" => PHOTO_ANALYSIS_FALLBACK,
            text => text,
        };

        enter(VerificationStage::Comparing);
        let compare_request = FlowRequest::new()
            .with("declaredCity", declared_city)
            .with("resolvedCity", resolved_city)
            .with("photoAnalysis", analysis);
        let decision = self
            .invoker
            .run_step(COMPARE_STEP, compare_template(), &compare_request, output_schema())
            .await?;

        let status: VerificationStatus = decision
            .required_text("status")?
            .parse()
            .map_err(FlowError::MalformedOutput)?;
        let mismatch_reason = decision
            .text("mismatchReason")
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .map(str::to_string);

        if status.requires_reason() && mismatch_reason.is_none() {
            return Err(FlowError::missing_field("mismatchReason"));
        }

        Ok(VerifyArtisanIdentityOutput {
            status,
            resolved_city: decision.required_text("resolvedCity")?.to_string(),
            mismatch_reason,
        })
    }
}
