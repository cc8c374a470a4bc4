//! Flow pipeline tests against a scripted model and geocoder.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use artvaani::{
    ArtisanFlows, ComposedPrompt, CulturalInsightsInput, CulturalNarrativeInput, ErrorKind,
    FlowError, GenerateProductListingInput, GenerativeModel, OutputSchema, PromptPart,
    ReverseGeocoder, StoryCreationInput, VerificationStage, VerificationStatus,
    VerifyArtisanIdentityInput,
};

const PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQ==";
const AUDIO: &str = "data:audio/webm;base64,GkXfo59ChoEBQveBAULygQRC";

enum Reply {
    Json(Value),
    Unavailable(&'static str),
}

/// Replays canned replies in order and records every call
#[derive(Default)]
struct ScriptedModel {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, ComposedPrompt)>>,
}

impl ScriptedModel {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> ComposedPrompt {
        self.calls.lock().unwrap()[index].1.clone()
    }

    fn step(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index].0.clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        output: &OutputSchema,
    ) -> Result<Value, FlowError> {
        self.calls
            .lock()
            .unwrap()
            .push((output.name.to_string(), prompt.clone()));

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Unavailable(msg)) => Err(FlowError::ModelUnavailable(msg.to_string())),
            None => Err(FlowError::ModelUnavailable("no scripted reply".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-1"
    }
}

struct StubGeocoder {
    city: Option<&'static str>,
    calls: Mutex<usize>,
}

impl StubGeocoder {
    fn resolving(city: &'static str) -> Arc<Self> {
        Arc::new(Self {
            city: Some(city),
            calls: Mutex::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            city: None,
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn resolve_city(&self, _latitude: f64, _longitude: f64) -> Result<String, FlowError> {
        *self.calls.lock().unwrap() += 1;
        self.city
            .map(str::to_string)
            .ok_or_else(|| FlowError::GeocodingUnavailable("connection refused".to_string()))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

fn flows(model: &Arc<ScriptedModel>, geocoder: &Arc<StubGeocoder>) -> ArtisanFlows {
    ArtisanFlows::new(model.clone(), geocoder.clone())
}

fn elephant_listing() -> GenerateProductListingInput {
    GenerateProductListingInput {
        photo_data_uri: PHOTO.to_string(),
        description: "hand-carved wooden elephant".to_string(),
        language: Some("en".to_string()),
        target_audience: "home decor buyers".to_string(),
    }
}

fn full_listing_reply() -> Value {
    json!({
        "title": "Hand-Carved Rosewood Elephant",
        "description": "A majestic elephant carved by hand from a single block of wood.",
        "story": "Elephant carving in Mysuru goes back generations.",
        "hashtags": "#handmade, woodcarving, #homedecor",
        "suggestedPrice": "Suggested price: ₹1,499",
    })
}

fn verify_input(declared_city: &str) -> VerifyArtisanIdentityInput {
    VerifyArtisanIdentityInput {
        photo_data_uri: PHOTO.to_string(),
        latitude: 28.4595,
        longitude: 77.0266,
        declared_city: declared_city.to_string(),
    }
}

// ============================================
// Product listing
// ============================================

#[tokio::test]
async fn test_listing_end_to_end() {
    let model = ScriptedModel::new(vec![Reply::Json(full_listing_reply())]);
    let geocoder = StubGeocoder::failing();

    let listing = flows(&model, &geocoder)
        .generate_product_listing(&elephant_listing())
        .await
        .unwrap();

    assert_eq!(listing.title, "Hand-Carved Rosewood Elephant");
    assert!(!listing.description.is_empty());
    assert!(!listing.story.is_empty());
    assert_eq!(listing.hashtags, "handmade, woodcarving, homedecor");
    assert!(listing.suggested_price.contains("₹1,499"));

    assert_eq!(model.call_count(), 1);
    let prompt = model.prompt(0);
    assert_eq!(prompt.media().count(), 1);
    assert!(prompt
        .parts()
        .iter()
        .any(|p| matches!(p, PromptPart::Media(m) if m.as_uri() == PHOTO)));
    let text = prompt.text();
    assert!(text.contains("hand-carved wooden elephant"));
    assert!(text.contains("home decor buyers"));
    assert!(!text.contains("base64"));
}

#[tokio::test]
async fn test_listing_missing_output_field_is_schema_error() {
    let mut reply = full_listing_reply();
    reply.as_object_mut().unwrap().remove("suggestedPrice");
    let model = ScriptedModel::new(vec![Reply::Json(reply)]);

    let err = flows(&model, &StubGeocoder::failing())
        .generate_product_listing(&elephant_listing())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, FlowError::MissingField(ref name) if name == "suggestedPrice"));
}

#[tokio::test]
async fn test_listing_defaults_language_to_english() {
    let model = ScriptedModel::new(vec![Reply::Json(full_listing_reply())]);
    let mut input = elephant_listing();
    input.language = None;

    flows(&model, &StubGeocoder::failing())
        .generate_product_listing(&input)
        .await
        .unwrap();

    assert!(model.prompt(0).text().contains("write every field in en."));
}

#[tokio::test]
async fn test_listing_invalid_input_makes_no_call() {
    let model = ScriptedModel::new(vec![Reply::Json(full_listing_reply())]);
    let input = GenerateProductListingInput {
        photo_data_uri: AUDIO.to_string(),
        description: String::new(),
        language: None,
        target_audience: "x".to_string(),
    };

    let err = flows(&model, &StubGeocoder::failing())
        .generate_product_listing(&input)
        .await
        .unwrap_err();

    let FlowError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(
        errors.fields(),
        vec!["photoDataUri", "description", "targetAudience"]
    );
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_prompt_composition_is_deterministic_across_runs() {
    let model = ScriptedModel::new(vec![
        Reply::Json(full_listing_reply()),
        Reply::Json(full_listing_reply()),
    ]);
    let flows = flows(&model, &StubGeocoder::failing());

    flows.generate_product_listing(&elephant_listing()).await.unwrap();
    flows.generate_product_listing(&elephant_listing()).await.unwrap();

    assert_eq!(model.prompt(0), model.prompt(1));
}

#[tokio::test]
async fn test_model_unavailable_is_transport_error() {
    let model = ScriptedModel::new(vec![Reply::Unavailable("deadline exceeded")]);

    let err = flows(&model, &StubGeocoder::failing())
        .generate_product_listing(&elephant_listing())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(model.call_count(), 1);
}

// ============================================
// Cultural insights
// ============================================

#[tokio::test]
async fn test_insights() {
    let model = ScriptedModel::new(vec![Reply::Json(json!({
        "culturalInsights": "Dhokra is a 4,000 year old lost-wax casting tradition."
    }))]);

    let out = flows(&model, &StubGeocoder::failing())
        .get_cultural_insights(&CulturalInsightsInput {
            craft_name: "Dhokra".to_string(),
            language: "en".to_string(),
        })
        .await
        .unwrap();

    assert!(out.cultural_insights.contains("lost-wax"));
    let text = model.prompt(0).text();
    assert!(text.contains("Craft: Dhokra"));
    assert!(text.contains("Answer in en."));
}

#[tokio::test]
async fn test_insights_missing_fields_make_no_call() {
    let model = ScriptedModel::new(vec![]);
    let raw = json!({ "language": "" });

    let err = flows(&model, &StubGeocoder::failing())
        .insights()
        .run(raw.as_object().unwrap())
        .await
        .unwrap_err();

    let FlowError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.fields(), vec!["craftName", "language"]);
    assert_eq!(model.call_count(), 0);
}

// ============================================
// Narrative and story
// ============================================

#[tokio::test]
async fn test_narrative_chains_transcription_into_second_prompt() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "My grandmother taught me to weave Pochampally ikat." })),
        Reply::Json(json!({ "narrative": "In the looms of Pochampally..." })),
    ]);

    let out = flows(&model, &StubGeocoder::failing())
        .create_cultural_narrative(&CulturalNarrativeInput {
            audio_data_uri: AUDIO.to_string(),
            language: "te-IN".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(out.narrative, "In the looms of Pochampally...");
    assert_eq!(model.call_count(), 2);
    assert_eq!(model.prompt(0).media().count(), 1);
    let second = model.prompt(1).text();
    assert!(second.contains("Transcription: My grandmother taught me to weave Pochampally ikat."));
    assert!(second.contains("Language: te-IN"));
}

#[tokio::test]
async fn test_narrative_empty_transcription_stops_before_second_call() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "  " })),
        Reply::Json(json!({ "narrative": "should never be requested" })),
    ]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_cultural_narrative(&CulturalNarrativeInput {
            audio_data_uri: AUDIO.to_string(),
            language: "hi-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::TranscriptionFailed));
    assert_eq!(err.kind(), ErrorKind::BusinessEmpty);
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_narrative_empty_narrative_fails() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "I make terracotta horses." })),
        Reply::Json(json!({ "narrative": "" })),
    ]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_cultural_narrative(&CulturalNarrativeInput {
            audio_data_uri: AUDIO.to_string(),
            language: "bn-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::EmptyResult { ref step } if step == "narrative"));
}

#[tokio::test]
async fn test_story_returns_transcription_and_story() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "We paint Warli figures on mud walls." })),
        Reply::Json(json!({ "story": "Under the monsoon sky, the village walls came alive." })),
    ]);

    let out = flows(&model, &StubGeocoder::failing())
        .create_story_from_audio(&StoryCreationInput {
            audio_data_uri: AUDIO.to_string(),
            language: "mr-IN".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(out.transcription, "We paint Warli figures on mud walls.");
    assert!(out.story.starts_with("Under the monsoon sky"));
    assert!(model.prompt(0).text().contains("The language is mr-IN."));
    assert_eq!(model.step(1), "story");
}

#[tokio::test]
async fn test_story_empty_transcription_fails() {
    let model = ScriptedModel::new(vec![Reply::Json(json!({ "text": "" }))]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_story_from_audio(&StoryCreationInput {
            audio_data_uri: AUDIO.to_string(),
            language: "ta-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::TranscriptionFailed));
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn test_story_rejects_image_as_audio() {
    let model = ScriptedModel::new(vec![]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_story_from_audio(&StoryCreationInput {
            audio_data_uri: PHOTO.to_string(),
            language: "ta-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(model.call_count(), 0);
}

// ============================================
// Verification
// ============================================

async fn verify(
    declared: &str,
    resolved: &'static str,
    decision: Value,
) -> (
    Result<artvaani::VerifyArtisanIdentityOutput, FlowError>,
    Vec<VerificationStage>,
    Arc<ScriptedModel>,
) {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "analysis": "A crowded market lane with low-rise shops." })),
        Reply::Json(decision),
    ]);
    let geocoder = StubGeocoder::resolving(resolved);
    let flows = flows(&model, &geocoder);

    let raw = serde_json::to_value(verify_input(declared)).unwrap();
    let mut stages = Vec::new();
    let result = flows
        .verification()
        .run_observed(raw.as_object().unwrap(), |stage| stages.push(stage))
        .await;

    (result, stages, model)
}

#[tokio::test]
async fn test_verification_same_metro_is_verified() {
    let (result, stages, model) = verify(
        "New Delhi",
        "Gurgaon",
        json!({ "status": "verified", "resolvedCity": "Gurgaon" }),
    )
    .await;

    let out = result.unwrap();
    assert_eq!(out.status, VerificationStatus::Verified);
    assert_eq!(out.resolved_city, "Gurgaon");
    assert_eq!(out.mismatch_reason, None);
    assert_eq!(
        stages,
        vec![
            VerificationStage::Idle,
            VerificationStage::ResolvingLocation,
            VerificationStage::AnalyzingPhoto,
            VerificationStage::Comparing,
            VerificationStage::Verified,
        ]
    );

    let comparison = model.prompt(1).text();
    assert!(comparison.contains("`New Delhi`"));
    assert!(comparison.contains("`Gurgaon`"));
    assert!(comparison.contains("A crowded market lane with low-rise shops."));
}

#[tokio::test]
async fn test_verification_neighbouring_city_is_flagged() {
    let (result, stages, _) = verify(
        "Mumbai",
        "Pune",
        json!({
            "status": "flagged",
            "resolvedCity": "Pune",
            "mismatchReason": "Pune is a neighbouring city in Maharashtra.",
        }),
    )
    .await;

    let out = result.unwrap();
    assert_eq!(out.status, VerificationStatus::Flagged);
    assert!(!out.mismatch_reason.unwrap_or_default().is_empty());
    assert_eq!(stages.last(), Some(&VerificationStage::Flagged));
}

#[tokio::test]
async fn test_verification_different_state_is_mismatch() {
    let (result, _, _) = verify(
        "Bengaluru",
        "Kolkata",
        json!({
            "status": "mismatch",
            "resolvedCity": "Kolkata",
            "mismatchReason": "Kolkata and Bengaluru are in different states.",
        }),
    )
    .await;

    let out = result.unwrap();
    assert_eq!(out.status, VerificationStatus::Mismatch);
    assert!(out.mismatch_reason.is_some());
}

#[tokio::test]
async fn test_verification_flagged_without_reason_is_rejected() {
    let (result, stages, _) = verify(
        "Mumbai",
        "Pune",
        json!({ "status": "flagged", "resolvedCity": "Pune", "mismatchReason": " " }),
    )
    .await;

    assert!(matches!(result, Err(FlowError::MissingField(ref name)) if name == "mismatchReason"));
    assert_eq!(stages.last(), Some(&VerificationStage::Error));
}

#[tokio::test]
async fn test_verification_unknown_status_is_rejected() {
    let (result, _, _) = verify(
        "Mumbai",
        "Pune",
        json!({ "status": "probably-fine", "resolvedCity": "Pune" }),
    )
    .await;

    assert_eq!(result.unwrap_err().kind(), ErrorKind::Schema);
}

#[tokio::test]
async fn test_verification_geocoding_failure_ends_in_error() {
    let model = ScriptedModel::new(vec![]);
    let geocoder = StubGeocoder::failing();
    let flows = flows(&model, &geocoder);

    let raw = serde_json::to_value(verify_input("Jaipur")).unwrap();
    let mut stages = Vec::new();
    let err = flows
        .verification()
        .run_observed(raw.as_object().unwrap(), |stage| stages.push(stage))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::GeocodingUnavailable(_)));
    assert_eq!(
        stages,
        vec![
            VerificationStage::Idle,
            VerificationStage::ResolvingLocation,
            VerificationStage::Error,
        ]
    );
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn test_verification_empty_photo_analysis_uses_fallback() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "analysis": "" })),
        Reply::Json(json!({ "status": "verified", "resolvedCity": "Jaipur" })),
    ]);
    let geocoder = StubGeocoder::resolving("Jaipur");

    let out = flows(&model, &geocoder)
        .verify_artisan_identity(&verify_input("Jaipur"))
        .await
        .unwrap();

    assert_eq!(out.status, VerificationStatus::Verified);
    assert!(model.prompt(1).text().contains("Could not analyze photo."));
}

#[tokio::test]
async fn test_verification_invalid_coordinates_touch_nothing() {
    let model = ScriptedModel::new(vec![]);
    let geocoder = StubGeocoder::resolving("Jaipur");
    let mut input = verify_input("");
    input.latitude = 95.0;

    let err = flows(&model, &geocoder)
        .verify_artisan_identity(&input)
        .await
        .unwrap_err();

    let FlowError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.fields(), vec!["latitude", "declaredCity"]);
    assert_eq!(geocoder.call_count(), 0);
    assert_eq!(model.call_count(), 0);
}

// ============================================
// Missing output fields and step failures
// ============================================

#[tokio::test]
async fn test_insights_missing_output_field() {
    let model = ScriptedModel::new(vec![Reply::Json(json!({ "insights": "misnamed" }))]);

    let err = flows(&model, &StubGeocoder::failing())
        .get_cultural_insights(&CulturalInsightsInput {
            craft_name: "Kalamkari".to_string(),
            language: "en".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, FlowError::MissingField(ref name) if name == "culturalInsights"));
}

#[tokio::test]
async fn test_narrative_missing_narrative_field_is_schema_error() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "I carve sandalwood." })),
        Reply::Json(json!({ "tale": "wrong key" })),
    ]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_cultural_narrative(&CulturalNarrativeInput {
            audio_data_uri: AUDIO.to_string(),
            language: "kn-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, FlowError::MissingField(ref name) if name == "narrative"));
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn test_story_missing_story_field_is_schema_error() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "text": "We weave Kanchipuram silk." })),
        Reply::Json(json!({ "tale": "wrong key" })),
    ]);

    let err = flows(&model, &StubGeocoder::failing())
        .create_story_from_audio(&StoryCreationInput {
            audio_data_uri: AUDIO.to_string(),
            language: "ta-IN".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(err, FlowError::MissingField(ref name) if name == "story"));
}

#[tokio::test]
async fn test_verification_photo_step_failure_ends_in_error() {
    let model = ScriptedModel::new(vec![Reply::Unavailable("down")]);
    let geocoder = StubGeocoder::resolving("Jaipur");
    let flows = flows(&model, &geocoder);

    let raw = serde_json::to_value(verify_input("Jaipur")).unwrap();
    let mut stages = Vec::new();
    let err = flows
        .verification()
        .run_observed(raw.as_object().unwrap(), |stage| stages.push(stage))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::ModelUnavailable(_)));
    assert_eq!(
        stages,
        vec![
            VerificationStage::Idle,
            VerificationStage::ResolvingLocation,
            VerificationStage::AnalyzingPhoto,
            VerificationStage::Error,
        ]
    );
    assert_eq!(model.call_count(), 1);
    assert_eq!(geocoder.call_count(), 1);
}

#[tokio::test]
async fn test_verification_compare_missing_resolved_city() {
    let (result, stages, model) = verify(
        "Jaipur",
        "Jaipur",
        json!({ "status": "verified" }),
    )
    .await;

    assert!(matches!(result, Err(FlowError::MissingField(ref name)) if name == "resolvedCity"));
    assert_eq!(
        stages,
        vec![
            VerificationStage::Idle,
            VerificationStage::ResolvingLocation,
            VerificationStage::AnalyzingPhoto,
            VerificationStage::Comparing,
            VerificationStage::Error,
        ]
    );
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn test_verification_compare_model_failure_ends_in_error() {
    let model = ScriptedModel::new(vec![
        Reply::Json(json!({ "analysis": "A stepwell courtyard." })),
        Reply::Unavailable("deadline exceeded"),
    ]);
    let geocoder = StubGeocoder::resolving("Jaipur");
    let flows = flows(&model, &geocoder);

    let raw = serde_json::to_value(verify_input("Jaipur")).unwrap();
    let mut stages = Vec::new();
    let err = flows
        .verification()
        .run_observed(raw.as_object().unwrap(), |stage| stages.push(stage))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(stages.last(), Some(&VerificationStage::Error));
    assert_eq!(model.call_count(), 2);
}
