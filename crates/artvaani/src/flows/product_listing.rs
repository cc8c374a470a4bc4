//! Product Listing Flow
//!
//! Photo + artisan description -> title, description, cultural story,
//! tags and a suggested price. Single model step.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use super::{flow_span, ModelInvoker};
use crate::domain::entities::{FieldSpec, InputSchema, OutputField, OutputSchema, PromptTemplate};
use crate::domain::errors::FlowError;
use crate::domain::services::validate_input;

const FLOW: &str = "generate_product_listing";

const TEMPLATE: &str = r#"You are an assistant that writes product listings for artisans selling on ArtVaani, an online marketplace for handmade crafts.

Write a complete, compelling listing from the product photo and the artisan's own description. The listing should work on marketplaces and on social media.

Instructions:
1. Study the photo and the artisan's description together.
2. Title: short, catchy and descriptive.
3. Description: expand the artisan's words into an engaging description covering craftsmanship, materials and possible uses.
4. Story: a short story about the craft's cultural significance, its history or the artisan's journey.
5. Tags: a comma-separated list of popular, relevant keywords. Do not include the '#' symbol.
6. Price: from the materials, complexity and product type, suggest a reasonable selling price in Indian Rupees written with the rupee sign (e.g. ₹1,499), preceded by a brief note that it is only a suggestion.
7. Language: write every field in {{language}}.
8. Audience: match tone and style to {{targetAudience}}.

Inputs:
- Product photo: {{media photoDataUri}}
- Artisan's description: {{description}}
- Language: {{language}}
- Target audience: {{targetAudience}}

Respond with the JSON object described by the schema."#;

/// Caller input for [`ProductListingFlow`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductListingInput {
    pub photo_data_uri: String,
    pub description: String,
    /// Defaults to `en`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub target_audience: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProductListingOutput {
    pub title: String,
    pub description: String,
    pub story: String,
    /// Comma-separated, no leading `#`
    pub hashtags: String,
    pub suggested_price: String,
}

pub fn input_schema() -> &'static InputSchema {
    static SCHEMA: OnceLock<InputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        InputSchema::new(
            FLOW,
            vec![
                FieldSpec::image("photoDataUri"),
                FieldSpec::text("description").min_len(10),
                FieldSpec::text("language").min_len(2).default_value("en"),
                FieldSpec::text("targetAudience").min_len(3),
            ],
        )
    })
}

pub fn output_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            FLOW,
            vec![
                OutputField::text("title", "A compelling title for the product listing."),
                OutputField::text("description", "A detailed and engaging description of the product."),
                OutputField::text("story", "A cultural story about the product, its origins, or the artisan."),
                OutputField::text(
                    "hashtags",
                    "A comma-separated list of relevant tags without '#' (e.g. 'handmade, terracotta, decorative').",
                ),
                OutputField::text(
                    "suggestedPrice",
                    "A suggested selling price in Indian Rupees (₹) with a short disclaimer.",
                ),
            ],
        )
    })
}

fn template() -> &'static PromptTemplate {
    static TEMPLATE_CELL: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE_CELL.get_or_init(|| PromptTemplate::new(FLOW, TEMPLATE))
}

/// Trim each tag and drop any leading `#`
pub fn normalize_hashtags(raw: &str) -> String {
    raw.split(',')
        .map(|tag| tag.trim().trim_start_matches('#').trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct ProductListingFlow {
    invoker: ModelInvoker,
}

impl ProductListingFlow {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    pub async fn run(
        &self,
        raw: &Map<String, Value>,
    ) -> Result<GenerateProductListingOutput, FlowError> {
        async move {
            let request = validate_input(input_schema(), raw)?;

            let response = self
                .invoker
                .run_step(FLOW, template(), &request, output_schema())
                .await?;

            let mut listing: GenerateProductListingOutput = response.into_record()?;
            listing.hashtags = normalize_hashtags(&listing.hashtags);

            tracing::info!(title = %listing.title, "Product listing generated");
            Ok(listing)
        }
        .instrument(flow_span(FLOW))
        .await
    }
}
