//! ArtVaani Domain Library
//!
//! The AI content flows behind the ArtVaani artisan marketplace.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure types and logic
//!   - `entities/`: Transient request/response records (FlowRequest, FlowResponse, PromptTemplate)
//!   - `value_objects/`: Immutable value types (MediaReference, FieldValue, VerificationStatus)
//!   - `services/`: Input validator, prompt composer, response validator
//!   - `errors/`: Flow error taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: Hosted generative model, reverse geocoder
//!
//! - **Flows** (`flows/`): One pipeline per feature
//!   (validate -> compose prompt -> invoke model -> validate response)
//!
//! # Usage
//!
//! ```rust,ignore
//! use artvaani::{ArtisanFlows, GenerateProductListingInput};
//!
//! let flows = ArtisanFlows::new(model, geocoder);
//! let listing = flows.generate_product_listing(input).await?;
//! ```

pub mod domain;
pub mod flows;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ComposedPrompt, Constraint, ErrorKind, FieldKind, FieldSpec, FieldValue, FieldViolation,
    FlowError, FlowRequest, FlowResponse, InputSchema, MediaKind, MediaReference, OutputField,
    OutputSchema, PromptPart, PromptTemplate, ValidationErrors, VerificationStatus,
};
pub use flows::{
    ArtisanFlows, CulturalInsightsInput, CulturalInsightsOutput, CulturalNarrativeInput,
    CulturalNarrativeOutput, GenerateProductListingInput, GenerateProductListingOutput,
    ModelInvoker, StoryCreationInput, StoryCreationOutput, VerificationStage,
    VerifyArtisanIdentityInput, VerifyArtisanIdentityOutput,
};
pub use ports::{GenerativeModel, ReverseGeocoder};
