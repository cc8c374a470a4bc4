//! Infrastructure Adapters
//!
//! Implementations of domain ports for hosted services.

pub mod gemini;
pub mod nominatim;

// Re-exports
pub use gemini::GeminiModel;
pub use nominatim::NominatimGeocoder;
