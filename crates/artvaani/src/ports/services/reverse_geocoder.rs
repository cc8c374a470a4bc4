//! Reverse Geocoder Port
//!
//! Abstract interface for mapping coordinates to a place name.

use async_trait::async_trait;

use crate::domain::errors::FlowError;

/// Service interface for reverse geocoding
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolve coordinates to a city, town or village name.
    ///
    /// Failures map to [`FlowError::GeocodingUnavailable`].
    async fn resolve_city(&self, latitude: f64, longitude: f64) -> Result<String, FlowError>;

    fn provider_name(&self) -> &str;
}
