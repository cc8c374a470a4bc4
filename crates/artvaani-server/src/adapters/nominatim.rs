//! Nominatim reverse geocoding adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use artvaani::{FlowError, ReverseGeocoder};

const UNKNOWN_LOCATION: &str = "Unknown Location";

/// OpenStreetMap Nominatim implementation of [`ReverseGeocoder`]
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

impl NominatimGeocoder {
    /// Nominatim's usage policy requires an identifying User-Agent
    pub fn new(
        url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn resolve_city(&self, latitude: f64, longitude: f64) -> Result<String, FlowError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|err| FlowError::GeocodingUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "Geocoding API error");
            return Err(FlowError::GeocodingUnavailable(format!(
                "API error ({})",
                status.as_u16()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| FlowError::GeocodingUnavailable(err.to_string()))?;

        city_from_response(&payload)
    }

    fn provider_name(&self) -> &str {
        "nominatim"
    }
}

/// city, else town, else village; a response without an address fails
fn city_from_response(payload: &Value) -> Result<String, FlowError> {
    let address = payload
        .get("address")
        .and_then(|a| a.as_object())
        .ok_or_else(|| {
            FlowError::GeocodingUnavailable("could not resolve city from coordinates".to_string())
        })?;

    let place = ["city", "town", "village"]
        .iter()
        .filter_map(|key| address.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_LOCATION);

    Ok(place.to_string())
}
