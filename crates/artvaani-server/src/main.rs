use std::sync::Arc;

use anyhow::Context;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod auth;
mod config;
mod models;
mod routes;

use adapters::{GeminiModel, NominatimGeocoder};
use artvaani::ArtisanFlows;
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub flows: Arc<ArtisanFlows>,
    /// Expected bearer token; `None` disables auth
    pub api_key: Option<Arc<str>>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "ArtVaani API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Assemble every route around the given state
pub fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = routes::flows::router().layer(middleware::from_fn_with_state(
        state.clone(),
        auth::require_bearer,
    ));

    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🎨 ArtVaani API initializing...");

    let config = ServerConfig::from_secrets(&secrets)?;

    if config.api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No ARTVAANI_API_KEY set - authentication disabled");
    }

    let model = GeminiModel::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.http_timeout,
    )
    .context("Failed to build Gemini client")?;
    tracing::info!(model = %config.gemini_model, "🤖 Gemini model configured");

    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.clone(),
        &config.geocoder_user_agent,
        config.http_timeout,
    )
    .context("Failed to build geocoder client")?;
    tracing::info!(url = %config.geocoder_url, "🗺️  Reverse geocoder configured");

    let state = AppState {
        flows: Arc::new(ArtisanFlows::new(Arc::new(model), Arc::new(geocoder))),
        api_key: config.api_key.map(Arc::from),
    };

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ ArtVaani API ready");

    Ok(router.into())
}
