pub mod catalog;
pub mod mixes;

pub use catalog::catalog_routes;
pub use mixes::mix_routes;

use crate::config::Config;
use crate::services::{CatalogStore, GenerationStore, MixGenerator};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct AppState {
    pub catalog: CatalogStore,
    pub generator: MixGenerator,
    pub generations: GenerationStore,
    pub default_max_songs: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: CatalogStore::new(),
            generator: MixGenerator::new(config.limits),
            generations: GenerationStore::new(config.generation_retention),
            default_max_songs: config.default_max_songs,
        }
    }
}

/// All API routes under `/api/v1`, without middleware layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().nest(
        "/api/v1",
        Router::new()
            .route("/health", get(health))
            .merge(catalog_routes())
            .merge(mix_routes())
            .with_state(state),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
