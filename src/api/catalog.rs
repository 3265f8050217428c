use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::Track;
use crate::services::Catalog;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct CatalogResponse {
    tracks: Vec<Track>,
    styles: Vec<String>,
}

impl From<&Catalog> for CatalogResponse {
    fn from(catalog: &Catalog) -> Self {
        CatalogResponse {
            tracks: catalog.tracks().to_vec(),
            styles: catalog.styles(),
        }
    }
}

pub fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(get_catalog).post(upload_catalog))
        .route("/catalog/styles", get(list_styles))
}

/// Replace the active catalog with an uploaded CSV. A rejected upload leaves
/// the previous catalog in place.
async fn upload_catalog(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<CatalogResponse>> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("Catalog upload is empty".to_string()));
    }

    let catalog = Catalog::from_csv_str(&body)?;
    catalog.check_size(state.generator.limits().max_catalog_tracks)?;

    tracing::info!("Uploaded catalog with {} songs", catalog.len());
    let catalog = state.catalog.replace(catalog).await;

    Ok(Json(CatalogResponse::from(catalog.as_ref())))
}

async fn get_catalog(State(state): State<Arc<AppState>>) -> Result<Json<CatalogResponse>> {
    let catalog = state.catalog.snapshot().await.ok_or(AppError::NoCatalog)?;
    Ok(Json(CatalogResponse::from(catalog.as_ref())))
}

async fn list_styles(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>> {
    let catalog = state.catalog.snapshot().await.ok_or(AppError::NoCatalog)?;
    Ok(Json(catalog.styles()))
}
