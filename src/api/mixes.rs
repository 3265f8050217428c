use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{camelot, Mix, Relation, StyleOrder, TrackId, TrackInfo, TrackSet};
use crate::services::{Catalog, Generation};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateMixesRequest {
    style_order: Vec<String>,
    max_songs: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSummary {
    id: Uuid,
    generated_at: DateTime<Utc>,
    style_order: StyleOrder,
    max_songs: usize,
    total_mixes: usize,
    sets: Vec<SetSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetSummary {
    /// 1-based, in generation order
    index: usize,
    tracks: Vec<TrackInfo>,
    mix_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SetMixesResponse {
    generation_id: Uuid,
    index: usize,
    tracks: Vec<TrackInfo>,
    mixes: Vec<MixView>,
}

#[derive(Debug, Serialize)]
struct MixView {
    number: usize,
    positions: Vec<PositionView>,
    transitions: Vec<TransitionView>,
}

#[derive(Debug, Serialize)]
struct PositionView {
    position: usize,
    style: String,
    track: TrackInfo,
}

#[derive(Debug, Serialize)]
struct TransitionView {
    from: String,
    to: String,
    compatible: bool,
    relation: Option<Relation>,
    label: &'static str,
}

pub fn mix_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/mixes", post(generate_mixes))
        .route("/mixes/:id", get(get_generation))
        .route("/mixes/:id/sets/:index", get(get_set_mixes))
}

async fn generate_mixes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateMixesRequest>,
) -> Result<Json<GenerationSummary>> {
    let catalog = state.catalog.snapshot().await.ok_or(AppError::NoCatalog)?;
    let style_order = StyleOrder::new(&req.style_order);
    let max_songs = req.max_songs.unwrap_or(state.default_max_songs);

    tracing::info!(
        "Generating mixes for {} with max {} songs",
        style_order.as_slice().join(" -> "),
        max_songs
    );

    // The search is CPU-bound, keep it off the async workers
    let generator = state.generator.clone();
    let snapshot = catalog.clone();
    let order = style_order.clone();
    let mixes = tokio::task::spawn_blocking(move || generator.generate(&snapshot, &order, max_songs))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Generation task panicked: {}", e)))??;

    if mixes.is_empty() {
        tracing::info!("No valid mixes found for the given styles");
    }

    let generation = state
        .generations
        .insert(Generation::new(catalog, style_order, max_songs, mixes))
        .await;

    Ok(Json(summarize(&generation)?))
}

async fn get_generation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerationSummary>> {
    let generation = state
        .generations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Generation not found".to_string()))?;

    Ok(Json(summarize(&generation)?))
}

async fn get_set_mixes(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<SetMixesResponse>> {
    let generation = state
        .generations
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Generation not found".to_string()))?;

    let (set, mixes) = generation.mixes.select(index)?;
    let catalog = generation.catalog.as_ref();

    let mixes = mixes
        .iter()
        .enumerate()
        .map(|(i, mix)| mix_view(catalog, &generation.style_order, i + 1, mix))
        .collect::<Result<Vec<_>>>()?;

    Ok(Json(SetMixesResponse {
        generation_id: generation.id,
        index,
        tracks: set_tracks(catalog, set)?,
        mixes,
    }))
}

fn summarize(generation: &Generation) -> Result<GenerationSummary> {
    let catalog = generation.catalog.as_ref();
    let sets = generation
        .mixes
        .iter()
        .enumerate()
        .map(|(i, (set, mixes))| {
            Ok(SetSummary {
                index: i + 1,
                tracks: set_tracks(catalog, set)?,
                mix_count: mixes.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(GenerationSummary {
        id: generation.id,
        generated_at: generation.generated_at,
        style_order: generation.style_order.clone(),
        max_songs: generation.max_songs,
        total_mixes: generation.mixes.total_mixes(),
        sets,
    })
}

fn track_info(catalog: &Catalog, id: TrackId) -> Result<TrackInfo> {
    catalog
        .track(id)
        .map(TrackInfo::from)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Track {} missing from catalog", id)))
}

fn set_tracks(catalog: &Catalog, set: &TrackSet) -> Result<Vec<TrackInfo>> {
    set.ids().iter().map(|id| track_info(catalog, *id)).collect()
}

fn mix_view(catalog: &Catalog, style_order: &StyleOrder, number: usize, mix: &Mix) -> Result<MixView> {
    let positions = mix
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            Ok(PositionView {
                position: i + 1,
                style: style_order.get(i).unwrap_or_default().to_string(),
                track: track_info(catalog, *id)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let transitions = positions
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0].track.camelot, &pair[1].track.camelot);
            let relation = camelot::relation(from, to);
            TransitionView {
                from: from.clone(),
                to: to.clone(),
                compatible: camelot::is_compatible(from, to),
                relation,
                label: relation.map(Relation::label).unwrap_or("Clash"),
            }
        })
        .collect();

    Ok(MixView {
        number,
        positions,
        transitions,
    })
}
