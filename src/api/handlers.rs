use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppResult;
use crate::models::Recommendation;
use crate::services::recommender;

use super::AppState;

/// Query parameters for the recommend endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
    #[serde(default = "default_n")]
    pub n: usize,
}

fn default_n() -> usize {
    5
}

/// Root endpoint, doubles as the front-end's liveness banner
pub async fn read_root() -> Json<Value> {
    Json(json!({ "message": "Movie Recommender API is running" }))
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Lists every title known to the similarity index, sorted for a stable
/// wire contract
pub async fn get_titles(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let catalog = state.catalog()?;

    let mut titles: Vec<String> = catalog.index.keys().cloned().collect();
    titles.sort();

    Ok(Json(titles))
}

/// Returns the top-n most similar titles for a query title, enriched with
/// TMDB poster and overview data
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let catalog = state.catalog()?;

    let recommendations = recommender::recommend(
        catalog,
        &state.id_map,
        state.provider.as_ref(),
        &params.title,
        params.n,
    )
    .await?;

    Ok(Json(recommendations))
}
