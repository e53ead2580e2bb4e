use serde::{Deserialize, Serialize};

/// One row of the catalog record table.
///
/// Row order is the join key shared with the feature matrix and the title
/// index: record `i` describes the item whose features live in matrix row `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub title: String,
}

/// A single recommended movie returned to the client.
///
/// `poster` and `overview` are always populated; enrichment failures are
/// collapsed into placeholder content before this struct is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub poster: String,
    pub overview: String,
    /// TMDB id, absent when the title is not in the metadata mapping
    pub id: Option<u64>,
}

/// Poster/overview pair produced by an enrichment lookup
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub poster: String,
    pub overview: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw TMDB movie details response, reduced to the fields we consume
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}
