/// TMDB enrichment provider
///
/// Fetches poster and overview data for recommended titles. The provider
/// contract is deliberately infallible: callers assemble a fixed-shape
/// response list, so every failure mode collapses to placeholder content
/// here instead of surfacing as a service-level error.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::error::AppResult;
use crate::models::{MovieDetails, TmdbMovieDetails};

/// Hard per-call budget; a slow upstream degrades one item, not the request
const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub const POSTER_API_KEY_MISSING: &str =
    "https://via.placeholder.com/500x750?text=API+Key+Missing";
pub const POSTER_ERROR: &str = "https://via.placeholder.com/500x750?text=Error";
pub const POSTER_NO_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image";
pub const POSTER_NO_ID: &str = "https://via.placeholder.com/500x750?text=No+ID";

pub const OVERVIEW_API_KEY_MISSING: &str = "No overview (API Key Check Failed)";
pub const OVERVIEW_FETCH_ERROR: &str = "Error fetching data.";
pub const OVERVIEW_NOT_FOUND: &str = "Movie details not found.";
pub const OVERVIEW_FALLBACK: &str = "No overview available.";
pub const OVERVIEW_NO_ID: &str = "Movie ID not found in metadata.";

impl MovieDetails {
    /// Placeholder pair used by callers when a title has no known TMDB id
    pub fn no_id() -> Self {
        Self {
            poster: POSTER_NO_ID.to_string(),
            overview: OVERVIEW_NO_ID.to_string(),
        }
    }
}

/// Trait for movie metadata providers
///
/// `fetch_details` never fails; implementations own the full degradation
/// policy and always hand back a usable poster/overview pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_details(&self, movie_id: u64) -> MovieDetails;
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: Option<String>, api_url: String, image_url: String) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            image_url,
        })
    }

    /// Maps a successful TMDB payload to the response pair
    fn convert_details(&self, details: TmdbMovieDetails) -> MovieDetails {
        let overview = details
            .overview
            .unwrap_or_else(|| OVERVIEW_FALLBACK.to_string());

        match details.poster_path {
            Some(path) => MovieDetails {
                poster: format!("{}{}", self.image_url, path),
                overview,
            },
            None => MovieDetails {
                poster: POSTER_NO_IMAGE.to_string(),
                overview,
            },
        }
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_details(&self, movie_id: u64) -> MovieDetails {
        let api_key = match self.api_key.as_deref() {
            Some(key) => key,
            None => {
                return MovieDetails {
                    poster: POSTER_API_KEY_MISSING.to_string(),
                    overview: OVERVIEW_API_KEY_MISSING.to_string(),
                }
            }
        };

        let url = format!("{}/movie/{}", self.api_url, movie_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key), ("language", "en-US")])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "TMDB request failed");
                return MovieDetails {
                    poster: POSTER_ERROR.to_string(),
                    overview: OVERVIEW_FETCH_ERROR.to_string(),
                };
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                movie_id,
                status = %response.status(),
                "TMDB returned non-success status"
            );
            return MovieDetails {
                poster: POSTER_NO_IMAGE.to_string(),
                overview: OVERVIEW_NOT_FOUND.to_string(),
            };
        }

        match response.json::<TmdbMovieDetails>().await {
            Ok(details) => self.convert_details(details),
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Failed to read TMDB response body");
                MovieDetails {
                    poster: POSTER_ERROR.to_string(),
                    overview: OVERVIEW_FETCH_ERROR.to_string(),
                }
            }
        }
    }
}
