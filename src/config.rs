use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key; enrichment degrades to placeholder content without it
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL poster paths are appended to
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Directory holding the precomputed catalog artifacts
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: String,

    /// Path to the bulk movie metadata CSV used for the TMDB id mapping
    #[serde(default = "default_metadata_csv_path")]
    pub metadata_csv_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_artifacts_dir() -> String {
    "artifacts".to_string()
}

fn default_metadata_csv_path() -> String {
    "dataset/movies_metadata.csv".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
