/// Application configuration module
use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog_base_url: String,
    pub max_results: u64,
    pub cesaroni_cache_path: String,
    pub output_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let catalog_base_url = env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "https://www.thrustcurve.org/api/v1".to_string());

        let max_results = env_u64("CATALOG_MAX_RESULTS", 9999);

        let cesaroni_cache_path = env::var("CESARONI_CACHE")
            .unwrap_or_else(|_| "data/cesaroni_delays.json".to_string());

        let output_path = env::var("OUTPUT_PATH").ok();

        Ok(Self {
            catalog_base_url,
            max_results,
            cesaroni_cache_path,
            output_path,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
