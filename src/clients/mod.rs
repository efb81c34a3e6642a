/// External API clients module
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Motor, RawSampleSet};
use crate::errors::{CatalogError, CatalogResult};

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("thrustdb/0.1")
            .build()?;
        Ok(Self { client })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Motor>,
}

#[derive(Deserialize)]
struct DownloadResponse {
    #[serde(default)]
    results: Vec<RawSampleSet>,
}

/// ThrustCurve catalog API client
pub struct ThrustCurveClient {
    http_client: HttpClient,
    base_url: String,
    max_results: u64,
}

impl ThrustCurveClient {
    pub fn new(base_url: String, max_results: u64) -> CatalogResult<Self> {
        Ok(Self {
            http_client: HttpClient::new()?,
            base_url,
            max_results,
        })
    }

    /// Fetch the full motor listing
    pub async fn fetch_all_motors(&self) -> CatalogResult<Vec<Motor>> {
        self.search(None).await
    }

    /// Fetch the currently-available motor listing
    pub async fn fetch_available_motors(&self) -> CatalogResult<Vec<Motor>> {
        self.search(Some("available")).await
    }

    async fn search(&self, availability: Option<&str>) -> CatalogResult<Vec<Motor>> {
        let url = format!("{}/search.json", self.base_url);
        let mut req = self
            .http_client
            .get_client()
            .get(&url)
            .query(&[("maxResults", self.max_results.to_string())]);
        if let Some(availability) = availability {
            req = req.query(&[("availability", availability)]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(CatalogError::Api(format!(
                "search request failed with status {}",
                resp.status()
            )));
        }

        let body: SearchResponse = resp.json().await?;
        Ok(body.results)
    }

    /// Fetch thrust-curve sample sets for the given motor ids
    pub async fn fetch_thrust_samples(
        &self,
        motor_ids: &[String],
    ) -> CatalogResult<Vec<RawSampleSet>> {
        let url = format!("{}/download.json", self.base_url);
        let resp = self
            .http_client
            .get_client()
            .post(&url)
            .json(&json!({ "motorIds": motor_ids, "data": "samples" }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CatalogError::Api(format!(
                "download request failed with status {}",
                resp.status()
            )));
        }

        let body: DownloadResponse = resp.json().await?;
        Ok(body.results)
    }
}
