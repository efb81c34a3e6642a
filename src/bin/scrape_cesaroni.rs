//! Scrape motor delay values from the Cesaroni (pro38.com) website into the
//! local cache file used by the delay-correction rules.
//!
//! The pro38 site cannot handle concurrent load, so every request is issued
//! one at a time, each waiting for the previous response. Designations
//! already present in the cache file are skipped without refetching.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use thrustdb::config::AppConfig;

const MOTOR_PAGES: [&str; 4] = [
    "http://www.pro38.com/products/pro24/motor.php",
    "http://www.pro38.com/products/pro29/motor.php",
    "http://www.pro38.com/products/pro38/motor.php",
    "http://www.pro38.com/products/pro54/motor.php",
];

static DETAIL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href=['"]?(MotorData\.php[^'" >]*)"#).unwrap());

// Delay strings live in the TD following one labeled "Delays ...".
// NOTE: Figuring out this incantation took a bit of trial and error. It may
// be a bit brittle.
static DELAY_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Delays[^<]*</td>\s*<td[^>]*>([^<]*)</td>").unwrap());

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = AppConfig::from_env()?;
    let cache_path = Path::new(&config.cesaroni_cache_path);

    // BTreeMap keeps the cache file diff-friendly
    let mut delays: BTreeMap<String, String> = fs::read_to_string(cache_path)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default();
    info!("Loaded {} cached delay entries", delays.len());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent("thrustdb/0.1")
        .build()?;

    for page in MOTOR_PAGES {
        let Some(summary) = fetch(&client, page).await else {
            continue;
        };
        let base = page.trim_end_matches("motor.php");

        // Collect detail links first so the borrow of the summary body ends
        // before the per-detail requests start.
        let detail_urls: Vec<String> = DETAIL_LINK
            .captures_iter(&summary)
            .map(|caps| format!("{base}motor/{}", &caps[1]))
            .collect();

        for detail_url in detail_urls {
            let Some(name) = detail_url.split("prodid=").nth(1).map(str::to_string) else {
                continue;
            };
            if delays.contains_key(&name) {
                info!("Skipping {detail_url} (cached)");
                continue;
            }

            let Some(body) = fetch(&client, &detail_url).await else {
                continue;
            };
            let Some(caps) = DELAY_CELL.captures(&body) else {
                warn!("No delay cell found at {detail_url}");
                continue;
            };
            delays.insert(name, caps[1].trim().to_string());
        }
    }

    if let Some(parent) = cache_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(cache_path, serde_json::to_string_pretty(&delays)? + "\n")
        .with_context(|| format!("writing {}", cache_path.display()))?;
    info!("Wrote {} delay entries to {}", delays.len(), cache_path.display());

    Ok(())
}

/// HTTP GET something. Page-level failures are tolerated: log and move on.
async fn fetch(client: &reqwest::Client, url: &str) -> Option<String> {
    info!("Fetching {url}");
    let resp = match client.get(url).send().await.and_then(|r| r.error_for_status()) {
        Ok(resp) => resp,
        Err(err) => {
            warn!("{url}: {err}");
            return None;
        }
    };
    match resp.text().await {
        Ok(body) => Some(body),
        Err(err) => {
            warn!("{url}: {err}");
            None
        }
    }
}
