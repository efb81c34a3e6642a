/// Main application entry point
use std::io::Write;
use std::path::Path;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use thrustdb::clients::ThrustCurveClient;
use thrustdb::config::AppConfig;
use thrustdb::corrections::load_delay_cache;
use thrustdb::services::normalize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let client = ThrustCurveClient::new(config.catalog_base_url.clone(), config.max_results)?;

    // The two listings are independent reads, so fetch them together. The
    // samples download depends on the full id list and must wait.
    let (all, available) = tokio::try_join!(
        client.fetch_all_motors(),
        client.fetch_available_motors(),
    )?;
    info!(
        "Received {} motors, {} available motors",
        all.len(),
        available.len()
    );

    let motor_ids: Vec<String> = all.iter().map(|m| m.motor_id.clone()).collect();
    let sample_sets = client.fetch_thrust_samples(&motor_ids).await?;
    info!("Received {} thrust sample sets", sample_sets.len());

    let scraped = load_delay_cache(Path::new(&config.cesaroni_cache_path));
    let catalog = normalize(all, available, sample_sets, &scraped);
    info!(
        "Normalized {} motors with {} data-quality warnings",
        catalog.motors.len(),
        catalog.warnings.len()
    );

    let json = serde_json::to_string_pretty(&catalog.motors)?;
    match &config.output_path {
        Some(path) => {
            std::fs::write(path, json + "\n")?;
            info!("Wrote dataset to {path}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
