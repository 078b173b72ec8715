use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use semaforo_cli::config::{self, SemaforoConfig, StoreBackend};
use semaforo_cli::replay::{self, Scenario};
use semaforo_engine::{EventIntake, IndicatorEngine, RetryPolicy};
use semaforo_storage::memory::MemoryStore;
use semaforo_storage::s3::S3Store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging on stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args: Vec<String> = env::args().collect();
    let config_path = config::config_path(&args, env::var(config::CONFIG_ENV).ok());
    let config = config::resolve(config_path.as_deref(), env::var(config::BUCKET_ENV).ok())?;
    tracing::info!(store = ?config.store, max_attempts = config.max_attempts, "config resolved");

    let scenario_path = scenario_path(&args)
        .ok_or_else(|| eyre::eyre!("usage: semaforo [--config <path>] <scenario.json>"))?;
    let scenario = replay::load_scenario(&scenario_path)?;

    let intake = build_intake(&config, &scenario).await?;
    let report = replay::replay(&intake, &scenario.events).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// First positional argument that is not the value of `--config`.
fn scenario_path(args: &[String]) -> Option<PathBuf> {
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            rest.next();
        } else {
            return Some(PathBuf::from(arg));
        }
    }
    None
}

/// Build the store named by the config and seed it with the scenario's
/// patients and episodes.
async fn build_intake(config: &SemaforoConfig, scenario: &Scenario) -> eyre::Result<EventIntake> {
    let policy = RetryPolicy {
        max_attempts: config.max_attempts,
    };

    let engine = match &config.store {
        StoreBackend::Memory => {
            let store = Arc::new(MemoryStore::new());
            for patient in &scenario.patients {
                store.insert_patient(patient.clone()).await;
            }
            for episode in &scenario.episodes {
                store.insert_episode(episode.clone()).await;
            }
            IndicatorEngine::new(store.clone(), store)
        }
        StoreBackend::S3 { bucket, region } => {
            let client = match region {
                Some(region) => semaforo_storage::client::build_client_for_region(region).await,
                None => semaforo_storage::client::build_client().await,
            };
            let store = Arc::new(S3Store::new(client, bucket.clone()));
            for patient in &scenario.patients {
                store.put_patient(patient).await?;
            }
            for episode in &scenario.episodes {
                store.put_episode(episode).await?;
            }
            IndicatorEngine::new(store.clone(), store)
        }
    };

    Ok(EventIntake::new(engine, policy))
}
