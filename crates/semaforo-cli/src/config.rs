use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const CONFIG_ENV: &str = "SEMAFORO_CONFIG";
pub const BUCKET_ENV: &str = "SEMAFORO_BUCKET";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaforoConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub store: StoreBackend,
    /// Attempts per event before a version conflict is reported.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for SemaforoConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            store: StoreBackend::default(),
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    S3 {
        bucket: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        region: Option<String>,
    },
}

fn default_max_attempts() -> u32 {
    semaforo_engine::RetryPolicy::DEFAULT_MAX_ATTEMPTS
}

/// `--config <path>` from the arguments, else `SEMAFORO_CONFIG`.
pub fn config_path(args: &[String], env_value: Option<String>) -> Option<PathBuf> {
    args.iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .or_else(|| env_value.map(PathBuf::from))
}

/// Resolve the effective config. No path means in-memory defaults.
pub fn resolve(path: Option<&Path>, bucket_override: Option<String>) -> eyre::Result<SemaforoConfig> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => SemaforoConfig::default(),
    };
    Ok(apply_bucket_override(config, bucket_override))
}

pub fn load_config(path: &Path) -> eyre::Result<SemaforoConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> eyre::Result<SemaforoConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let migrated = migrate(json, on_disk_version)?;
    let config: SemaforoConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update semaforo."
        ));
    }

    // v0 → v1: top-level `bucket`/`region` become a tagged `store`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(bucket) = obj.remove("bucket") {
            let mut store = serde_json::Map::new();
            store.insert("type".to_string(), "s3".into());
            store.insert("bucket".to_string(), bucket);
            if let Some(region) = obj.remove("region") {
                store.insert("region".to_string(), region);
            }
            obj.insert("store".to_string(), serde_json::Value::Object(store));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (tagged store)");
    }

    Ok(json)
}

/// `SEMAFORO_BUCKET` selects S3 and wins over any configured bucket.
fn apply_bucket_override(mut config: SemaforoConfig, bucket: Option<String>) -> SemaforoConfig {
    let Some(bucket) = bucket.filter(|b| !b.is_empty()) else {
        return config;
    };
    config.store = match config.store {
        StoreBackend::S3 { region, .. } => StoreBackend::S3 { bucket, region },
        StoreBackend::Memory => StoreBackend::S3 {
            bucket,
            region: None,
        },
    };
    config
}
