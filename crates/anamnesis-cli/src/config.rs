use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use anamnesis_insights::{GeneratorKind, DEFAULT_CACHE_TTL};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const BUCKET_ENV: &str = "ANAMNESIS_BUCKET";
pub const GENERATOR_ENV: &str = "ANAMNESIS_GENERATOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnamnesisConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub generator: GeneratorKind,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Emit logs as JSON lines instead of the human-readable format.
    #[serde(default)]
    pub log_json: bool,
}

impl Default for AnamnesisConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            generator: GeneratorKind::default(),
            cache: CacheConfig::default(),
            storage: StorageConfig::default(),
            log_json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheConfig {
    Disabled,
    Memory {
        ttl_seconds: u64,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        max_entries: Option<usize>,
    },
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig::Memory {
            ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
            max_entries: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        match self {
            CacheConfig::Disabled => Duration::ZERO,
            CacheConfig::Memory { ttl_seconds, .. } => Duration::from_secs(*ttl_seconds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Process-local; insights vanish when the command exits.
    #[default]
    Memory,
    S3 {
        bucket: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        region: Option<String>,
    },
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("anamnesis"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

fn resolve_path(path: Option<&Path>) -> eyre::Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path(),
    }
}

/// The raw `log_json` flag of the config file, read before logging is up.
/// Any problem with the file reads as `false`; [`load_config`] reports it.
pub fn log_json_hint(path: Option<&Path>) -> bool {
    resolve_path(path)
        .ok()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|contents| serde_json::from_str::<serde_json::Value>(&contents).ok())
        .and_then(|json| json.get("log_json").and_then(serde_json::Value::as_bool))
        .unwrap_or(false)
}

/// Load the config from `path` (or the default location), falling back to
/// defaults when no file exists. Environment overrides are applied last.
pub fn load_config(path: Option<&Path>) -> eyre::Result<AnamnesisConfig> {
    let path = resolve_path(path)?;

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
        parse_config(&contents)?
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        AnamnesisConfig::default()
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

/// Parse a config document, migrating older shapes first.
pub fn parse_config(contents: &str) -> eyre::Result<AnamnesisConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: AnamnesisConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: flat `cache_ttl_seconds` becomes the `cache` section
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(legacy) = obj.remove("cache_ttl_seconds") {
            let ttl_seconds = legacy
                .as_u64()
                .ok_or_else(|| eyre::eyre!("cache_ttl_seconds must be a non-negative integer"))?;
            let cache = if ttl_seconds == 0 {
                serde_json::json!({ "type": "disabled" })
            } else {
                serde_json::json!({ "type": "memory", "ttl_seconds": ttl_seconds })
            };
            obj.entry("cache").or_insert(cache);
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (cache section)");
    }

    Ok(json)
}

/// Apply `ANAMNESIS_BUCKET` and `ANAMNESIS_GENERATOR` on top of the file.
pub fn apply_overrides<F>(config: &mut AnamnesisConfig, lookup: F) -> eyre::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(bucket) = lookup(BUCKET_ENV).filter(|b| !b.is_empty()) {
        let region = match &config.storage {
            StorageConfig::S3 { region, .. } => region.clone(),
            StorageConfig::Memory => None,
        };
        tracing::debug!(%bucket, "storage overridden from environment");
        config.storage = StorageConfig::S3 { bucket, region };
    }

    if let Some(generator) = lookup(GENERATOR_ENV).filter(|g| !g.is_empty()) {
        config.generator = generator
            .parse()
            .map_err(|e| eyre::eyre!("{GENERATOR_ENV}: {e}"))?;
    }

    Ok(())
}

/// Write the config atomically, stamped with the current version.
pub fn save_config(config: &AnamnesisConfig, path: &Path) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
