use std::collections::HashMap;
use std::time::Duration;

use anamnesis_cli::config::{
    apply_overrides, load_config, log_json_hint, migrate, parse_config, save_config, AnamnesisConfig,
    CacheConfig, StorageConfig, CURRENT_VERSION,
};
use anamnesis_insights::GeneratorKind;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_document_yields_defaults() {
    let config = parse_config(r#"{ "config_version": 1 }"#).unwrap();
    assert_eq!(config, AnamnesisConfig::default());
    assert_eq!(config.cache.ttl(), Duration::from_secs(24 * 60 * 60));
}

#[test]
fn v0_cache_ttl_becomes_cache_section() {
    let config = parse_config(r#"{ "generator": "mock_varied", "cache_ttl_seconds": 600 }"#).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.generator, GeneratorKind::MockVaried);
    assert_eq!(
        config.cache,
        CacheConfig::Memory {
            ttl_seconds: 600,
            max_entries: None
        }
    );
}

#[test]
fn v0_zero_ttl_disables_cache() {
    let config = parse_config(r#"{ "cache_ttl_seconds": 0 }"#).unwrap();
    assert_eq!(config.cache, CacheConfig::Disabled);
    assert_eq!(config.cache.ttl(), Duration::ZERO);
}

#[test]
fn v0_explicit_cache_section_wins_over_legacy_field() {
    let json = serde_json::json!({
        "cache_ttl_seconds": 600,
        "cache": { "type": "disabled" }
    });
    let migrated = migrate(json, 0).unwrap();
    assert_eq!(migrated["cache"]["type"], "disabled");
    assert!(migrated.get("cache_ttl_seconds").is_none());
    assert_eq!(migrated["config_version"], 1);
}

#[test]
fn newer_version_is_refused() {
    let err = parse_config(r#"{ "config_version": 99 }"#).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_config_is_rejected() {
    assert!(parse_config("[1, 2, 3]").is_err());
}

#[test]
fn s3_storage_parses_with_optional_region() {
    let config = parse_config(
        r#"{ "config_version": 1, "storage": { "type": "s3", "bucket": "acme-insights" } }"#,
    )
    .unwrap();
    assert_eq!(
        config.storage,
        StorageConfig::S3 {
            bucket: "acme-insights".into(),
            region: None
        }
    );
}

#[test]
fn bucket_override_switches_to_s3_and_keeps_region() {
    let mut config = AnamnesisConfig {
        storage: StorageConfig::S3 {
            bucket: "old".into(),
            region: Some("eu-west-1".into()),
        },
        ..AnamnesisConfig::default()
    };
    apply_overrides(&mut config, env(&[("ANAMNESIS_BUCKET", "new")])).unwrap();
    assert_eq!(
        config.storage,
        StorageConfig::S3 {
            bucket: "new".into(),
            region: Some("eu-west-1".into())
        }
    );

    let mut config = AnamnesisConfig::default();
    apply_overrides(&mut config, env(&[("ANAMNESIS_BUCKET", "fresh")])).unwrap();
    assert_eq!(
        config.storage,
        StorageConfig::S3 {
            bucket: "fresh".into(),
            region: None
        }
    );
}

#[test]
fn generator_override_accepts_hyphenated_names() {
    let mut config = AnamnesisConfig::default();
    apply_overrides(&mut config, env(&[("ANAMNESIS_GENERATOR", "mock-varied")])).unwrap();
    assert_eq!(config.generator, GeneratorKind::MockVaried);
}

#[test]
fn unknown_generator_override_is_an_error() {
    let mut config = AnamnesisConfig::default();
    let err = apply_overrides(&mut config, env(&[("ANAMNESIS_GENERATOR", "llm")])).unwrap_err();
    assert!(err.to_string().contains("ANAMNESIS_GENERATOR"));
}

#[test]
fn empty_overrides_are_ignored() {
    let mut config = AnamnesisConfig::default();
    apply_overrides(
        &mut config,
        env(&[("ANAMNESIS_BUCKET", ""), ("ANAMNESIS_GENERATOR", "")]),
    )
    .unwrap();
    assert_eq!(config, AnamnesisConfig::default());
}

#[test]
fn saved_config_is_stamped_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = AnamnesisConfig {
        config_version: 0,
        generator: GeneratorKind::MockVaried,
        cache: CacheConfig::Memory {
            ttl_seconds: 60,
            max_entries: Some(10),
        },
        storage: StorageConfig::Memory,
        log_json: true,
    };
    save_config(&config, &path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["config_version"], CURRENT_VERSION);
    assert!(!path.with_extension("json.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let reloaded = parse_config(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(reloaded.generator, GeneratorKind::MockVaried);
    assert_eq!(reloaded.cache, config.cache);
    assert!(reloaded.log_json);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(Some(&dir.path().join("absent.json"))).unwrap();
    assert_eq!(config.cache, CacheConfig::default());
}

#[test]
fn log_json_hint_reads_the_raw_file() {
    let dir = tempfile::tempdir().unwrap();

    let json_logs = dir.path().join("json.json");
    std::fs::write(&json_logs, r#"{ "log_json": true, "cache_ttl_seconds": 60 }"#).unwrap();
    assert!(log_json_hint(Some(&json_logs)));

    let plain = dir.path().join("plain.json");
    std::fs::write(&plain, r#"{ "config_version": 1 }"#).unwrap();
    assert!(!log_json_hint(Some(&plain)));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert!(!log_json_hint(Some(&broken)));

    assert!(!log_json_hint(Some(&dir.path().join("absent.json"))));
}
