use std::time::Duration;

use anamnesis_core::models::insight::{CachedInsight, RiskScores};
use anamnesis_insights::{InsightCache, MemoryCache, NoopCache, DEFAULT_CACHE_TTL};

fn payload(summary: &str) -> CachedInsight {
    CachedInsight {
        summary: summary.to_string(),
        risks: RiskScores {
            readiness: 50.0,
            dropout_risk: 50.0,
            stress: 50.0,
            sleep_quality: 50.0,
        },
        recommendations: vec!["Maintain the current plan.".to_string()],
    }
}

#[tokio::test]
async fn noop_cache_never_hits() {
    let cache = NoopCache;
    cache
        .set("t", "h", payload("x"), DEFAULT_CACHE_TTL)
        .await
        .expect("noop set succeeds");
    assert!(cache.get("t", "h").await.expect("noop get succeeds").is_none());
}

#[tokio::test]
async fn memory_cache_round_trips_per_tenant() {
    let cache = MemoryCache::new();
    cache
        .set("tenant-a", "h1", payload("a"), DEFAULT_CACHE_TTL)
        .await
        .expect("set succeeds");

    assert_eq!(
        cache.get("tenant-a", "h1").await.expect("get succeeds"),
        Some(payload("a"))
    );
    assert!(cache.get("tenant-b", "h1").await.expect("get succeeds").is_none());
    assert!(cache.get("tenant-a", "h2").await.expect("get succeeds").is_none());
}

#[tokio::test]
async fn expired_entries_miss_and_are_dropped() {
    let cache = MemoryCache::new();
    cache
        .set("t", "stale", payload("old"), Duration::ZERO)
        .await
        .expect("set succeeds");
    assert_eq!(cache.len().await, 1);

    assert!(cache.get("t", "stale").await.expect("get succeeds").is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn purge_removes_only_expired_entries() {
    let cache = MemoryCache::new();
    cache.set("t", "a", payload("a"), Duration::ZERO).await.expect("set");
    cache.set("t", "b", payload("b"), Duration::ZERO).await.expect("set");
    cache.set("t", "c", payload("c"), DEFAULT_CACHE_TTL).await.expect("set");

    assert_eq!(cache.purge_expired().await, 2);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn full_cache_evicts_soonest_expiry() {
    let cache = MemoryCache::with_capacity(2);
    cache
        .set("t", "short", payload("short"), Duration::from_secs(60))
        .await
        .expect("set");
    cache
        .set("t", "long", payload("long"), Duration::from_secs(3600))
        .await
        .expect("set");
    cache
        .set("t", "new", payload("new"), Duration::from_secs(600))
        .await
        .expect("set");

    assert_eq!(cache.len().await, 2);
    assert!(cache.get("t", "short").await.expect("get").is_none());
    assert!(cache.get("t", "long").await.expect("get").is_some());
    assert!(cache.get("t", "new").await.expect("get").is_some());
}

#[tokio::test]
async fn overwriting_a_key_does_not_evict() {
    let cache = MemoryCache::with_capacity(1);
    cache.set("t", "k", payload("one"), DEFAULT_CACHE_TTL).await.expect("set");
    cache.set("t", "k", payload("two"), DEFAULT_CACHE_TTL).await.expect("set");
    assert_eq!(cache.get("t", "k").await.expect("get"), Some(payload("two")));
}
