use anamnesis_core::models::insight::{Insight, InsightPayload, RiskScores};
use anamnesis_insights::{InsightRepository, MemoryRepository, RepositoryError};

fn insight(tenant: &str, session: &str, hash: Option<&str>) -> Insight {
    let payload = InsightPayload {
        summary: format!("summary for {session}"),
        risks: RiskScores {
            readiness: 60.0,
            dropout_risk: 20.0,
            stress: 30.0,
            sleep_quality: 70.0,
        },
        recommendations: vec!["Keep going.".to_string()],
    };
    Insight::new(tenant, session, payload, hash.map(str::to_string))
}

#[tokio::test]
async fn second_create_for_a_session_conflicts() {
    let repo = MemoryRepository::new();
    let first = insight("t1", "s1", Some("h1"));
    repo.create(&first).await.unwrap();

    let err = repo.create(&insight("t1", "s1", Some("h2"))).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Conflict { ref tenant_id, ref session_id }
            if tenant_id == "t1" && session_id == "s1"
    ));

    let stored = repo.find_by_session("t1", "s1").await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert!(repo.find_by_hash("t1", "h2").await.unwrap().is_none());
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn hash_lookup_is_tenant_scoped() {
    let repo = MemoryRepository::new();
    repo.create(&insight("t1", "s1", Some("same"))).await.unwrap();

    assert!(repo.find_by_hash("t1", "same").await.unwrap().is_some());
    assert!(repo.find_by_hash("t2", "same").await.unwrap().is_none());
    assert!(repo.find_by_session("t2", "s1").await.unwrap().is_none());
}

#[tokio::test]
async fn rows_without_hash_are_not_indexed_by_hash() {
    let repo = MemoryRepository::new();
    assert!(repo.is_empty().await);
    repo.create(&insight("t1", "s1", None)).await.unwrap();

    assert!(repo.find_by_session("t1", "s1").await.unwrap().is_some());
    assert!(!repo.is_empty().await);
}

#[tokio::test]
async fn listing_keeps_insertion_order_per_tenant() {
    let repo = MemoryRepository::new();
    repo.create(&insight("t1", "a", None)).await.unwrap();
    repo.create(&insight("t2", "b", None)).await.unwrap();
    repo.create(&insight("t1", "c", Some("h"))).await.unwrap();

    let sessions: Vec<String> = repo
        .list_for_tenant("t1")
        .await
        .into_iter()
        .map(|i| i.session_id)
        .collect();
    assert_eq!(sessions, vec!["a", "c"]);
    assert!(repo.list_for_tenant("t3").await.is_empty());
}
