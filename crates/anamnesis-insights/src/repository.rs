use std::collections::HashMap;

use tokio::sync::Mutex;

use anamnesis_core::models::insight::Insight;

use crate::error::RepositoryError;
use crate::BoxFuture;

/// Persistence for insight rows.
///
/// Implementations must enforce uniqueness of `(tenant_id, session_id)`:
/// a second `create` for the same pair fails with
/// [`RepositoryError::Conflict`] and leaves the first row untouched.
pub trait InsightRepository: Send + Sync {
    fn find_by_session<'a>(
        &'a self,
        tenant_id: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>>;

    /// Any insight of this tenant derived from identical answer content.
    fn find_by_hash<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>>;

    fn create<'a>(&'a self, insight: &'a Insight) -> BoxFuture<'a, Result<(), RepositoryError>>;
}

#[derive(Default)]
struct Rows {
    insights: Vec<Insight>,
    by_session: HashMap<(String, String), usize>,
    by_hash: HashMap<(String, String), usize>,
}

/// Insight rows held in process: an append-only arena plus unique indexes.
#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<Rows>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.insights.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All rows for a tenant, in insertion order.
    pub async fn list_for_tenant(&self, tenant_id: &str) -> Vec<Insight> {
        self.rows
            .lock()
            .await
            .insights
            .iter()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect()
    }
}

impl InsightRepository for MemoryRepository {
    fn find_by_session<'a>(
        &'a self,
        tenant_id: &'a str,
        session_id: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>> {
        Box::pin(async move {
            let rows = self.rows.lock().await;
            let key = (tenant_id.to_string(), session_id.to_string());
            Ok(rows.by_session.get(&key).map(|&i| rows.insights[i].clone()))
        })
    }

    fn find_by_hash<'a>(
        &'a self,
        tenant_id: &'a str,
        answers_hash: &'a str,
    ) -> BoxFuture<'a, Result<Option<Insight>, RepositoryError>> {
        Box::pin(async move {
            let rows = self.rows.lock().await;
            let key = (tenant_id.to_string(), answers_hash.to_string());
            Ok(rows.by_hash.get(&key).map(|&i| rows.insights[i].clone()))
        })
    }

    fn create<'a>(&'a self, insight: &'a Insight) -> BoxFuture<'a, Result<(), RepositoryError>> {
        Box::pin(async move {
            let mut rows = self.rows.lock().await;
            let session_key = (insight.tenant_id.clone(), insight.session_id.clone());
            if rows.by_session.contains_key(&session_key) {
                return Err(RepositoryError::Conflict {
                    tenant_id: insight.tenant_id.clone(),
                    session_id: insight.session_id.clone(),
                });
            }

            let index = rows.insights.len();
            rows.insights.push(insight.clone());
            rows.by_session.insert(session_key, index);
            if let Some(hash) = &insight.answers_hash {
                rows.by_hash
                    .insert((insight.tenant_id.clone(), hash.clone()), index);
            }
            Ok(())
        })
    }
}
