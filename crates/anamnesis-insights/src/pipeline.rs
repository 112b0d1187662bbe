use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::insight::{Insight, InsightPayload};
use anamnesis_core::models::template::TemplateSchema;
use anamnesis_engine::answers_hash;

use crate::cache::{InsightCache, DEFAULT_CACHE_TTL};
use crate::error::{GeneratorError, PipelineError, RepositoryError};
use crate::generator::InsightGenerator;
use crate::repository::InsightRepository;

/// Where a derived insight's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSource {
    /// The session already had an insight; returned unchanged.
    Existing,
    /// Payload reused from the cache.
    Cache,
    /// Payload reused from another session's persisted insight.
    Repository,
    /// Payload freshly produced by the generator.
    Generated,
}

/// The outcome of a derivation.
#[derive(Debug, Clone, Serialize)]
pub struct Derivation {
    pub insight: Insight,
    pub source: InsightSource,
}

/// Orchestrates insight derivation for completed sessions.
///
/// Each distinct answer content is generated at most once per tenant while
/// its insight remains findable, and each session gets exactly one row.
pub struct InsightPipeline {
    generator: Arc<dyn InsightGenerator>,
    cache: Arc<dyn InsightCache>,
    repository: Arc<dyn InsightRepository>,
    cache_ttl: Duration,
}

impl InsightPipeline {
    pub fn new(
        generator: Arc<dyn InsightGenerator>,
        cache: Arc<dyn InsightCache>,
        repository: Arc<dyn InsightRepository>,
    ) -> Self {
        Self {
            generator,
            cache,
            repository,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Derive (or return the existing) insight for a session.
    pub async fn derive_insight(
        &self,
        tenant_id: &str,
        session_id: &str,
        schema: &TemplateSchema,
        answers: &AnswerSet,
    ) -> Result<Insight, PipelineError> {
        Ok(self
            .derive(tenant_id, session_id, schema, answers)
            .await?
            .insight)
    }

    /// Like [`derive_insight`](Self::derive_insight), also reporting where
    /// the content came from.
    pub async fn derive(
        &self,
        tenant_id: &str,
        session_id: &str,
        schema: &TemplateSchema,
        answers: &AnswerSet,
    ) -> Result<Derivation, PipelineError> {
        let hash = answers_hash(schema, answers);

        // 1. A session's insight is never recomputed.
        if let Some(existing) = self.repository.find_by_session(tenant_id, session_id).await? {
            info!(tenant_id, session_id, insight_id = %existing.id, "insight already exists for session");
            return Ok(Derivation {
                insight: existing,
                source: InsightSource::Existing,
            });
        }

        let cacheable = self.generator.cacheable();

        // 2. Reuse content derived from identical answers.
        let reused = if cacheable {
            self.reuse(tenant_id, &hash).await?
        } else {
            None
        };

        // 3. Otherwise generate.
        let (payload, source) = match reused {
            Some(found) => found,
            None => {
                let payload = self.generator.generate(schema, answers)?;
                payload.validate().map_err(GeneratorError::from)?;
                (payload, InsightSource::Generated)
            }
        };

        let insight = Insight::new(
            tenant_id,
            session_id,
            payload,
            cacheable.then(|| hash.clone()),
        );

        // 4. Persist. Losing a concurrent create means the winner's row is the answer.
        match self.repository.create(&insight).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict { .. }) => {
                warn!(tenant_id, session_id, "concurrent insight create lost; returning existing row");
                return match self.repository.find_by_session(tenant_id, session_id).await? {
                    Some(winner) => Ok(Derivation {
                        insight: winner,
                        source: InsightSource::Existing,
                    }),
                    None => Err(PipelineError::UnresolvedConflict {
                        tenant_id: tenant_id.to_string(),
                        session_id: session_id.to_string(),
                    }),
                };
            }
            Err(e) => return Err(e.into()),
        }

        if cacheable && source != InsightSource::Cache {
            self.write_cache(tenant_id, &hash, insight.payload()).await;
        }

        info!(
            tenant_id,
            session_id,
            insight_id = %insight.id,
            answers_hash = %hash,
            generator = self.generator.id(),
            source = ?source,
            risk_level = %insight.risk_level(),
            "insight derived"
        );

        Ok(Derivation { insight, source })
    }

    async fn reuse(
        &self,
        tenant_id: &str,
        hash: &str,
    ) -> Result<Option<(InsightPayload, InsightSource)>, PipelineError> {
        match self.cache.get(tenant_id, hash).await {
            Ok(Some(payload)) => return Ok(Some((payload, InsightSource::Cache))),
            Ok(None) => {}
            Err(e) => warn!(tenant_id, answers_hash = hash, error = %e, "cache lookup failed; treating as miss"),
        }

        Ok(self
            .repository
            .find_by_hash(tenant_id, hash)
            .await?
            .map(|matched| (matched.payload(), InsightSource::Repository)))
    }

    async fn write_cache(&self, tenant_id: &str, hash: &str, payload: InsightPayload) {
        if let Err(e) = self.cache.set(tenant_id, hash, payload, self.cache_ttl).await {
            warn!(tenant_id, answers_hash = hash, error = %e, "cache write failed");
        }
    }
}
