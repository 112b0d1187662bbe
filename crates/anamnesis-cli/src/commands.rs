use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::selection::NextQuestionResult;
use anamnesis_core::models::template::TemplateSchema;
use anamnesis_engine::answers::validate_answers;
use anamnesis_engine::{answers_hash, progress, select_next_question, validate_template};
use anamnesis_insights::{
    generator_for, Derivation, InsightCache, InsightPipeline, InsightRepository, MemoryCache,
    MemoryRepository, NoopCache, S3InsightRepository,
};

use crate::config::{AnamnesisConfig, CacheConfig, StorageConfig};

/// Read and structurally validate a template file.
pub fn load_template(path: &Path) -> eyre::Result<TemplateSchema> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read template {}: {e}", path.display()))?;
    let schema = TemplateSchema::from_json(&contents)?;
    validate_template(&schema)?;
    Ok(schema)
}

pub fn load_answers(path: &Path) -> eyre::Result<AnswerSet> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read answers {}: {e}", path.display()))?;
    Ok(AnswerSet::from_json(&contents)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateReport {
    pub valid: bool,
    pub questions: usize,
    pub conditional_rules: usize,
}

pub fn validate(schema: &TemplateSchema) -> eyre::Result<TemplateReport> {
    validate_template(schema)?;
    Ok(TemplateReport {
        valid: true,
        questions: schema.questions.len(),
        conditional_rules: schema.conditional_logic.len(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct NextReport {
    #[serde(flatten)]
    pub result: NextQuestionResult,
    pub required_remaining: usize,
}

/// Answers are checked against their questions before selection.
pub fn next(schema: &TemplateSchema, answers: &AnswerSet) -> eyre::Result<NextReport> {
    validate_answers(schema, answers)?;
    let result = select_next_question(schema, answers);
    if result.is_complete() {
        tracing::info!(answered = result.answered_count, "questionnaire complete");
    }
    let required_remaining = progress(schema, answers).required_remaining;
    Ok(NextReport {
        result,
        required_remaining,
    })
}

pub fn hash(schema: &TemplateSchema, answers: &AnswerSet) -> String {
    answers_hash(schema, answers)
}

/// Wire the pipeline's generator, cache and repository from config.
pub async fn build_pipeline(config: &AnamnesisConfig) -> InsightPipeline {
    let generator = generator_for(config.generator);

    let cache: Arc<dyn InsightCache> = match &config.cache {
        CacheConfig::Disabled => Arc::new(NoopCache),
        CacheConfig::Memory {
            max_entries: Some(max),
            ..
        } => Arc::new(MemoryCache::with_capacity(*max)),
        CacheConfig::Memory {
            max_entries: None, ..
        } => Arc::new(MemoryCache::new()),
    };

    let repository: Arc<dyn InsightRepository> = match &config.storage {
        StorageConfig::Memory => Arc::new(MemoryRepository::new()),
        StorageConfig::S3 { bucket, region } => {
            let s3 = match region {
                Some(region) => anamnesis_storage::client::build_client_with_region(region).await,
                None => anamnesis_storage::client::build_client().await,
            };
            Arc::new(S3InsightRepository::new(s3, bucket.clone()))
        }
    };

    tracing::debug!(
        generator = generator.id(),
        cache = ?config.cache,
        storage = ?config.storage,
        "pipeline configured"
    );

    InsightPipeline::new(generator, cache, repository).with_cache_ttl(config.cache.ttl())
}

pub async fn derive(
    pipeline: &InsightPipeline,
    tenant_id: &str,
    session_id: &str,
    schema: &TemplateSchema,
    answers: &AnswerSet,
) -> eyre::Result<Derivation> {
    validate_answers(schema, answers)?;
    Ok(pipeline
        .derive(tenant_id, session_id, schema, answers)
        .await?)
}
