use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::insight::InsightPayload;
use anamnesis_core::models::template::TemplateSchema;

use crate::error::GeneratorError;
use crate::generators::mock_varied::MockVariedGenerator;
use crate::generators::rule_based::RuleBasedGenerator;

/// Trait implemented by each insight strategy.
pub trait InsightGenerator: Send + Sync {
    /// Unique identifier for this strategy (e.g., "rule_based").
    fn id(&self) -> &str;

    /// Produce a summary, risk scores and recommendations for the answers.
    fn generate(
        &self,
        schema: &TemplateSchema,
        answers: &AnswerSet,
    ) -> Result<InsightPayload, GeneratorError>;

    /// Whether identical `(template, answers)` input always yields the same
    /// payload. Only cacheable output is shared between sessions.
    fn cacheable(&self) -> bool {
        true
    }
}

/// Strategy selection, as written in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    RuleBased,
    MockVaried,
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rule_based" => Ok(GeneratorKind::RuleBased),
            "mock_varied" => Ok(GeneratorKind::MockVaried),
            other => Err(format!("unknown generator: {other}")),
        }
    }
}

/// Build the configured strategy.
pub fn generator_for(kind: GeneratorKind) -> Arc<dyn InsightGenerator> {
    match kind {
        GeneratorKind::RuleBased => Arc::new(RuleBasedGenerator),
        GeneratorKind::MockVaried => Arc::new(MockVariedGenerator),
    }
}
