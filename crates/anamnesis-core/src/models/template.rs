use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::{ComparisonValue, Question};
use crate::error::CoreError;

/// The declarative description of a questionnaire.
///
/// `questions` order is the default presentation priority. Loaded once per
/// derivation and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplateSchema {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub conditional_logic: Vec<ConditionalRule>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl TemplateSchema {
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|q| q.id.as_str())
    }
}

/// Template-level show rule: when `if_question_id`'s answer matches
/// `if_value`, every question in `then_show_question_ids` becomes visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConditionalRule {
    pub if_question_id: String,
    pub if_value: ComparisonValue,
    pub then_show_question_ids: Vec<String>,
}
