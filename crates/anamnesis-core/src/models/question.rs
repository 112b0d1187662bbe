use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single question within a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Question {
    /// Unique within the owning template.
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    /// Ordered choices. Required iff the type is `single` or `multiple`.
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Top of the answer scale for numeric answers; the bottom is 0.
    /// Defaults to [`DEFAULT_SCALE_MAX`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_rule: Option<VisibilityRule>,
}

/// Numeric answers are read on a 0–10 scale unless a question says otherwise.
pub const DEFAULT_SCALE_MAX: f64 = 10.0;

impl Question {
    pub fn scale_max(&self) -> f64 {
        self.scale_max.unwrap_or(DEFAULT_SCALE_MAX)
    }

    /// Case-insensitive tag match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionType {
    /// Free-form text.
    Text,
    /// A numeric answer.
    Number,
    /// Exactly one of `options`.
    Single,
    /// Any subset of `options`.
    Multiple,
    /// `negative` / `neutral` / `positive`, or a polarity in [-1, 1].
    Sentiment,
}

impl QuestionType {
    pub fn requires_options(self) -> bool {
        matches!(self, QuestionType::Single | QuestionType::Multiple)
    }
}

/// Show a question only when a prior answer satisfies a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisibilityRule {
    pub depends_on_question_id: String,
    pub operator: ComparisonOperator,
    pub comparison_value: ComparisonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComparisonOperator {
    Equals,
    IsIn,
}

/// A scalar or list comparison operand. A scalar behaves as a singleton set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ComparisonValue {
    One(String),
    Many(Vec<String>),
}

impl ComparisonValue {
    pub fn values(&self) -> &[String] {
        match self {
            ComparisonValue::One(v) => std::slice::from_ref(v),
            ComparisonValue::Many(vs) => vs,
        }
    }

    /// The operator a bare `if_value` implies: equality for a scalar,
    /// membership for a list.
    pub fn implied_operator(&self) -> ComparisonOperator {
        match self {
            ComparisonValue::One(_) => ComparisonOperator::Equals,
            ComparisonValue::Many(_) => ComparisonOperator::IsIn,
        }
    }
}

impl From<&str> for ComparisonValue {
    fn from(value: &str) -> Self {
        ComparisonValue::One(value.to_string())
    }
}

impl From<Vec<&str>> for ComparisonValue {
    fn from(values: Vec<&str>) -> Self {
        ComparisonValue::Many(values.into_iter().map(str::to_string).collect())
    }
}
