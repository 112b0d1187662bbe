//! Normalised visibility graph.
//!
//! Per-question `visibility_rule`s and template-level `conditional_logic`
//! express the same thing. Both are folded into one predicate list per
//! question when the graph is compiled, so selection evaluates a single
//! rule system.

use std::collections::{BTreeSet, HashMap};

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::question::ComparisonOperator;
use anamnesis_core::models::template::TemplateSchema;
use serde_json::Value;
use tracing::warn;

use crate::answers::scalar_text;
use crate::error::ValidationError;
use crate::validate::validate_template;

/// "Show this question when `depends_on`'s answer satisfies the comparison."
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate<'a> {
    pub depends_on: &'a str,
    pub operator: ComparisonOperator,
    pub values: &'a [String],
    /// False when `depends_on` names no question in the template. Such a
    /// predicate never holds.
    pub resolvable: bool,
}

impl Predicate<'_> {
    /// Whether the predicate holds for the current answers. An unanswered
    /// dependency hides the question; it is not an error.
    pub fn holds(&self, answers: &AnswerSet) -> bool {
        if !self.resolvable {
            return false;
        }
        match answers.get(self.depends_on) {
            Some(answer) => compare(self.operator, answer, self.values),
            None => false,
        }
    }
}

/// How a question's visibility is decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Visibility<'a> {
    Always,
    /// Visible when any of the predicates holds.
    AnyOf(Vec<Predicate<'a>>),
}

/// A template's visibility rules, one entry per question in declaration order.
#[derive(Debug, Clone)]
pub struct VisibilityGraph<'a> {
    schema: &'a TemplateSchema,
    visibility: Vec<Visibility<'a>>,
}

impl<'a> VisibilityGraph<'a> {
    /// Compile without validating. Dangling references are logged and the
    /// dependent predicate is treated as permanently false.
    pub fn compile(schema: &'a TemplateSchema) -> Self {
        let index: HashMap<&str, usize> = schema
            .questions
            .iter()
            .enumerate()
            .rev()
            .map(|(i, q)| (q.id.as_str(), i))
            .collect();

        let mut predicates: Vec<Vec<Predicate<'a>>> = vec![Vec::new(); schema.questions.len()];

        for (i, question) in schema.questions.iter().enumerate() {
            if let Some(rule) = &question.visibility_rule {
                let depends_on = rule.depends_on_question_id.as_str();
                let resolvable = index.contains_key(depends_on);
                if !resolvable {
                    warn!(
                        question_id = %question.id,
                        depends_on,
                        "visibility rule references unknown question; question stays hidden"
                    );
                }
                predicates[i].push(Predicate {
                    depends_on,
                    operator: rule.operator,
                    values: rule.comparison_value.values(),
                    resolvable,
                });
            }
        }

        for rule in &schema.conditional_logic {
            let depends_on = rule.if_question_id.as_str();
            let resolvable = index.contains_key(depends_on);
            for target in &rule.then_show_question_ids {
                let Some(&i) = index.get(target.as_str()) else {
                    warn!(
                        target = %target,
                        depends_on,
                        "conditional rule shows unknown question; ignoring"
                    );
                    continue;
                };
                if !resolvable {
                    warn!(
                        question_id = %target,
                        depends_on,
                        "conditional rule references unknown question; question stays hidden"
                    );
                }
                predicates[i].push(Predicate {
                    depends_on,
                    operator: rule.if_value.implied_operator(),
                    values: rule.if_value.values(),
                    resolvable,
                });
            }
        }

        let visibility = predicates
            .into_iter()
            .map(|p| {
                if p.is_empty() {
                    Visibility::Always
                } else {
                    Visibility::AnyOf(p)
                }
            })
            .collect();

        Self { schema, visibility }
    }

    /// Validate the template, then compile it.
    pub fn validated(schema: &'a TemplateSchema) -> Result<Self, ValidationError> {
        validate_template(schema)?;
        Ok(Self::compile(schema))
    }

    pub fn schema(&self) -> &'a TemplateSchema {
        self.schema
    }

    /// Visibility of the question at `index` in declaration order.
    pub fn visibility(&self, index: usize) -> Option<&Visibility<'a>> {
        self.visibility.get(index)
    }

    pub fn is_visible(&self, index: usize, answers: &AnswerSet) -> bool {
        match self.visibility.get(index) {
            Some(Visibility::Always) => true,
            Some(Visibility::AnyOf(predicates)) => predicates.iter().any(|p| p.holds(answers)),
            None => false,
        }
    }

    /// The first predicate that currently holds for the question at `index`.
    pub fn unlocked_by(&self, index: usize, answers: &AnswerSet) -> Option<&Predicate<'a>> {
        match self.visibility.get(index)? {
            Visibility::Always => None,
            Visibility::AnyOf(predicates) => predicates.iter().find(|p| p.holds(answers)),
        }
    }
}

/// Compare an answer against a comparison set.
///
/// Scalars are coerced to strings. `Equals` on a scalar needs a single
/// matching comparison value; on an array answer it needs the same set of
/// values. `IsIn` holds when the scalar, or any array element, is a member.
pub fn compare(operator: ComparisonOperator, answer: &Value, values: &[String]) -> bool {
    match answer {
        Value::Array(items) => {
            let selected: BTreeSet<String> = items.iter().filter_map(scalar_text).collect();
            match operator {
                ComparisonOperator::Equals => {
                    let expected: BTreeSet<&str> = values.iter().map(String::as_str).collect();
                    selected.len() == expected.len()
                        && selected.iter().all(|s| expected.contains(s.as_str()))
                }
                ComparisonOperator::IsIn => selected.iter().any(|s| values.contains(s)),
            }
        }
        scalar => {
            let Some(text) = scalar_text(scalar) else {
                return false;
            };
            match operator {
                ComparisonOperator::Equals => values.len() == 1 && values[0] == text,
                ComparisonOperator::IsIn => values.contains(&text),
            }
        }
    }
}
