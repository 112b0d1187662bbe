use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::insight::{InsightPayload, RiskScores};
use anamnesis_core::models::question::QuestionType;
use anamnesis_core::models::template::TemplateSchema;
use anamnesis_engine::answers::{numeric, score_answer};

use crate::error::GeneratorError;
use crate::generator::InsightGenerator;

/// Score used for a risk field when no tagged answer informs it.
pub const DEFAULT_SCORE: f64 = 50.0;

pub const STRESS_TAG: &str = "stress";
pub const SLEEP_TAG: &str = "sleep";
pub const READINESS_TAG: &str = "readiness";
pub const DROPOUT_TAG: &str = "dropout";

/// Deterministic, tag-driven insight.
///
/// Every answered question is normalised to `[0, 100]` with
/// [`score_answer`]. Each risk field is the rounded mean of the scores of
/// questions carrying its tag (`stress`, `sleep`, `readiness`, `dropout`),
/// or [`DEFAULT_SCORE`] when there are none. A question may feed several
/// fields.
///
/// A higher answer score means more of the tagged quantity, except for
/// sentiment questions feeding `stress` or `dropout`: there a positive
/// sentiment lowers the risk, so the score is inverted (`100 - score`).
pub struct RuleBasedGenerator;

#[derive(Default)]
struct Bucket {
    total: f64,
    count: usize,
}

impl Bucket {
    fn add(&mut self, score: f64) {
        self.total += score;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            DEFAULT_SCORE
        } else {
            (self.total / self.count as f64).round()
        }
    }
}

impl InsightGenerator for RuleBasedGenerator {
    fn id(&self) -> &str {
        "rule_based"
    }

    fn generate(
        &self,
        schema: &TemplateSchema,
        answers: &AnswerSet,
    ) -> Result<InsightPayload, GeneratorError> {
        let mut stress = Bucket::default();
        let mut sleep = Bucket::default();
        let mut readiness = Bucket::default();
        let mut dropout = Bucket::default();
        let mut scored = 0;

        for question in &schema.questions {
            let Some(value) = answers.get(&question.id) else {
                continue;
            };
            if question.question_type == QuestionType::Number && numeric(value).is_none() {
                return Err(GeneratorError::MalformedAnswer {
                    question_id: question.id.clone(),
                    reason: format!("expected a number, got {value}"),
                });
            }
            let Some(score) = score_answer(question, value) else {
                continue;
            };

            let mut matched = false;
            let sentiment = question.question_type == QuestionType::Sentiment;
            for (tag, bucket, higher_is_worse) in [
                (STRESS_TAG, &mut stress, true),
                (SLEEP_TAG, &mut sleep, false),
                (READINESS_TAG, &mut readiness, false),
                (DROPOUT_TAG, &mut dropout, true),
            ] {
                if question.has_tag(tag) {
                    if sentiment && higher_is_worse {
                        bucket.add(100.0 - score);
                    } else {
                        bucket.add(score);
                    }
                    matched = true;
                }
            }
            if matched {
                scored += 1;
            }
        }

        let risks = RiskScores {
            readiness: readiness.mean(),
            dropout_risk: dropout.mean(),
            stress: stress.mean(),
            sleep_quality: sleep.mean(),
        };

        Ok(InsightPayload {
            summary: summarize(&risks, scored),
            recommendations: recommend(&risks),
            risks,
        })
    }
}

fn summarize(risks: &RiskScores, scored: usize) -> String {
    let basis = match scored {
        0 => "no scored answers; defaults applied".to_string(),
        1 => "1 scored answer".to_string(),
        n => format!("{n} scored answers"),
    };
    format!(
        "Overall risk level: {}. Stress {}/100, sleep quality {}/100, dropout risk {}/100, \
         readiness {}/100 ({basis}).",
        risks.risk_level(),
        risks.stress,
        risks.sleep_quality,
        risks.dropout_risk,
        risks.readiness,
    )
}

/// Threshold rules, in a fixed order. Never returns an empty list.
pub fn recommend(risks: &RiskScores) -> Vec<String> {
    let mut out = Vec::new();
    if risks.stress >= 70.0 {
        out.push("Schedule a stress-management session and review current workload.");
    }
    if risks.sleep_quality < 50.0 {
        out.push("Review sleep hygiene and agree on a consistent sleep schedule.");
    }
    if risks.dropout_risk >= 70.0 {
        out.push("Arrange a follow-up check-in within one week to support adherence.");
    }
    if risks.readiness < 40.0 {
        out.push("Reduce programme intensity until readiness improves.");
    } else if risks.readiness >= 70.0 {
        out.push("Progress to the next phase of the programme.");
    }
    if out.is_empty() {
        out.push("Maintain the current plan and reassess at the next session.");
    }
    out.into_iter().map(String::from).collect()
}
