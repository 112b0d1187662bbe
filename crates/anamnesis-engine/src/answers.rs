//! Answer checking and normalisation.
//!
//! `score_answer` maps an answer onto `[0, 100]` so answers of different
//! question types can be aggregated:
//!
//! - booleans: `true` = 100, `false` = 0
//! - numbers: read on the question's `[0, scale_max]` scale (0–10 unless
//!   set) and stretched linearly onto `[0, 100]`; out-of-scale values clamp
//! - single choice: option position, first option = 0, last = 100
//! - multiple choice: share of the options selected
//! - sentiment: `negative` 0, `neutral` 50, `positive` 100, or a polarity
//!   `v` in `[-1, 1]` mapped to `(v + 1) * 50`
//! - text: numeric strings as numbers, `yes`/`no` as 100/0, otherwise unscored

use std::collections::BTreeSet;

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::question::{Question, QuestionType};
use anamnesis_core::models::template::TemplateSchema;
use serde_json::Value;

use crate::error::AnswerError;

const SENTIMENTS: [&str; 3] = ["negative", "neutral", "positive"];

/// Check that every answer belongs to a question of the template and fits
/// its type.
pub fn validate_answers(schema: &TemplateSchema, answers: &AnswerSet) -> Result<(), AnswerError> {
    for (question_id, value) in answers.iter() {
        let question = schema
            .question(question_id)
            .ok_or_else(|| AnswerError::UnknownQuestion(question_id.to_string()))?;
        validate_answer(question, value)?;
    }
    Ok(())
}

/// Check a single answer against its question's type and options.
pub fn validate_answer(question: &Question, value: &Value) -> Result<(), AnswerError> {
    let mismatch = |expected| AnswerError::TypeMismatch {
        question_id: question.id.clone(),
        expected,
    };

    match question.question_type {
        QuestionType::Text => value.as_str().map(|_| ()).ok_or_else(|| mismatch("a string")),
        QuestionType::Number => match value.as_f64() {
            Some(v) if v.is_finite() => Ok(()),
            _ => Err(mismatch("a number")),
        },
        QuestionType::Single => {
            let choice = value.as_str().ok_or_else(|| mismatch("one of the options"))?;
            check_option(question, choice)
        }
        QuestionType::Multiple => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch("a list of options"))?;
            for item in items {
                let choice = item.as_str().ok_or_else(|| mismatch("a list of options"))?;
                check_option(question, choice)?;
            }
            Ok(())
        }
        QuestionType::Sentiment => {
            if sentiment_score(value).is_some() {
                Ok(())
            } else {
                Err(mismatch("negative, neutral, positive or a number in [-1, 1]"))
            }
        }
    }
}

fn check_option(question: &Question, choice: &str) -> Result<(), AnswerError> {
    if question.options.iter().any(|o| o == choice) {
        Ok(())
    } else {
        Err(AnswerError::InvalidOption {
            question_id: question.id.clone(),
            value: choice.to_string(),
        })
    }
}

/// Normalise an answer onto `[0, 100]`. `None` when the answer carries no
/// usable magnitude for its question type.
pub fn score_answer(question: &Question, value: &Value) -> Option<f64> {
    if let Value::Bool(b) = value {
        return Some(if *b { 100.0 } else { 0.0 });
    }

    match question.question_type {
        QuestionType::Number => numeric(value).and_then(|v| scale_numeric(v, question.scale_max())),
        QuestionType::Single => {
            let choice = value.as_str()?;
            let position = question.options.iter().position(|o| o == choice)?;
            let last = question.options.len() - 1;
            if last == 0 {
                Some(100.0)
            } else {
                Some(position as f64 * 100.0 / last as f64)
            }
        }
        QuestionType::Multiple => {
            if question.options.is_empty() {
                return None;
            }
            let selected: BTreeSet<&str> = value
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .filter(|choice| question.options.iter().any(|o| o == choice))
                .collect();
            Some(selected.len() as f64 * 100.0 / question.options.len() as f64)
        }
        QuestionType::Sentiment => sentiment_score(value),
        QuestionType::Text => {
            let text = value.as_str()?.trim();
            if text.eq_ignore_ascii_case("yes") {
                Some(100.0)
            } else if text.eq_ignore_ascii_case("no") {
                Some(0.0)
            } else {
                text.parse::<f64>()
                    .ok()
                    .and_then(|v| scale_numeric(v, question.scale_max()))
            }
        }
    }
}

/// A numeric reading of an answer: JSON numbers and numeric strings.
pub fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    v.filter(|v| v.is_finite())
}

fn scale_numeric(v: f64, scale_max: f64) -> Option<f64> {
    if !v.is_finite() || !scale_max.is_finite() || scale_max <= 0.0 {
        return None;
    }
    Some((v * 100.0 / scale_max).clamp(0.0, 100.0))
}

fn sentiment_score(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => SENTIMENTS
            .iter()
            .position(|label| s.trim().eq_ignore_ascii_case(label))
            .map(|i| i as f64 * 50.0),
        Value::Number(n) => n
            .as_f64()
            .filter(|v| (-1.0..=1.0).contains(v))
            .map(|v| (v + 1.0) * 50.0),
        _ => None,
    }
}

/// The string form used when comparing answers and when hashing them:
/// integral numbers lose any trailing `.0`.
pub fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Scalar answer coerced to a string; `None` for null, arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}
