use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::selection::NextQuestionResult;
use anamnesis_core::models::template::TemplateSchema;

use crate::visibility::VisibilityGraph;

pub const REASON_COMPLETE: &str = "all visible questions answered";
pub const REASON_IN_ORDER: &str = "next unanswered question in template order";

/// Pick the next question to present and compute completion.
///
/// Pure and deterministic. The template is assumed to have passed
/// [`validate_template`](crate::validate::validate_template); callers that
/// select repeatedly against one template can compile a [`VisibilityGraph`]
/// once and use [`VisibilityGraph::select_next`].
pub fn select_next_question(schema: &TemplateSchema, answers: &AnswerSet) -> NextQuestionResult {
    VisibilityGraph::compile(schema).select_next(answers)
}

/// Counts over the currently visible questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub visible: usize,
    pub answered: usize,
    /// Visible, required and not yet answered.
    pub required_remaining: usize,
}

impl Progress {
    pub fn completion_percent(&self) -> u8 {
        if self.visible == 0 {
            return 100;
        }
        (self.answered as f64 * 100.0 / self.visible as f64).round() as u8
    }
}

pub fn progress(schema: &TemplateSchema, answers: &AnswerSet) -> Progress {
    VisibilityGraph::compile(schema).progress(answers)
}

impl VisibilityGraph<'_> {
    pub fn progress(&self, answers: &AnswerSet) -> Progress {
        let mut progress = Progress {
            visible: 0,
            answered: 0,
            required_remaining: 0,
        };
        for (i, question) in self.schema().questions.iter().enumerate() {
            if !self.is_visible(i, answers) {
                continue;
            }
            progress.visible += 1;
            if answers.contains(&question.id) {
                progress.answered += 1;
            } else if question.required {
                progress.required_remaining += 1;
            }
        }
        progress
    }

    /// First visible, unanswered question in declaration order. Required
    /// questions get no priority over optional ones.
    pub fn select_next(&self, answers: &AnswerSet) -> NextQuestionResult {
        let schema = self.schema();
        let progress = self.progress(answers);

        let next = schema
            .questions
            .iter()
            .enumerate()
            .find(|(i, q)| !answers.contains(&q.id) && self.is_visible(*i, answers));

        let (next_question, reason) = match next {
            None => (None, REASON_COMPLETE.to_string()),
            Some((i, question)) => {
                let reason = match self.unlocked_by(i, answers) {
                    Some(predicate) => format!("unlocked by answer to '{}'", predicate.depends_on),
                    None => REASON_IN_ORDER.to_string(),
                };
                (Some(question.clone()), reason)
            }
        };

        NextQuestionResult {
            next_question,
            reason,
            completion_percent: progress.completion_percent(),
            answered_count: progress.answered,
            visible_count: progress.visible,
        }
    }
}
