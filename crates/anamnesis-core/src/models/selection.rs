use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::question::Question;

/// The engine's answer to "what should the subject see next?".
///
/// Ephemeral: recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NextQuestionResult {
    pub next_question: Option<Question>,
    pub reason: String,
    /// `round(100 * answered_count / visible_count)`, or 100 when nothing is visible.
    pub completion_percent: u8,
    pub answered_count: usize,
    pub visible_count: usize,
}

impl NextQuestionResult {
    pub fn is_complete(&self) -> bool {
        self.next_question.is_none()
    }
}
