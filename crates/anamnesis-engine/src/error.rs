use thiserror::Error;

/// A template authoring error. Raised when a template is created or updated,
/// never during selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question at position {position} has an empty id")]
    EmptyQuestionId { position: usize },

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(String),

    #[error("question '{0}' is single/multiple choice but has no options")]
    MissingOptions(String),

    #[error("question '{0}' has options but is not single/multiple choice")]
    UnexpectedOptions(String),

    #[error("question '{question_id}' references unknown question '{referenced_id}'")]
    UnknownQuestionReference {
        question_id: String,
        referenced_id: String,
    },

    #[error("question '{0}' depends on its own answer")]
    SelfReference(String),

    #[error("question '{0}' has a scale_max that is not a positive number")]
    InvalidScale(String),

    #[error("cyclic visibility dependency: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
}

/// An answer that does not fit its question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("no question with id '{0}' in this template")]
    UnknownQuestion(String),

    #[error("answer to '{question_id}' should be {expected}")]
    TypeMismatch {
        question_id: String,
        expected: &'static str,
    },

    #[error("'{value}' is not an option of question '{question_id}'")]
    InvalidOption { question_id: String, value: String },
}
