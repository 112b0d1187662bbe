//! anamnesis-engine
//!
//! Adaptive question selection and answer hashing. Pure functions with no I/O and
//! no AWS dependency. Evaluates a template's conditional-visibility graph to
//! pick the next question, computes completion, and content-addresses an
//! answer set for insight reuse.

pub mod answers;
pub mod error;
pub mod hash;
pub mod selection;
pub mod validate;
pub mod visibility;

pub use crate::hash::answers_hash;
pub use crate::selection::{progress, select_next_question, Progress};
pub use crate::validate::validate_template;
pub use crate::visibility::VisibilityGraph;
