use std::collections::{HashMap, HashSet};

use anamnesis_core::models::template::TemplateSchema;

use crate::error::ValidationError;

/// Authoring-time checks for a template.
///
/// Question ids must be non-empty and unique, choice questions must carry
/// options, a `scale_max` must be positive, every rule must reference
/// existing questions, and the visibility dependency graph must be acyclic.
pub fn validate_template(schema: &TemplateSchema) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for (position, question) in schema.questions.iter().enumerate() {
        if question.id.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionId { position });
        }
        if !ids.insert(question.id.as_str()) {
            return Err(ValidationError::DuplicateQuestionId(question.id.clone()));
        }
        match (question.question_type.requires_options(), question.options.is_empty()) {
            (true, true) => return Err(ValidationError::MissingOptions(question.id.clone())),
            (false, false) => {
                return Err(ValidationError::UnexpectedOptions(question.id.clone()));
            }
            _ => {}
        }
        if question
            .scale_max
            .is_some_and(|max| !(max.is_finite() && max > 0.0))
        {
            return Err(ValidationError::InvalidScale(question.id.clone()));
        }
    }

    // question id -> ids whose answers decide its visibility
    let mut depends_on: HashMap<&str, Vec<&str>> = HashMap::new();

    for question in &schema.questions {
        if let Some(rule) = &question.visibility_rule {
            let dep = rule.depends_on_question_id.as_str();
            check_reference(&ids, &question.id, dep)?;
            depends_on.entry(question.id.as_str()).or_default().push(dep);
        }
    }

    for rule in &schema.conditional_logic {
        let dep = rule.if_question_id.as_str();
        for target in &rule.then_show_question_ids {
            if !ids.contains(target.as_str()) {
                return Err(ValidationError::UnknownQuestionReference {
                    question_id: dep.to_string(),
                    referenced_id: target.clone(),
                });
            }
            check_reference(&ids, target, dep)?;
            depends_on.entry(target.as_str()).or_default().push(dep);
        }
    }

    find_cycle(schema, &depends_on)
}

fn check_reference(
    ids: &HashSet<&str>,
    question_id: &str,
    referenced_id: &str,
) -> Result<(), ValidationError> {
    if question_id == referenced_id {
        return Err(ValidationError::SelfReference(question_id.to_string()));
    }
    if !ids.contains(referenced_id) {
        return Err(ValidationError::UnknownQuestionReference {
            question_id: question_id.to_string(),
            referenced_id: referenced_id.to_string(),
        });
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Depth-first search over dependency edges. Reports the first cycle found,
/// starting and ending at the same question.
fn find_cycle(
    schema: &TemplateSchema,
    depends_on: &HashMap<&str, Vec<&str>>,
) -> Result<(), ValidationError> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut path: Vec<&str> = Vec::new();

    for question in &schema.questions {
        visit(question.id.as_str(), depends_on, &mut marks, &mut path)?;
    }
    Ok(())
}

fn visit<'a>(
    id: &'a str,
    depends_on: &HashMap<&'a str, Vec<&'a str>>,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Result<(), ValidationError> {
    match marks.get(id) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path.iter().position(|p| *p == id).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(id.to_string());
            return Err(ValidationError::CyclicDependency { cycle });
        }
        None => {}
    }

    marks.insert(id, Mark::InProgress);
    path.push(id);
    for &dep in depends_on.get(id).into_iter().flatten() {
        visit(dep, depends_on, marks, path)?;
    }
    path.pop();
    marks.insert(id, Mark::Done);
    Ok(())
}
