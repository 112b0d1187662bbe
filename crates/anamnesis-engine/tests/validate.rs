use anamnesis_core::models::question::{
    ComparisonOperator, Question, QuestionType, VisibilityRule,
};
use anamnesis_core::models::template::{ConditionalRule, TemplateSchema};
use anamnesis_engine::error::ValidationError;
use anamnesis_engine::{validate_template, VisibilityGraph};

fn question(id: &str, depends_on: Option<&str>) -> Question {
    Question {
        id: id.to_string(),
        text: id.to_string(),
        question_type: QuestionType::Text,
        options: vec![],
        required: false,
        tags: Default::default(),
        scale_max: None,
        visibility_rule: depends_on.map(|dep| VisibilityRule {
            depends_on_question_id: dep.to_string(),
            operator: ComparisonOperator::Equals,
            comparison_value: "yes".into(),
        }),
    }
}

fn schema(questions: Vec<Question>) -> TemplateSchema {
    TemplateSchema {
        questions,
        ..Default::default()
    }
}

#[test]
fn accepts_a_chain() {
    let schema = schema(vec![
        question("a", None),
        question("b", Some("a")),
        question("c", Some("b")),
    ]);
    assert_eq!(validate_template(&schema), Ok(()));
    assert!(VisibilityGraph::validated(&schema).is_ok());
}

#[test]
fn rejects_duplicate_ids() {
    let schema = schema(vec![question("a", None), question("a", None)]);
    assert_eq!(
        validate_template(&schema),
        Err(ValidationError::DuplicateQuestionId("a".to_string()))
    );
}

#[test]
fn rejects_empty_ids() {
    let schema = schema(vec![question("a", None), question(" ", None)]);
    assert_eq!(
        validate_template(&schema),
        Err(ValidationError::EmptyQuestionId { position: 1 })
    );
}

#[test]
fn choice_questions_need_options() {
    let mut single = question("a", None);
    single.question_type = QuestionType::Single;
    assert_eq!(
        validate_template(&schema(vec![single.clone()])),
        Err(ValidationError::MissingOptions("a".to_string()))
    );

    single.options = vec!["yes".to_string(), "no".to_string()];
    assert_eq!(validate_template(&schema(vec![single])), Ok(()));

    let mut text = question("b", None);
    text.options = vec!["stray".to_string()];
    assert_eq!(
        validate_template(&schema(vec![text])),
        Err(ValidationError::UnexpectedOptions("b".to_string()))
    );
}

#[test]
fn rejects_dangling_visibility_reference() {
    let schema = schema(vec![question("a", None), question("b", Some("ghost"))]);
    assert_eq!(
        validate_template(&schema),
        Err(ValidationError::UnknownQuestionReference {
            question_id: "b".to_string(),
            referenced_id: "ghost".to_string(),
        })
    );
}

#[test]
fn rejects_dangling_conditional_target() {
    let mut schema = schema(vec![question("a", None)]);
    schema.conditional_logic.push(ConditionalRule {
        if_question_id: "a".to_string(),
        if_value: "yes".into(),
        then_show_question_ids: vec!["missing".to_string()],
    });
    assert!(matches!(
        validate_template(&schema),
        Err(ValidationError::UnknownQuestionReference { .. })
    ));
}

#[test]
fn rejects_self_reference() {
    let schema = schema(vec![question("a", Some("a"))]);
    assert_eq!(
        validate_template(&schema),
        Err(ValidationError::SelfReference("a".to_string()))
    );
}

#[test]
fn rejects_cycle_across_both_rule_kinds() {
    // b depends on a through its own rule; a depends on b through conditional logic.
    let mut schema = schema(vec![question("a", None), question("b", Some("a"))]);
    schema.conditional_logic.push(ConditionalRule {
        if_question_id: "b".to_string(),
        if_value: "yes".into(),
        then_show_question_ids: vec!["a".to_string()],
    });

    match validate_template(&schema) {
        Err(ValidationError::CyclicDependency { cycle }) => {
            assert_eq!(cycle.first(), cycle.last());
            assert!(cycle.contains(&"a".to_string()));
            assert!(cycle.contains(&"b".to_string()));
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn rejects_longer_cycle() {
    let schema = schema(vec![
        question("a", Some("c")),
        question("b", Some("a")),
        question("c", Some("b")),
    ]);
    assert!(matches!(
        validate_template(&schema),
        Err(ValidationError::CyclicDependency { cycle }) if cycle.len() == 4
    ));
}

#[test]
fn scale_max_must_be_positive() {
    let ok = Question {
        scale_max: Some(100.0),
        ..question("a", None)
    };
    assert_eq!(validate_template(&schema(vec![ok])), Ok(()));

    for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        let q = Question {
            scale_max: Some(bad),
            ..question("a", None)
        };
        assert_eq!(
            validate_template(&schema(vec![q])),
            Err(ValidationError::InvalidScale("a".to_string()))
        );
    }
}
