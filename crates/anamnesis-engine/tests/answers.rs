use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::question::{Question, QuestionType};
use anamnesis_core::models::template::TemplateSchema;
use anamnesis_engine::answers::{score_answer, validate_answer, validate_answers};
use anamnesis_engine::error::AnswerError;
use serde_json::json;

fn question(question_type: QuestionType, options: &[&str]) -> Question {
    Question {
        id: "q".to_string(),
        text: "?".to_string(),
        question_type,
        options: options.iter().map(|o| o.to_string()).collect(),
        required: false,
        tags: Default::default(),
        scale_max: None,
        visibility_rule: None,
    }
}

#[test]
fn validates_by_question_type() {
    let number = question(QuestionType::Number, &[]);
    assert!(validate_answer(&number, &json!(4.5)).is_ok());
    assert!(validate_answer(&number, &json!("four")).is_err());

    let single = question(QuestionType::Single, &["low", "high"]);
    assert!(validate_answer(&single, &json!("low")).is_ok());
    assert_eq!(
        validate_answer(&single, &json!("medium")),
        Err(AnswerError::InvalidOption {
            question_id: "q".to_string(),
            value: "medium".to_string(),
        })
    );

    let multiple = question(QuestionType::Multiple, &["a", "b", "c"]);
    assert!(validate_answer(&multiple, &json!(["a", "c"])).is_ok());
    assert!(validate_answer(&multiple, &json!("a")).is_err());
    assert!(validate_answer(&multiple, &json!(["a", "z"])).is_err());

    let sentiment = question(QuestionType::Sentiment, &[]);
    assert!(validate_answer(&sentiment, &json!("Positive")).is_ok());
    assert!(validate_answer(&sentiment, &json!(-0.5)).is_ok());
    assert!(validate_answer(&sentiment, &json!(3)).is_err());

    let text = question(QuestionType::Text, &[]);
    assert!(validate_answer(&text, &json!("anything")).is_ok());
    assert!(validate_answer(&text, &json!(1)).is_err());
}

#[test]
fn rejects_answers_to_unknown_questions() {
    let schema = TemplateSchema {
        questions: vec![question(QuestionType::Text, &[])],
        ..Default::default()
    };
    let answers: AnswerSet = [("other", json!("x"))].into_iter().collect();
    assert_eq!(
        validate_answers(&schema, &answers),
        Err(AnswerError::UnknownQuestion("other".to_string()))
    );
}

#[test]
fn scores_numbers_on_the_question_scale() {
    let ten_point = question(QuestionType::Number, &[]);
    assert_eq!(score_answer(&ten_point, &json!(7)), Some(70.0));
    assert_eq!(score_answer(&ten_point, &json!(10)), Some(100.0));
    assert_eq!(score_answer(&ten_point, &json!(42)), Some(100.0));
    assert_eq!(score_answer(&ten_point, &json!(-3)), Some(0.0));
    assert_eq!(score_answer(&ten_point, &json!("8")), Some(80.0));

    let hundred_point = Question {
        scale_max: Some(100.0),
        ..question(QuestionType::Number, &[])
    };
    assert_eq!(score_answer(&hundred_point, &json!(10)), Some(10.0));
    assert_eq!(score_answer(&hundred_point, &json!(42)), Some(42.0));
    assert_eq!(score_answer(&hundred_point, &json!(250)), Some(100.0));

    let text = Question {
        scale_max: Some(5.0),
        ..question(QuestionType::Text, &[])
    };
    assert_eq!(score_answer(&text, &json!("4")), Some(80.0));
}

#[test]
fn numeric_scores_never_decrease_as_answers_grow() {
    for scale_max in [None, Some(5.0), Some(100.0)] {
        let number = Question {
            scale_max,
            ..question(QuestionType::Number, &[])
        };
        let mut previous = f64::MIN;
        for answer in [-5, 0, 1, 9, 10, 11, 50, 60, 100, 101, 1000] {
            let score = score_answer(&number, &json!(answer)).expect("numeric");
            assert!(
                score >= previous,
                "scale {scale_max:?}: {answer} scored {score} after {previous}"
            );
            previous = score;
        }
    }
}

#[test]
fn scores_choices_by_position_and_share() {
    let single = question(QuestionType::Single, &["never", "sometimes", "often"]);
    assert_eq!(score_answer(&single, &json!("never")), Some(0.0));
    assert_eq!(score_answer(&single, &json!("sometimes")), Some(50.0));
    assert_eq!(score_answer(&single, &json!("often")), Some(100.0));
    assert_eq!(score_answer(&single, &json!("unknown")), None);

    let multiple = question(QuestionType::Multiple, &["a", "b", "c", "d"]);
    assert_eq!(score_answer(&multiple, &json!(["a", "b"])), Some(50.0));
    assert_eq!(score_answer(&multiple, &json!(["a", "a", "zz"])), Some(25.0));
}

#[test]
fn scores_sentiment_text_and_booleans() {
    let sentiment = question(QuestionType::Sentiment, &[]);
    assert_eq!(score_answer(&sentiment, &json!("negative")), Some(0.0));
    assert_eq!(score_answer(&sentiment, &json!("neutral")), Some(50.0));
    assert_eq!(score_answer(&sentiment, &json!(0.5)), Some(75.0));

    let text = question(QuestionType::Text, &[]);
    assert_eq!(score_answer(&text, &json!("Yes")), Some(100.0));
    assert_eq!(score_answer(&text, &json!("no")), Some(0.0));
    assert_eq!(score_answer(&text, &json!("slept badly")), None);
    assert_eq!(score_answer(&text, &json!(true)), Some(100.0));
}
