//! Content addressing for `(template, answers)` pairs.
//!
//! The hash covers the template's question ids and the answers, never the
//! question text or options: editing wording does not invalidate insights
//! derived from the same answers.

use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::template::TemplateSchema;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::answers::number_text;

/// SHA-256 over the canonical form of `{answers, question_ids}`, as 64
/// lowercase hex characters.
pub fn answers_hash(schema: &TemplateSchema, answers: &AnswerSet) -> String {
    let mut question_ids: Vec<&str> = schema.question_ids().collect();
    question_ids.sort_unstable();

    let doc = json!({
        "question_ids": question_ids,
        "answers": answers_value(answers),
    });

    hex::encode(Sha256::digest(canonical_json(&doc).as_bytes()))
}

/// A 64-bit seed derived from the answers alone.
pub fn answers_seed(answers: &AnswerSet) -> u64 {
    let digest = Sha256::digest(canonical_json(&answers_value(answers)).as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn answers_value(answers: &AnswerSet) -> Value {
    Value::Object(
        answers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

/// Serialize with object keys sorted at every level, no whitespace, and
/// integral numbers written without a fraction.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&number_text(n)),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push_str(&Value::String(s.to_string()).to_string());
}
