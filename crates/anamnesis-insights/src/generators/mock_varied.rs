use anamnesis_core::models::answer::AnswerSet;
use anamnesis_core::models::insight::{InsightPayload, RiskScores};
use anamnesis_core::models::template::TemplateSchema;
use anamnesis_engine::hash::answers_seed;

use crate::error::GeneratorError;
use crate::generator::InsightGenerator;

const OPENERS: [&str; 4] = [
    "Responses suggest",
    "The answer pattern indicates",
    "Overall, the session shows",
    "Self-reported data points to",
];

const RECOMMENDATIONS: [&str; 6] = [
    "Keep a short daily journal of energy and mood.",
    "Add two low-intensity recovery sessions per week.",
    "Review sleep routine and screen time before bed.",
    "Book a check-in call to discuss progress.",
    "Set one small, measurable goal for the coming week.",
    "Practice a five-minute breathing exercise each morning.",
];

/// Placeholder strategy with varied but fully deterministic output.
///
/// Everything is drawn from a 64-bit seed over the canonical answers, so
/// the same answers always produce the same payload and different answers
/// almost always produce a different one.
pub struct MockVariedGenerator;

fn byte_score(byte: u8) -> f64 {
    (byte as f64 * 100.0 / 255.0).round()
}

impl InsightGenerator for MockVariedGenerator {
    fn id(&self) -> &str {
        "mock_varied"
    }

    fn generate(
        &self,
        _schema: &TemplateSchema,
        answers: &AnswerSet,
    ) -> Result<InsightPayload, GeneratorError> {
        let bytes = answers_seed(answers).to_be_bytes();

        let risks = RiskScores {
            readiness: byte_score(bytes[0]),
            dropout_risk: byte_score(bytes[1]),
            stress: byte_score(bytes[2]),
            sleep_quality: byte_score(bytes[3]),
        };

        let opener = OPENERS[bytes[4] as usize % OPENERS.len()];
        let summary = format!(
            "{opener} a {} overall risk profile (stress {}, sleep quality {}, dropout risk {}, \
             readiness {}).",
            risks.risk_level(),
            risks.stress,
            risks.sleep_quality,
            risks.dropout_risk,
            risks.readiness,
        );

        let count = 2 + bytes[5] as usize % 2;
        let start = bytes[6] as usize % RECOMMENDATIONS.len();
        let recommendations = (0..count)
            .map(|i| RECOMMENDATIONS[(start + i) % RECOMMENDATIONS.len()].to_string())
            .collect();

        Ok(InsightPayload {
            summary,
            risks,
            recommendations,
        })
    }
}
