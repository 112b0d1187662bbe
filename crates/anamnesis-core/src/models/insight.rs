use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// The derived summary, risk scores and recommendations for one session.
///
/// Created at most once per `(tenant_id, session_id)` and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Insight {
    pub id: Uuid,
    pub tenant_id: String,
    pub session_id: String,
    pub summary: String,
    pub risks: RiskScores,
    pub recommendations: Vec<String>,
    /// Set when the insight came from a cacheable strategy. Enables
    /// cross-session reuse lookups.
    pub answers_hash: Option<String>,
    pub created_at: jiff::Timestamp,
}

impl Insight {
    /// Build a fresh insight row for a session from a generated or reused payload.
    pub fn new(
        tenant_id: &str,
        session_id: &str,
        payload: InsightPayload,
        answers_hash: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id: tenant_id.to_string(),
            session_id: session_id.to_string(),
            summary: payload.summary,
            risks: payload.risks,
            recommendations: payload.recommendations,
            answers_hash,
            created_at: jiff::Timestamp::now(),
        }
    }

    pub fn payload(&self) -> InsightPayload {
        InsightPayload {
            summary: self.summary.clone(),
            risks: self.risks,
            recommendations: self.recommendations.clone(),
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risks.risk_level()
    }
}

/// What an insight generator produces, and what the cache stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InsightPayload {
    pub summary: String,
    pub risks: RiskScores,
    pub recommendations: Vec<String>,
}

impl InsightPayload {
    /// Check the invariants every generator must uphold.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.risks.validate()?;
        if self.recommendations.is_empty() {
            return Err(CoreError::EmptyRecommendations);
        }
        Ok(())
    }
}

/// Payloads are cached verbatim.
pub type CachedInsight = InsightPayload;

/// Risk scores, each in `[0, 100]`.
///
/// `readiness` and `sleep_quality` are higher-is-better; `stress` and
/// `dropout_risk` are higher-is-worse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskScores {
    pub readiness: f64,
    pub dropout_risk: f64,
    pub stress: f64,
    pub sleep_quality: f64,
}

impl RiskScores {
    /// Overall level: the worst of stress, poor sleep and dropout risk.
    pub fn risk_level(&self) -> RiskLevel {
        let worst = self
            .stress
            .max(100.0 - self.sleep_quality)
            .max(self.dropout_risk);
        if worst >= 70.0 {
            RiskLevel::High
        } else if worst >= 50.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("readiness", self.readiness),
            ("dropout_risk", self.dropout_risk),
            ("stress", self.stress),
            ("sleep_quality", self.sleep_quality),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CoreError::RiskOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        })
    }
}
