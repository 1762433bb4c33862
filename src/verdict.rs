use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Belief score at or above which the defense wins. A fixed design
/// constant, not user-configurable.
pub const CONFIDENCE_THRESHOLD: f64 = 80.0;

/// Substitute rationale when the adjudicator sends none.
pub const NO_RATIONALE: &str = "No rationale provided.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    NotGuilty,
    Guilty,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NotGuilty => write!(f, "Not guilty"),
            Verdict::Guilty => write!(f, "Guilty"),
        }
    }
}

/// The adjudicator's scored opinion of the defense story. Immutable once
/// created; a later call replaces the whole report, never merges into it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerdictReport {
    pub confidence: f64,
    pub rationale: String,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub verdict: Verdict,
}

impl VerdictReport {
    /// Strict decode of the collaborator's loosely shaped payload. The
    /// confidence may arrive as `confidence` or `belief` and coerces to 0
    /// when absent or non-numeric, clamped into [0, 100]; a missing
    /// rationale gets the fixed substitute.
    pub fn from_response(response: &Value) -> Self {
        let confidence = response
            .get("confidence")
            .and_then(Value::as_f64)
            .or_else(|| response.get("belief").and_then(Value::as_f64))
            .unwrap_or(0.0)
            .clamp(0.0, 100.0);
        let rationale = response
            .get("rationale")
            .and_then(Value::as_str)
            .unwrap_or(NO_RATIONALE)
            .to_string();
        let strengths = response
            .get("strengths")
            .and_then(Value::as_str)
            .map(str::to_string);
        let weaknesses = response
            .get("weaknesses")
            .and_then(Value::as_str)
            .map(str::to_string);
        let verdict = if confidence >= CONFIDENCE_THRESHOLD {
            Verdict::NotGuilty
        } else {
            Verdict::Guilty
        };
        Self {
            confidence,
            rationale,
            strengths,
            weaknesses,
            verdict,
        }
    }
}

/// Capability seam for the scoring collaborator. Implementations hand back
/// the raw structured payload; the coercion rules above stay on this side of
/// the boundary.
#[async_trait]
pub trait Adjudicator: Send + Sync {
    async fn deliberate(&self, police_story: &str, defense_story: &str) -> Result<Value>;
}

/// Scores the defense story against the police report. Both texts are
/// required before anything goes over the wire; any transport or parse
/// failure of the call surfaces as a retryable adjudication failure with no
/// partial result kept.
pub async fn adjudicate(
    judge: &dyn Adjudicator,
    police_story: &str,
    defense_story: &str,
) -> Result<VerdictReport> {
    if police_story.trim().is_empty() {
        return Err(AppError::MissingInput("police story"));
    }
    if defense_story.trim().is_empty() {
        return Err(AppError::MissingInput("defense story"));
    }
    let response = judge
        .deliberate(police_story, defense_story)
        .await
        .map_err(|e| AppError::AdjudicationFailed(e.to_string()))?;
    Ok(VerdictReport::from_response(&response))
}
