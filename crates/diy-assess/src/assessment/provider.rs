use std::future::Future;

use super::domain::{AssessmentInput, AssessmentOutput};
use super::scoring;

/// Instructions that fix the assessor persona and the strict JSON reply shape.
pub const SYSTEM_PROMPT: &str = "You are a cautious, friendly home-repair safety assessor. \
Given a description of a DIY job and the person's self-reported skill level, decide whether \
they can safely do it themselves or should hire a professional. Be concise and practical. \
Reply with strict JSON only, no prose and no code fences, using exactly these keys: \
\"decision\" (either \"DIY\" or \"Get a Pro\"), \"score\" (integer risk score from 1 to 100, \
above 60 means \"Get a Pro\"), \"rationale\" (array of strings, the first being the overall \
verdict), \"steps\" (array of strings in execution order), \"tools\" (array of strings), \
\"materials\" (array of strings), \"safety\" (array of strings), \"durationMin\" (integer \
minutes or null), \"costLow\" (number or null), \"costHigh\" (number or null).";

/// A two-message chat prompt sent to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

impl PromptMessages {
    pub fn for_input(input: &AssessmentInput) -> Self {
        let tags = if input.tags.is_empty() {
            "none".to_string()
        } else {
            input.tags.join(", ")
        };

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Job description: {}\nSkill level: {}\nTags: {}",
                input.description.trim(),
                input.skill_level,
                tags
            ),
        }
    }
}

/// External text-completion service used as the primary assessment path.
pub trait AssessmentProvider: Send + Sync {
    /// Request a single, non-streaming completion and return its text.
    fn complete(
        &self,
        prompt: &PromptMessages,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Anything that makes the provider path unusable for a request.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider client could not be built: {0}")]
    Client(String),
    #[error("provider request failed: {0}")]
    Transport(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("provider did not answer within {0} seconds")]
    Timeout(u64),
    #[error("provider returned an empty completion")]
    EmptyCompletion,
    #[error("provider completion is malformed: {0}")]
    Malformed(String),
}

/// Parse a completion strictly as an [`AssessmentOutput`].
pub fn parse_completion(text: &str) -> Result<AssessmentOutput, ProviderError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ProviderError::EmptyCompletion);
    }

    let output: AssessmentOutput =
        serde_json::from_str(text).map_err(|err| ProviderError::Malformed(err.to_string()))?;

    if !(1..=100).contains(&output.score) {
        return Err(ProviderError::Malformed(format!(
            "score {} outside 1-100",
            output.score
        )));
    }
    let implied = scoring::decision_for(i32::from(output.score));
    if output.decision != implied {
        return Err(ProviderError::Malformed(format!(
            "decision '{}' contradicts score {}",
            output.decision.label(),
            output.score
        )));
    }
    if output.rationale.is_empty() {
        return Err(ProviderError::Malformed("rationale is empty".to_string()));
    }
    if let (Some(low), Some(high)) = (output.cost_low, output.cost_high) {
        if low > high {
            return Err(ProviderError::Malformed(format!(
                "costLow {low} exceeds costHigh {high}"
            )));
        }
    }

    Ok(output)
}
