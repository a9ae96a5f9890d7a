use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::catalog::JobCatalog;
use super::classifier::Classifier;
use super::domain::{Assessment, AssessmentInput, AssessmentOutput, AssessmentSource, Decision};
use super::provider::{parse_completion, AssessmentProvider, PromptMessages, ProviderError};
use super::scoring;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(20);

const UNKNOWN_JOB_SCORE: u8 = 75;

/// Orchestrates provider delegation, classification, and scoring.
///
/// Every call produces an [`AssessmentOutput`]; provider failures fall through
/// to the catalog and unmatched text falls through to a conservative default.
pub struct AssessmentService<P> {
    catalog: Arc<JobCatalog>,
    classifier: Classifier,
    provider: Option<Arc<P>>,
    provider_timeout: Duration,
}

impl<P> AssessmentService<P>
where
    P: AssessmentProvider + 'static,
{
    pub fn new(catalog: Arc<JobCatalog>, provider: Option<Arc<P>>) -> Self {
        let classifier = Classifier::new(catalog.clone());
        Self {
            catalog,
            classifier,
            provider,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Deadline applied to each provider attempt.
    pub fn provider_timeout(&self) -> Duration {
        self.provider_timeout
    }

    /// Assess a raw JSON request body.
    pub async fn assess_json(&self, payload: &Value) -> AssessmentOutput {
        let input = AssessmentInput::from_json(payload);
        self.assess(&input).await.output
    }

    /// Run the pipeline and report which stage produced the result.
    pub async fn assess(&self, input: &AssessmentInput) -> Assessment {
        if let Some(output) = self.try_provider(input).await {
            info!(source = "provider", score = output.score, "assessment completed");
            return Assessment {
                output,
                source: AssessmentSource::Provider,
            };
        }

        let assessment = match self.classifier.classify(input) {
            Some(key) => match self.catalog.lookup(key) {
                Some(job) => Assessment {
                    output: scoring::score(job, input.skill_level),
                    source: AssessmentSource::Catalog(key),
                },
                None => Self::unknown(),
            },
            None => Self::unknown(),
        };

        info!(
            source = assessment.source.label(),
            score = assessment.output.score,
            decision = assessment.output.decision.label(),
            skill = %input.skill_level,
            "assessment completed"
        );

        assessment
    }

    async fn try_provider(&self, input: &AssessmentInput) -> Option<AssessmentOutput> {
        let provider = self.provider.as_ref()?;
        let prompt = PromptMessages::for_input(input);

        let attempt = async {
            let text = provider.complete(&prompt).await?;
            parse_completion(&text)
        };

        let result = match tokio::time::timeout(self.provider_timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.provider_timeout.as_secs())),
        };

        match result {
            Ok(output) => Some(output),
            Err(error) => {
                warn!(%error, "provider assessment unavailable, using catalog");
                None
            }
        }
    }

    fn unknown() -> Assessment {
        debug!("no catalog job matched request");
        Assessment {
            output: unknown_job_output(),
            source: AssessmentSource::UnknownJob,
        }
    }
}

/// Conservative result returned when the request matches no known job.
pub fn unknown_job_output() -> AssessmentOutput {
    AssessmentOutput {
        decision: Decision::GetAPro,
        score: UNKNOWN_JOB_SCORE,
        rationale: vec![
            "Unable to match your description to our known jobs.".to_string(),
            "For ambiguous or unknown tasks, we err on the side of caution.".to_string(),
        ],
        steps: Vec::new(),
        tools: Vec::new(),
        materials: Vec::new(),
        safety: vec![
            "Please consult a professional or provide more details to get specific advice."
                .to_string(),
        ],
        duration_min: None,
        cost_low: None,
        cost_high: None,
    }
}
