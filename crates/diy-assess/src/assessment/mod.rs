//! Home-repair risk assessment: job catalog, keyword classifier, scoring rubric,
//! and the orchestrator that falls back from an LLM provider to the catalog.

pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod openai;
pub mod provider;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogEntry, CatalogError, JobCatalog};
pub use classifier::Classifier;
pub use domain::{
    Assessment, AssessmentInput, AssessmentOutput, AssessmentSource, Decision, JobDefinition,
    JobKey, RiskFlag, RiskFlags, SkillLevel,
};
pub use openai::OpenAiProvider;
pub use provider::{AssessmentProvider, PromptMessages, ProviderError};
pub use router::assessment_router;
pub use service::{unknown_job_output, AssessmentService};
