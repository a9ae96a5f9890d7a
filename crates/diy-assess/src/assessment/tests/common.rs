use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::assessment::catalog::JobCatalog;
use crate::assessment::domain::{AssessmentInput, JobDefinition, JobKey, SkillLevel};
use crate::assessment::provider::{AssessmentProvider, PromptMessages, ProviderError};
use crate::assessment::service::AssessmentService;

pub(super) const PROVIDER_REPLY: &str = r#"{
    "decision": "DIY",
    "score": 22,
    "rationale": ["A short, low-risk job.", "Take care with the drill."],
    "steps": ["Measure twice", "Drill once"],
    "tools": ["Drill"],
    "materials": ["Rawl plugs"],
    "safety": ["Wear eye protection"],
    "durationMin": 30,
    "costLow": 5,
    "costHigh": 20
}"#;

pub(super) fn catalog() -> Arc<JobCatalog> {
    Arc::new(JobCatalog::standard().expect("standard catalog builds"))
}

pub(super) fn job(key: &'static str) -> JobDefinition {
    catalog()
        .lookup(JobKey(key))
        .cloned()
        .expect("job present in catalog")
}

pub(super) fn input(description: &str, skill_level: SkillLevel) -> AssessmentInput {
    AssessmentInput::new(description, skill_level)
}

/// Canned provider behaviour for a single call.
#[derive(Debug, Clone)]
pub(super) enum Script {
    Reply(String),
    Unavailable,
    Stall(Duration),
}

/// Provider double that replays a script and records the prompts it received.
#[derive(Debug)]
pub(super) struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<PromptMessages>>,
}

impl ScriptedProvider {
    pub(super) fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn replying(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn prompts(&self) -> Vec<PromptMessages> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

impl AssessmentProvider for ScriptedProvider {
    async fn complete(&self, prompt: &PromptMessages) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.clone());

        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Unavailable => Err(ProviderError::Status(503)),
            Script::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(PROVIDER_REPLY.to_string())
            }
        }
    }
}

pub(super) fn catalog_only_service() -> AssessmentService<ScriptedProvider> {
    AssessmentService::new(catalog(), None)
}

pub(super) fn service_with(
    provider: Arc<ScriptedProvider>,
) -> AssessmentService<ScriptedProvider> {
    AssessmentService::new(catalog(), Some(provider))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
