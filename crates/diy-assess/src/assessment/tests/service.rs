use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;

use super::common::*;
use crate::assessment::domain::{AssessmentSource, Decision, JobKey, SkillLevel};
use crate::assessment::service::unknown_job_output;

#[tokio::test]
async fn catalog_path_scores_matched_job() {
    let service = catalog_only_service();
    assert!(!service.has_provider());

    let assessment = service
        .assess(&input("I need to hang a shelf in my bedroom", SkillLevel::Novice))
        .await;

    assert_eq!(assessment.source, AssessmentSource::Catalog(JobKey("hang_shelf")));
    assert_eq!(assessment.output.score, 40);
    assert_eq!(assessment.output.decision, Decision::Diy);
}

#[tokio::test]
async fn unmatched_text_returns_conservative_default() {
    let service = catalog_only_service();

    let assessment = service
        .assess(&input("quantum entanglement repair", SkillLevel::Advanced))
        .await;

    assert_eq!(assessment.source, AssessmentSource::UnknownJob);
    assert_eq!(assessment.output, unknown_job_output());
    assert_eq!(assessment.output.decision, Decision::GetAPro);
    assert_eq!(assessment.output.score, 75);
    assert!(assessment.output.steps.is_empty());
    assert!(assessment.output.tools.is_empty());
    assert!(assessment.output.materials.is_empty());
    assert_eq!(assessment.output.rationale.len(), 2);
    assert_eq!(assessment.output.safety.len(), 1);
}

#[tokio::test]
async fn provider_result_wins_when_valid() {
    let provider = Arc::new(ScriptedProvider::replying(PROVIDER_REPLY));
    let service = service_with(provider.clone());

    let assessment = service
        .assess(&input("hang a shelf", SkillLevel::Novice).with_tags(["bedroom", "stud wall"]))
        .await;

    assert_eq!(assessment.source, AssessmentSource::Provider);
    assert_eq!(assessment.output.score, 22);
    assert_eq!(assessment.output.duration_min, Some(30));
    assert_eq!(assessment.output.cost_high, Some(20.0));
    assert_eq!(provider.calls(), 1);

    let prompts = provider.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].user.contains("hang a shelf"));
    assert!(prompts[0].user.contains("Skill level: novice"));
    assert!(prompts[0].user.contains("bedroom, stud wall"));
}

#[tokio::test]
async fn provider_error_falls_back_to_catalog_without_retry() {
    let provider = Arc::new(ScriptedProvider::new(Script::Unavailable));
    let service = service_with(provider.clone());

    let assessment = service
        .assess(&input("replace a ceiling light fixture", SkillLevel::Novice))
        .await;

    assert_eq!(
        assessment.source,
        AssessmentSource::Catalog(JobKey("fit_light_fixture"))
    );
    assert_eq!(assessment.output.score, 100);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn malformed_provider_reply_falls_back() {
    let provider = Arc::new(ScriptedProvider::replying(
        "Sure! Here is your assessment: it is fine.",
    ));
    let service = service_with(provider.clone());

    let assessment = service
        .assess(&input("replace a ceiling light fixture", SkillLevel::Advanced))
        .await;

    assert_eq!(assessment.output.score, 80);
    assert_eq!(assessment.output.decision, Decision::GetAPro);
    assert!(assessment.output.duration_min.is_none());
}

#[tokio::test]
async fn provider_decision_contradicting_its_score_falls_back() {
    let provider = Arc::new(ScriptedProvider::replying(
        r#"{"decision":"DIY","score":95,"rationale":["Go for it."],"steps":[],"tools":[],"materials":[],"safety":[]}"#,
    ));
    let service = service_with(provider.clone());

    let assessment = service
        .assess(&input("hang a shelf", SkillLevel::Novice))
        .await;

    assert_eq!(assessment.source, AssessmentSource::Catalog(JobKey("hang_shelf")));
    assert_eq!(assessment.output.score, 40);
    assert_eq!(assessment.output.decision, Decision::Diy);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn provider_failure_on_unknown_job_still_returns_default() {
    let provider = Arc::new(ScriptedProvider::new(Script::Unavailable));
    let service = service_with(provider);

    let assessment = service
        .assess(&input("quantum entanglement repair", SkillLevel::Novice))
        .await;

    assert_eq!(assessment.source, AssessmentSource::UnknownJob);
}

#[tokio::test]
async fn slow_provider_is_abandoned_after_timeout() {
    let provider = Arc::new(ScriptedProvider::new(Script::Stall(Duration::from_secs(30))));
    let service = service_with(provider.clone()).with_provider_timeout(Duration::from_millis(50));

    let started = Instant::now();
    let assessment = service
        .assess(&input("paint the spare room", SkillLevel::Novice))
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(assessment.source, AssessmentSource::Catalog(JobKey("paint_wall")));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn assess_json_normalizes_raw_payloads() {
    let service = catalog_only_service();

    let output = service
        .assess_json(&json!({
            "description": "replace a ceiling light fixture",
            "skillLevel": "wizard",
            "tags": "not-an-array",
        }))
        .await;
    // invalid skill level reads as novice
    assert_eq!(output.score, 100);

    let output = service.assess_json(&json!(["not", "an", "object"])).await;
    assert_eq!(output, unknown_job_output());
}
