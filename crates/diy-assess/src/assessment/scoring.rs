use super::domain::{AssessmentOutput, Decision, JobDefinition, RiskFlag, SkillLevel};

/// Scores above this threshold are referred to a professional.
pub const PRO_THRESHOLD: i32 = 60;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 100;

const FEASIBLE_VERDICT: &str = "This task appears feasible for your skill level.";
const RISKY_VERDICT: &str = "This task may be too challenging or risky for you.";

const ELECTRICAL_NOTE: &str =
    "This job involves electrical work, which carries a risk of shock or fire.";
const ELECTRICAL_CAUTION: &str = "Electrical work should only be attempted by experienced DIYers; \
consider hiring a qualified electrician.";
const PLUMBING_NOTE: &str =
    "This job involves plumbing, where mistakes can cause leaks and water damage.";
const HEIGHT_NOTE: &str = "This job requires working at height, which adds a risk of falls.";

/// Discrete contribution to a score, kept for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreComponent {
    pub label: &'static str,
    pub points: i32,
}

/// Score breakdown before it is rendered into an [`AssessmentOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    pub components: Vec<ScoreComponent>,
    pub score: u8,
    pub decision: Decision,
    pub rationale: Vec<String>,
}

/// The decision a score implies: above [`PRO_THRESHOLD`] means a professional.
pub fn decision_for(score: i32) -> Decision {
    if score > PRO_THRESHOLD {
        Decision::GetAPro
    } else {
        Decision::Diy
    }
}

/// Apply the risk rubric for `skill_level` to `job`.
pub fn score_card(job: &JobDefinition, skill_level: SkillLevel) -> ScoreCard {
    let skill = skill_level.ordinal();
    let mut components = Vec::new();
    let mut rationale = Vec::new();

    let base = i32::from(job.base_difficulty) * 10;
    components.push(ScoreComponent {
        label: "base difficulty",
        points: base,
    });

    for flag in job.risk_flags.active() {
        match flag {
            RiskFlag::Electrical => {
                components.push(ScoreComponent {
                    label: flag.label(),
                    points: 20,
                });
                rationale.push(ELECTRICAL_NOTE.to_string());
                if skill < SkillLevel::Advanced.ordinal() {
                    rationale.push(ELECTRICAL_CAUTION.to_string());
                }
            }
            RiskFlag::Plumbing => {
                components.push(ScoreComponent {
                    label: flag.label(),
                    points: 10,
                });
                rationale.push(PLUMBING_NOTE.to_string());
            }
            RiskFlag::WorkingAtHeight => {
                components.push(ScoreComponent {
                    label: flag.label(),
                    points: 10,
                });
                rationale.push(HEIGHT_NOTE.to_string());
            }
            // Carried in the data model without a penalty.
            RiskFlag::Structural => {}
        }
    }

    let discount = (skill - 1) * 10;
    if discount > 0 {
        components.push(ScoreComponent {
            label: "skill discount",
            points: -discount,
        });
    }

    let raw: i32 = components.iter().map(|component| component.points).sum();
    let score = raw.clamp(MIN_SCORE, MAX_SCORE);

    let decision = decision_for(score);

    let verdict = match decision {
        Decision::Diy => FEASIBLE_VERDICT,
        Decision::GetAPro => RISKY_VERDICT,
    };
    rationale.insert(0, verdict.to_string());

    ScoreCard {
        components,
        // Clamped to 1..=100 above.
        score: score as u8,
        decision,
        rationale,
    }
}

/// Score a catalog job and copy its guidance into a fresh output.
pub fn score(job: &JobDefinition, skill_level: SkillLevel) -> AssessmentOutput {
    let card = score_card(job, skill_level);

    AssessmentOutput {
        decision: card.decision,
        score: card.score,
        rationale: card.rationale,
        steps: owned(job.steps.iter()),
        tools: owned(job.tools.iter()),
        materials: owned(job.materials.iter()),
        safety: owned(job.safety_notes.iter()),
        duration_min: None,
        cost_low: None,
        cost_high: None,
    }
}

fn owned<'a>(items: impl Iterator<Item = &'a &'static str>) -> Vec<String> {
    items.map(|item| item.to_string()).collect()
}
