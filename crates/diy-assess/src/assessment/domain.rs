use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier of a catalog job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey(pub &'static str);

impl JobKey {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Self-reported competence of the person doing the job.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    #[default]
    Novice,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Ordinal used by the scoring arithmetic.
    pub fn ordinal(self) -> i32 {
        match self {
            SkillLevel::Novice => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::Novice => "novice",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "novice" => Some(Self::Novice),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hazards a job can carry. Declaration order is the order penalties apply in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskFlag {
    Electrical,
    Plumbing,
    Structural,
    WorkingAtHeight,
}

impl RiskFlag {
    pub fn label(self) -> &'static str {
        match self {
            RiskFlag::Electrical => "electrical",
            RiskFlag::Plumbing => "plumbing",
            RiskFlag::Structural => "structural",
            RiskFlag::WorkingAtHeight => "working at height",
        }
    }
}

/// The canonical hazard set. Every flag is always present and defaults to false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskFlags {
    pub electrical: bool,
    pub plumbing: bool,
    pub structural: bool,
    pub working_at_height: bool,
}

impl RiskFlags {
    pub const NONE: RiskFlags = RiskFlags {
        electrical: false,
        plumbing: false,
        structural: false,
        working_at_height: false,
    };

    pub fn is_set(&self, flag: RiskFlag) -> bool {
        match flag {
            RiskFlag::Electrical => self.electrical,
            RiskFlag::Plumbing => self.plumbing,
            RiskFlag::Structural => self.structural,
            RiskFlag::WorkingAtHeight => self.working_at_height,
        }
    }

    pub fn active(&self) -> Vec<RiskFlag> {
        [
            RiskFlag::Electrical,
            RiskFlag::Plumbing,
            RiskFlag::Structural,
            RiskFlag::WorkingAtHeight,
        ]
        .into_iter()
        .filter(|flag| self.is_set(*flag))
        .collect()
    }
}

/// Immutable description of a job the catalog knows how to score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub key: JobKey,
    pub name: &'static str,
    pub base_difficulty: u8,
    pub risk_flags: RiskFlags,
    pub steps: Vec<&'static str>,
    pub tools: BTreeSet<&'static str>,
    pub materials: BTreeSet<&'static str>,
    pub safety_notes: Vec<&'static str>,
}

/// Normalized request handed to the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssessmentInput {
    pub description: String,
    pub skill_level: SkillLevel,
    pub tags: Vec<String>,
    pub postcode: Option<String>,
}

impl AssessmentInput {
    pub fn new(description: impl Into<String>, skill_level: SkillLevel) -> Self {
        Self {
            description: description.into(),
            skill_level,
            ..Self::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Build an input from an arbitrary JSON payload, substituting defaults for
    /// anything missing or of the wrong type. Never fails.
    pub fn from_json(payload: &Value) -> Self {
        let description = payload
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let skill_level = payload
            .get("skillLevel")
            .and_then(Value::as_str)
            .and_then(SkillLevel::from_label)
            .unwrap_or_default();

        let tags = payload
            .get("tags")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let postcode = payload
            .get("postcode")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            description,
            skill_level,
            tags,
            postcode,
        }
    }

    /// Lowercased description followed by the space-joined tags.
    pub fn search_text(&self) -> String {
        let mut text = self.description.clone();
        if !self.tags.is_empty() {
            text.push(' ');
            text.push_str(&self.tags.join(" "));
        }
        text.to_lowercase()
    }
}

/// Final recommendation. Serialized with the labels shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "DIY")]
    Diy,
    #[serde(rename = "Get a Pro")]
    GetAPro,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Diy => "DIY",
            Decision::GetAPro => "Get a Pro",
        }
    }
}

/// Response body of an assessment, regardless of which stage produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssessmentOutput {
    pub decision: Decision,
    pub score: u8,
    pub rationale: Vec<String>,
    pub steps: Vec<String>,
    pub tools: Vec<String>,
    pub materials: Vec<String>,
    pub safety: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_high: Option<f64>,
}

/// Stage of the pipeline that produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentSource {
    Provider,
    Catalog(JobKey),
    UnknownJob,
}

impl AssessmentSource {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentSource::Provider => "provider",
            AssessmentSource::Catalog(_) => "catalog",
            AssessmentSource::UnknownJob => "unknown_job",
        }
    }
}

/// Output paired with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub output: AssessmentOutput,
    pub source: AssessmentSource,
}
