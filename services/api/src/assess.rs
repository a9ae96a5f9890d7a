use crate::infra::build_assessment_service;
use clap::Args;
use diy_assess::assessment::{
    Assessment, AssessmentInput, AssessmentSource, JobCatalog, RiskFlag, SkillLevel,
};
use diy_assess::config::AppConfig;
use diy_assess::error::AppError;
use diy_assess::telemetry;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Free-text description of the job
    #[arg(long)]
    pub(crate) description: String,
    /// Self-reported skill level: novice, intermediate or advanced
    #[arg(long, default_value = "novice", value_parser = parse_skill_level)]
    pub(crate) skill_level: SkillLevel,
    /// Extra keywords describing the job (repeatable)
    #[arg(long = "tag")]
    pub(crate) tags: Vec<String>,
    /// Postcode of the job location
    #[arg(long)]
    pub(crate) postcode: Option<String>,
    /// Print the JSON response body instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn parse_skill_level(raw: &str) -> Result<SkillLevel, String> {
    SkillLevel::from_label(raw).ok_or_else(|| {
        format!("unknown skill level '{raw}' (expected novice, intermediate or advanced)")
    })
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        description,
        skill_level,
        tags,
        postcode,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = build_assessment_service(&config.provider)?;

    let mut input = AssessmentInput::new(description, skill_level).with_tags(tags);
    input.postcode = postcode;

    let assessment = service.assess(&input).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment.output)?);
    } else {
        print!("{}", render_assessment(&assessment));
    }

    Ok(())
}

pub(crate) fn run_jobs() -> Result<(), AppError> {
    let catalog = JobCatalog::standard()?;
    print!("{}", render_jobs(&catalog));
    Ok(())
}

fn render_assessment(assessment: &Assessment) -> String {
    let output = &assessment.output;
    let source = match assessment.source {
        AssessmentSource::Provider => "language model".to_string(),
        AssessmentSource::Catalog(key) => format!("job catalog ({key})"),
        AssessmentSource::UnknownJob => "no matching job".to_string(),
    };

    let mut report = format!(
        "Decision: {} (risk score {}/100)\nSource: {}\n",
        output.decision.label(),
        output.score,
        source
    );

    if let Some(minutes) = output.duration_min {
        report.push_str(&format!("Estimated time: {minutes} min\n"));
    }
    if let (Some(low), Some(high)) = (output.cost_low, output.cost_high) {
        report.push_str(&format!("Estimated cost: {low:.2} - {high:.2}\n"));
    }

    push_section(&mut report, "Why", &output.rationale, false);
    push_section(&mut report, "Steps", &output.steps, true);
    push_section(&mut report, "Tools", &output.tools, false);
    push_section(&mut report, "Materials", &output.materials, false);
    push_section(&mut report, "Safety", &output.safety, false);
    report
}

fn push_section(report: &mut String, title: &str, items: &[String], numbered: bool) {
    if items.is_empty() {
        return;
    }
    report.push_str(&format!("\n{title}:\n"));
    for (position, item) in items.iter().enumerate() {
        if numbered {
            report.push_str(&format!("  {}. {}\n", position + 1, item));
        } else {
            report.push_str(&format!("  - {item}\n"));
        }
    }
}

fn render_jobs(catalog: &JobCatalog) -> String {
    let mut listing = String::from("Known jobs (matched in this order):\n");
    for job in catalog.definitions() {
        let flags = job.risk_flags.active();
        let hazards = if flags.is_empty() {
            "none".to_string()
        } else {
            flags
                .iter()
                .map(|flag: &RiskFlag| flag.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        listing.push_str(&format!(
            "- {} | {} | difficulty {}/10 | hazards: {}\n",
            job.key, job.name, job.base_difficulty, hazards
        ));
    }
    listing
}
