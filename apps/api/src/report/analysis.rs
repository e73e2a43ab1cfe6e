//! Template-based report generation — straight interpolation of record
//! fields into narrative lines. No model call, so it is the default
//! collaborator when no API key is configured.

use async_trait::async_trait;

use crate::assessment::record::{AssessmentRecord, SectionKey};
use crate::errors::AppError;
use crate::report::{
    AnalysisResult, GeniusZone, IdealProfile, Recommendations, ReportGenerator, ReportType,
};

pub struct TemplateGenerator;

#[async_trait]
impl ReportGenerator for TemplateGenerator {
    async fn generate(
        &self,
        record: &AssessmentRecord,
        report_type: ReportType,
    ) -> Result<AnalysisResult, AppError> {
        Ok(build_analysis(record, report_type))
    }
}

/// Takes up to `n` entries from a list field.
fn take(record: &AssessmentRecord, key: SectionKey, field: &str, n: usize) -> Vec<String> {
    let mut items = record.list(key, field);
    items.truncate(n);
    items
}

fn first(record: &AssessmentRecord, key: SectionKey, field: &str) -> Option<String> {
    record.list(key, field).into_iter().next()
}

/// Pushes an interpolated line only when its source field is present —
/// absent answers produce no line rather than a hole in the sentence.
fn push_line(lines: &mut Vec<String>, value: Option<&str>, template: impl Fn(&str) -> String) {
    if let Some(value) = value {
        lines.push(template(value));
    }
}

pub fn build_analysis(record: &AssessmentRecord, report_type: ReportType) -> AnalysisResult {
    let genius_zone = GeniusZone {
        core: record
            .text(SectionKey::FinalSynthesis, "greatestGift")
            .unwrap_or("Facilitating systemic transformations")
            .to_string(),
        strengths: [
            take(record, SectionKey::TalentsAndFlow, "flowMoments", 3),
            take(record, SectionKey::BehavioralProfile, "energizingSituations", 2),
        ]
        .concat(),
        opportunities: [
            take(record, SectionKey::StrategicPositioning, "areasOfInterest", 3),
            take(record, SectionKey::StrategicPositioning, "acceptableProjects", 2),
        ]
        .concat(),
    };

    let mut immediate = Vec::new();
    push_line(
        &mut immediate,
        record.text(SectionKey::FinalSynthesis, "greatestGift"),
        |v| format!("Lean on your core strength: {v}"),
    );
    push_line(
        &mut immediate,
        first(record, SectionKey::StrategicPositioning, "preferredRole").as_deref(),
        |v| format!("Focus your search on a {v} role"),
    );
    push_line(
        &mut immediate,
        record.text(SectionKey::FinalSynthesis, "mainProfessionalNeed"),
        |v| format!("Prioritize projects that meet your main need: {v}"),
    );

    let mut strategic = Vec::new();
    push_line(
        &mut strategic,
        record.text(SectionKey::TalentsAndFlow, "naturalTalent"),
        |v| format!("Keep developing: {v}"),
    );
    push_line(
        &mut strategic,
        first(record, SectionKey::LimitsAndNonNegotiables, "willNotDoAnymore").as_deref(),
        |v| format!("Avoid: {v}"),
    );
    push_line(
        &mut strategic,
        first(record, SectionKey::BehavioralProfile, "potentiatingEnvironments").as_deref(),
        |v| format!("Seek environments that {v}"),
    );

    let mut development = Vec::new();
    push_line(
        &mut development,
        first(record, SectionKey::UnconsciousPatterns, "patternsToHeal").as_deref(),
        |v| format!("Work through the pattern: {v}"),
    );
    push_line(
        &mut development,
        first(record, SectionKey::UnconsciousPatterns, "spiritualPractices").as_deref(),
        |v| format!("Strengthen the practice of {v}"),
    );
    push_line(
        &mut development,
        first(record, SectionKey::TalentsAndFlow, "challengesYouLove").as_deref(),
        |v| format!("Grow through challenges like {v}"),
    );

    let ideal_profile = IdealProfile {
        role: first(record, SectionKey::StrategicPositioning, "preferredRole")
            .unwrap_or_else(|| "Transformation Strategist".to_string()),
        environment: first(record, SectionKey::BehavioralProfile, "potentiatingEnvironments")
            .unwrap_or_else(|| "Collaborative, autonomous environment".to_string()),
        conditions: [
            take(record, SectionKey::LimitsAndNonNegotiables, "minimumConditions", 3),
            take(record, SectionKey::IdealConditions, "workModel", 2),
        ]
        .concat(),
    };

    let risk_factors = [
        take(record, SectionKey::LimitsAndNonNegotiables, "toxicRoutinesOrEnvironments", 2),
        take(record, SectionKey::LimitsAndNonNegotiables, "problematicLeadershipStyles", 2),
        take(record, SectionKey::StrategicPositioning, "rejectedProjects", 1),
    ]
    .concat();

    let mut next_steps = Vec::new();
    push_line(
        &mut next_steps,
        record.text(SectionKey::FinalSynthesis, "desiredVersion"),
        |v| format!("Pursue opportunities that realize: {v}"),
    );
    push_line(
        &mut next_steps,
        record.text(SectionKey::StrategicPositioning, "meaningfulWork"),
        |v| format!("Apply your talents to: {v}"),
    );
    push_line(
        &mut next_steps,
        first(record, SectionKey::StrategicPositioning, "areasOfInterest").as_deref(),
        |v| format!("Build a network within {v}"),
    );
    push_line(
        &mut next_steps,
        first(record, SectionKey::UnconsciousPatterns, "spiritualPractices").as_deref(),
        |v| format!("Keep up practices that ground you: {v}"),
    );
    push_line(
        &mut next_steps,
        first(record, SectionKey::UnconsciousPatterns, "patternsToHeal").as_deref(),
        |v| format!("Create a strategy to outgrow: {v}"),
    );

    // The plan lists are exclusive to the deeper variants.
    let (career_roadmap, positioning_strategies, development_plan) = match report_type {
        ReportType::Executive => (Vec::new(), Vec::new(), Vec::new()),
        ReportType::Strategic | ReportType::Detailed => (
            build_career_roadmap(record),
            build_positioning_strategies(record),
            build_development_plan(record),
        ),
    };

    AnalysisResult {
        genius_zone,
        recommendations: Recommendations {
            immediate,
            strategic,
            development,
        },
        ideal_profile,
        risk_factors,
        next_steps,
        career_roadmap,
        positioning_strategies,
        development_plan,
    }
}

fn build_career_roadmap(record: &AssessmentRecord) -> Vec<String> {
    let mut lines = Vec::new();
    push_line(
        &mut lines,
        first(record, SectionKey::PersonalInfo, "desiredRoles").as_deref(),
        |v| format!("Position yourself for a transition into {v}"),
    );
    push_line(
        &mut lines,
        first(record, SectionKey::StrategicPositioning, "areasOfInterest").as_deref(),
        |v| format!("Deepen your footprint in {v} over the next two quarters"),
    );
    push_line(
        &mut lines,
        record.text(SectionKey::PersonalInfo, "availability"),
        |v| format!("Plan the move around your availability: {v}"),
    );
    lines
}

fn build_positioning_strategies(record: &AssessmentRecord) -> Vec<String> {
    let mut lines = Vec::new();
    push_line(
        &mut lines,
        record.text(SectionKey::StrategicPositioning, "meaningfulWork"),
        |v| format!("Anchor your narrative on the work you find meaningful: {v}"),
    );
    push_line(
        &mut lines,
        record.text(SectionKey::TalentsAndFlow, "naturalTalent"),
        |v| format!("Make your natural talent visible: {v}"),
    );
    push_line(
        &mut lines,
        first(record, SectionKey::ImpactMarkers, "highImpactProjects").as_deref(),
        |v| format!("Lead conversations with your proven impact: {v}"),
    );
    lines
}

fn build_development_plan(record: &AssessmentRecord) -> Vec<String> {
    let mut lines = Vec::new();
    push_line(
        &mut lines,
        first(record, SectionKey::TalentsAndFlow, "challengesYouLove").as_deref(),
        |v| format!("Schedule recurring time for {v}"),
    );
    push_line(
        &mut lines,
        first(record, SectionKey::UnconsciousPatterns, "patternsToHeal").as_deref(),
        |v| format!("Track progress on the pattern you are healing: {v}"),
    );
    push_line(
        &mut lines,
        first(record, SectionKey::BehavioralProfile, "limitingEnvironments").as_deref(),
        |v| format!("Reduce exposure to environments that limit you: {v}"),
    );
    lines
}
