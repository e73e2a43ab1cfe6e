//! Step completion policy — one presence rule per wizard step.
//!
//! Pure and total: safe to call on every render/navigation decision,
//! including against a fully empty record. No rule is satisfied by
//! emptiness, so the aggregate percentage only ever grows as fields
//! are filled in.

use serde::{Deserialize, Serialize};

use crate::assessment::record::{AssessmentRecord, SectionKey};

pub const STEP_COUNT: u8 = 10;

/// Static wizard step metadata, in step order.
const STEPS: &[(u8, &str, SectionKey)] = &[
    (1, "Structural Identity", SectionKey::PersonalInfo),
    (2, "Behavioral Profile", SectionKey::BehavioralProfile),
    (3, "Talents and Flow", SectionKey::TalentsAndFlow),
    (4, "Impact Markers", SectionKey::ImpactMarkers),
    (5, "Limits and Non-Negotiables", SectionKey::LimitsAndNonNegotiables),
    (6, "Symbolic Map", SectionKey::SymbolicMap),
    (7, "Unconscious Patterns", SectionKey::UnconsciousPatterns),
    (8, "Strategic Positioning", SectionKey::StrategicPositioning),
    (9, "Ideal Conditions", SectionKey::IdealConditions),
    (10, "Final Synthesis", SectionKey::FinalSynthesis),
];

/// Whether a step's designated required field(s) are filled in.
/// Unknown step numbers return false.
pub fn is_step_complete(step: u8, record: &AssessmentRecord) -> bool {
    match step {
        1 => {
            record.text(SectionKey::PersonalInfo, "fullName").is_some()
                && record.text(SectionKey::PersonalInfo, "birthDate").is_some()
        }
        2 => !record
            .list(SectionKey::BehavioralProfile, "traitKeywords")
            .is_empty(),
        3 => !record
            .list(SectionKey::TalentsAndFlow, "flowMoments")
            .is_empty(),
        4 => !record
            .list(SectionKey::ImpactMarkers, "highImpactProjects")
            .is_empty(),
        5 => !record
            .list(SectionKey::LimitsAndNonNegotiables, "willNotDoAnymore")
            .is_empty(),
        6 => record
            .number(SectionKey::SymbolicMap, "lifePathNumber")
            .is_some_and(|n| n != 0.0),
        7 => !record
            .list(SectionKey::UnconsciousPatterns, "recurringPatterns")
            .is_empty(),
        8 => !record
            .list(SectionKey::StrategicPositioning, "areasOfInterest")
            .is_empty(),
        9 => !record
            .list(SectionKey::IdealConditions, "workModel")
            .is_empty(),
        10 => record
            .text(SectionKey::FinalSynthesis, "potencyDescription")
            .is_some(),
        _ => false,
    }
}

/// Completed steps out of ten, rounded to the nearest percent.
pub fn completion_percentage(record: &AssessmentRecord) -> u8 {
    let completed = (1..=STEP_COUNT)
        .filter(|&step| is_step_complete(step, record))
        .count();
    ((completed as f64 / STEP_COUNT as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStatus {
    pub number: u8,
    pub title: String,
    pub section: SectionKey,
    pub complete: bool,
}

/// Aggregate progress view served to the wizard UI: the advance control
/// is disabled client-side when the active step is incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub percentage: u8,
    pub completed_steps: usize,
    pub steps: Vec<StepStatus>,
}

pub fn compute_progress(record: &AssessmentRecord) -> ProgressReport {
    let steps: Vec<StepStatus> = STEPS
        .iter()
        .map(|&(number, title, section)| StepStatus {
            number,
            title: title.to_string(),
            section,
            complete: is_step_complete(number, record),
        })
        .collect();

    let completed_steps = steps.iter().filter(|s| s.complete).count();

    ProgressReport {
        percentage: completion_percentage(record),
        completed_steps,
        steps,
    }
}
