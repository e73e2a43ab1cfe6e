//! Prompt templates for the LLM-backed report generator.

pub const REPORT_SYSTEM: &str = "You are a career analyst producing a \"genius map\" — a \
narrative synthesis of a person's self-assessment. You receive the raw assessment record as \
JSON. Respond with ONLY a valid JSON object, no markdown, matching this camelCase shape: \
{\"geniusZone\": {\"core\": string, \"strengths\": [string], \"opportunities\": [string]}, \
\"recommendations\": {\"immediate\": [string], \"strategic\": [string], \"development\": [string]}, \
\"idealProfile\": {\"role\": string, \"environment\": string, \"conditions\": [string]}, \
\"riskFactors\": [string], \"nextSteps\": [string], \"careerRoadmap\": [string], \
\"positioningStrategies\": [string], \"developmentPlan\": [string]}. \
Every statement must be grounded in the record — never invent facts about the person.";

pub const REPORT_PROMPT_TEMPLATE: &str = "\
Report variant: {report_type}
{variant_instruction}

Assessment record:
{record_json}
";

/// Per-variant emphasis, mirroring the three report offerings.
pub fn variant_instruction(report_type: &str) -> &'static str {
    match report_type {
        "executive" => {
            "Produce a tight 2-3 page synthesis: genius zone, strategic positioning and next \
             steps. Leave careerRoadmap, positioningStrategies and developmentPlan as empty lists."
        }
        "strategic" => {
            "Produce an action plan: populate careerRoadmap, positioningStrategies and \
             developmentPlan thoroughly alongside the core sections."
        }
        _ => {
            "Produce the full detailed analysis: behavioral patterns, symbolic map and \
             unconscious patterns woven into every section, all lists populated."
        }
    }
}
