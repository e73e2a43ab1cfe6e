//! Report generation — turns a (partial) assessment record into a
//! structured genius-map analysis.
//!
//! The core contract is shape-only: the service checks the collaborator
//! returned a populated `AnalysisResult`, never the semantic quality of
//! its content.

pub mod analysis;
pub mod handlers;
pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::assessment::record::AssessmentRecord;
use crate::errors::AppError;

/// The three report variants offered after the wizard completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// 2–3 page strategic synthesis.
    Executive,
    /// Full 8–12 page analysis.
    Detailed,
    /// 6–8 page action plan.
    Strategic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeniusZone {
    pub core: String,
    pub strengths: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<String>,
    pub strategic: Vec<String>,
    pub development: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealProfile {
    pub role: String,
    pub environment: String,
    pub conditions: Vec<String>,
}

/// The structured result grouping a genius-zone summary, prioritized
/// recommendation lists, an ideal-profile descriptor, risk factors and
/// next steps. The three plan lists are only populated for the
/// `strategic` and `detailed` variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub genius_zone: GeniusZone,
    pub recommendations: Recommendations,
    pub ideal_profile: IdealProfile,
    pub risk_factors: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub career_roadmap: Vec<String>,
    #[serde(default)]
    pub positioning_strategies: Vec<String>,
    #[serde(default)]
    pub development_plan: Vec<String>,
}

/// Pluggable report generator. Default: `TemplateGenerator` (pure field
/// interpolation). Swapped for `LlmGenerator` when ANTHROPIC_API_KEY is
/// set.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        record: &AssessmentRecord,
        report_type: ReportType,
    ) -> Result<AnalysisResult, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_type_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_value(ReportType::Executive).unwrap(), json!("executive"));
        let parsed: ReportType = serde_json::from_value(json!("strategic")).unwrap();
        assert_eq!(parsed, ReportType::Strategic);
    }

    #[test]
    fn test_analysis_result_tolerates_missing_plan_lists() {
        // Collaborators that predate the plan lists still deserialize.
        let json = json!({
            "geniusZone": {"core": "x", "strengths": [], "opportunities": []},
            "recommendations": {"immediate": [], "strategic": [], "development": []},
            "idealProfile": {"role": "r", "environment": "e", "conditions": []},
            "riskFactors": [],
            "nextSteps": []
        });
        let result: AnalysisResult = serde_json::from_value(json).unwrap();
        assert!(result.career_roadmap.is_empty());
        assert!(result.development_plan.is_empty());
    }

    #[test]
    fn test_analysis_result_wire_shape_is_camel_case() {
        let result = AnalysisResult {
            genius_zone: GeniusZone {
                core: "clarity".to_string(),
                strengths: vec![],
                opportunities: vec![],
            },
            recommendations: Recommendations {
                immediate: vec![],
                strategic: vec![],
                development: vec![],
            },
            ideal_profile: IdealProfile {
                role: "strategist".to_string(),
                environment: "remote".to_string(),
                conditions: vec![],
            },
            risk_factors: vec![],
            next_steps: vec![],
            career_roadmap: vec![],
            positioning_strategies: vec![],
            development_plan: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["geniusZone"]["core"], json!("clarity"));
        assert!(value.get("idealProfile").is_some());
        assert!(value.get("riskFactors").is_some());
    }
}
