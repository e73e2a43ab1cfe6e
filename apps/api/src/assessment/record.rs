//! The aggregate assessment record — ten fixed sections, each a flat
//! field map, built incrementally with per-field last-write-wins merges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The ten fixed section keys of the genius map questionnaire.
///
/// Wire names are camelCase to stay byte-compatible with the persisted
/// `geniusMapAssessment` blob layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    PersonalInfo,
    BehavioralProfile,
    TalentsAndFlow,
    ImpactMarkers,
    LimitsAndNonNegotiables,
    SymbolicMap,
    UnconsciousPatterns,
    StrategicPositioning,
    IdealConditions,
    FinalSynthesis,
}

/// A flat field map: scalars, strings, or string sequences.
pub type SectionData = Map<String, Value>;

/// The single aggregate entity. Sections are independent; partial or
/// absent sections are valid. Serializes to exactly the section-keyed
/// JSON object the original storage layout uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(flatten)]
    sections: BTreeMap<SectionKey, SectionData>,
}

impl AssessmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Map::is_empty)
    }

    pub fn section(&self, key: SectionKey) -> Option<&SectionData> {
        self.sections.get(&key)
    }

    /// Shallow-merges `partial` into the section at `key`, creating the
    /// section if absent. Only fields present in `partial` are replaced;
    /// everything else is preserved (last-write-wins per field).
    pub fn merge_section(&mut self, key: SectionKey, partial: SectionData) {
        let section = self.sections.entry(key).or_default();
        for (field, value) in partial {
            section.insert(field, value);
        }
    }

    /// Non-empty string field accessor, `None` for absent/blank/non-string.
    pub fn text(&self, key: SectionKey, field: &str) -> Option<&str> {
        self.section(key)?
            .get(field)?
            .as_str()
            .filter(|s| !s.trim().is_empty())
    }

    /// String-sequence field accessor; absent or non-array fields yield
    /// an empty list. Non-string elements are skipped.
    pub fn list(&self, key: SectionKey, field: &str) -> Vec<String> {
        self.section(key)
            .and_then(|s| s.get(field))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Numeric field accessor, `None` for absent/non-numeric.
    pub fn number(&self, key: SectionKey, field: &str) -> Option<f64> {
        self.section(key)?.get(field)?.as_f64()
    }
}
