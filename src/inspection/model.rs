//! Inspection data model
//!
//! Parameter sets, template records, the comparator's three-way diff and the
//! inspection verdict.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source tag stamped on every inspection result.
pub const SOURCE_AA_LIST: &str = "aa-list";

// == Actual Parameter Set ==
/// Parameters reported by one equipment unit for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActualParameterSet {
    pub sim_id: String,
    pub module_id: String,
    #[serde(default = "Utc::now")]
    pub received_time: DateTime<Utc>,
    #[serde(default)]
    pub parameter_values: BTreeMap<String, String>,
}

impl ActualParameterSet {
    pub fn new(sim_id: impl Into<String>, module_id: impl Into<String>) -> Self {
        Self {
            sim_id: sim_id.into(),
            module_id: module_id.into(),
            received_time: Utc::now(),
            parameter_values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameter_values.insert(property.into(), value.into());
        self
    }
}

// == Standard Parameter Set ==
/// Baseline parameters of an equipment model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardParameterSet {
    pub parameters: BTreeMap<String, String>,
}

impl StandardParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(property.into(), value.into());
        self
    }
}

// == Template Status ==
/// Serialized as the integer status; `0` is offline, anything else online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum TemplateStatus {
    Offline,
    Online,
}

impl TemplateStatus {
    pub fn is_online(self) -> bool {
        self == TemplateStatus::Online
    }
}

impl From<i32> for TemplateStatus {
    fn from(value: i32) -> Self {
        if value == 0 {
            TemplateStatus::Offline
        } else {
            TemplateStatus::Online
        }
    }
}

impl From<TemplateStatus> for i32 {
    fn from(status: TemplateStatus) -> Self {
        match status {
            TemplateStatus::Offline => 0,
            TemplateStatus::Online => 1,
        }
    }
}

// == Template Info ==
/// Template summary for a module, as held in the durable store and cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub module_id: String,
    pub status: TemplateStatus,
    #[serde(default, alias = "tpl")]
    pub template: Option<StandardParameterSet>,
}

impl TemplateInfo {
    pub fn online(module_id: impl Into<String>, template: StandardParameterSet) -> Self {
        Self {
            module_id: module_id.into(),
            status: TemplateStatus::Online,
            template: Some(template),
        }
    }
}

// == Inspection Diff ==
/// A property whose stored and actual values disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMismatch {
    pub stored: String,
    pub actual: String,
}

impl ValueMismatch {
    pub fn new(stored: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            stored: stored.into(),
            actual: actual.into(),
        }
    }
}

/// Three-way diff between a standard and an actual parameter set.
///
/// Maps are ordered by property name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionDiff {
    /// In the standard, absent from the actual set (property -> standard value)
    pub missing_in_actual: BTreeMap<String, String>,
    /// In the actual set, absent from the standard (property -> actual value)
    pub extra_in_actual: BTreeMap<String, String>,
    pub differing: BTreeMap<String, ValueMismatch>,
}

impl InspectionDiff {
    pub fn has_missing(&self) -> bool {
        !self.missing_in_actual.is_empty()
    }

    pub fn has_extra(&self) -> bool {
        !self.extra_in_actual.is_empty()
    }

    pub fn has_incorrect(&self) -> bool {
        !self.differing.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_missing() && !self.has_extra() && !self.has_incorrect()
    }
}

// == Label ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Normal,
    Ignore,
}

// == Check Code ==
/// Inspection status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CheckCode {
    Normal = 0,
    MissingTemplate = 1,
    MissingParameters = 2,
    IncorrectValues = 3,
    ExtraParameters = 4,
    CompositeAnomaly = 5,
    TemplateOffline = 6,
    MissingTemplateDetail = 7,
}

impl CheckCode {
    /// Maps the diff flags to a code. Any two or three anomalies together are
    /// a composite anomaly.
    pub fn from_flags(has_missing: bool, has_extra: bool, has_incorrect: bool) -> Self {
        match (has_missing, has_extra, has_incorrect) {
            (false, false, false) => CheckCode::Normal,
            (true, false, false) => CheckCode::MissingParameters,
            (false, true, false) => CheckCode::ExtraParameters,
            (false, false, true) => CheckCode::IncorrectValues,
            _ => CheckCode::CompositeAnomaly,
        }
    }

    pub fn from_diff(diff: &InspectionDiff) -> Self {
        Self::from_flags(diff.has_missing(), diff.has_extra(), diff.has_incorrect())
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

// == Inspection Result ==
/// Verdict of one inspection call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub source: String,
    pub sim_id: String,
    pub module_id: String,
    pub checked_at: DateTime<Utc>,
    pub label: Label,
    pub code: i32,
    pub passed: bool,
    pub description: String,
}

impl InspectionResult {
    /// Builds a complete result; `passed` holds exactly when `code` is normal.
    pub fn new(
        actual: &ActualParameterSet,
        checked_at: DateTime<Utc>,
        label: Label,
        code: CheckCode,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: SOURCE_AA_LIST.to_string(),
            sim_id: actual.sim_id.clone(),
            module_id: actual.module_id.clone(),
            checked_at,
            label,
            code: code.code(),
            passed: code == CheckCode::Normal,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table_all_combinations() {
        let expected = [
            ((false, false, false), 0),
            ((true, false, false), 2),
            ((false, true, false), 4),
            ((false, false, true), 3),
            ((true, true, false), 5),
            ((true, false, true), 5),
            ((false, true, true), 5),
            ((true, true, true), 5),
        ];
        for ((missing, extra, incorrect), code) in expected {
            assert_eq!(
                CheckCode::from_flags(missing, extra, incorrect).code(),
                code,
                "flags ({}, {}, {})",
                missing,
                extra,
                incorrect
            );
        }
    }

    #[test]
    fn test_template_status_from_integer() {
        assert_eq!(TemplateStatus::from(0), TemplateStatus::Offline);
        assert_eq!(TemplateStatus::from(1), TemplateStatus::Online);
        assert_eq!(TemplateStatus::from(-3), TemplateStatus::Online);
    }

    #[test]
    fn test_template_info_deserialize() {
        let json = r#"{"moduleId":"M1","status":2,"tpl":{"aa1":"10"}}"#;
        let info: TemplateInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.module_id, "M1");
        assert!(info.status.is_online());
        assert_eq!(info.template.unwrap().parameters["aa1"], "10");
    }

    #[test]
    fn test_template_info_without_template() {
        let info: TemplateInfo = serde_json::from_str(r#"{"moduleId":"M1","status":0}"#).unwrap();
        assert_eq!(info.status, TemplateStatus::Offline);
        assert!(info.template.is_none());
    }

    #[test]
    fn test_actual_set_defaults() {
        let actual: ActualParameterSet =
            serde_json::from_str(r#"{"simId":"S1","moduleId":"M1"}"#).unwrap();
        assert!(actual.parameter_values.is_empty());
    }

    #[test]
    fn test_result_serializes_label_and_code() {
        let actual = ActualParameterSet::new("S1", "M1");
        let result = InspectionResult::new(
            &actual,
            Utc::now(),
            Label::Ignore,
            CheckCode::TemplateOffline,
            "Template Offline.",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["label"], "IGNORE");
        assert_eq!(json["code"], 6);
        assert_eq!(json["passed"], false);
        assert_eq!(json["source"], "aa-list");
        assert_eq!(json["simId"], "S1");
    }

    #[test]
    fn test_passed_only_for_normal() {
        let actual = ActualParameterSet::new("S1", "M1");
        let ok = InspectionResult::new(&actual, Utc::now(), Label::Normal, CheckCode::Normal, "Ok.");
        assert!(ok.passed);
        assert_eq!(ok.code, 0);
    }
}
