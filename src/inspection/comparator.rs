//! Parameter comparison capability
//!
//! The orchestrator depends only on [`ParameterComparator`]; [`KeyedComparator`]
//! is the default strategy.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::inspection::{ActualParameterSet, InspectionDiff, StandardParameterSet, ValueMismatch};

/// Tolerance for numerically compared properties.
const NUMERIC_TOLERANCE: f64 = 1e-9;

// == Parameter Comparator ==
pub trait ParameterComparator: Send + Sync {
    /// Diffs `actual` against `standard`.
    ///
    /// `compare_props` are compared as text, `compute_props` numerically.
    fn compare(
        &self,
        standard: &StandardParameterSet,
        actual: &ActualParameterSet,
        compare_props: &[String],
        compute_props: &[String],
    ) -> Result<InspectionDiff>;
}

// == Keyed Comparator ==
/// Compares property by property.
///
/// With an empty `compare_props` every property of either set is compared.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyedComparator;

impl KeyedComparator {
    pub fn new() -> Self {
        Self
    }

    fn values_match(stored: &str, actual: &str, numeric: bool) -> bool {
        if stored == actual {
            return true;
        }
        if numeric {
            if let (Ok(s), Ok(a)) = (stored.trim().parse::<f64>(), actual.trim().parse::<f64>()) {
                return s == a || (s - a).abs() <= NUMERIC_TOLERANCE;
            }
        }
        false
    }
}

impl ParameterComparator for KeyedComparator {
    fn compare(
        &self,
        standard: &StandardParameterSet,
        actual: &ActualParameterSet,
        compare_props: &[String],
        compute_props: &[String],
    ) -> Result<InspectionDiff> {
        let properties: BTreeSet<&str> = if compare_props.is_empty() {
            standard
                .parameters
                .keys()
                .chain(actual.parameter_values.keys())
                .map(String::as_str)
                .collect()
        } else {
            compare_props
                .iter()
                .chain(compute_props)
                .map(String::as_str)
                .collect()
        };

        let mut diff = InspectionDiff::default();
        for property in properties {
            let numeric = compute_props.iter().any(|p| p == property);
            match (
                standard.parameters.get(property),
                actual.parameter_values.get(property),
            ) {
                (Some(stored), None) => {
                    diff.missing_in_actual.insert(property.to_string(), stored.clone());
                }
                (None, Some(value)) => {
                    diff.extra_in_actual.insert(property.to_string(), value.clone());
                }
                (Some(stored), Some(value)) if !Self::values_match(stored, value, numeric) => {
                    diff.differing.insert(
                        property.to_string(),
                        ValueMismatch::new(stored.clone(), value.clone()),
                    );
                }
                _ => {}
            }
        }
        Ok(diff)
    }
}
