use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const COST_PER_UNIT_PRECISION: u32 = 4;
pub const UNITS_PER_COST_PRECISION: u32 = 5;
pub const FREE_UNITS_PRECISION: u32 = 5;

pub const DEFAULT_COST_PER_UNIT: f64 = 0.0;
pub const DEFAULT_UNITS_PER_COST: f64 = 1.0;
pub const DEFAULT_FREE_UNITS: f64 = 0.0;

/// Rounds half away from zero to `places` decimals. Values too large to
/// scale have no fractional digits left and come back unchanged.
pub fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    Count,
    Sum,
    Max,
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationType::Count => "count",
            AggregationType::Sum => "sum",
            AggregationType::Max => "max",
        };
        f.write_str(name)
    }
}

/// An event stream that usage can be billed on.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillableMetric {
    pub event_name: String,
    #[serde(default)]
    pub property_name: Option<String>,
    pub aggregation_type: AggregationType,
}

impl BillableMetric {
    /// Name shown in metric pickers and stored on plan components.
    pub fn metric_name(&self) -> String {
        match &self.property_name {
            Some(property) => format!(
                "{}({}) of {}",
                self.aggregation_type, property, self.event_name
            ),
            None => self.event_name.clone(),
        }
    }

    pub fn same_definition(&self, other: &BillableMetric) -> bool {
        self.event_name == other.event_name
            && self.property_name == other.property_name
            && self.aggregation_type == other.aggregation_type
    }
}

/// Metric plus its display name, as returned by the metrics endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BillableMetricSummary {
    #[serde(flatten)]
    pub metric: BillableMetric,
    pub metric_name: String,
}

impl From<BillableMetric> for BillableMetricSummary {
    fn from(metric: BillableMetric) -> Self {
        let metric_name = metric.metric_name();
        Self {
            metric,
            metric_name,
        }
    }
}

/// A metered pricing line item that has not been saved yet.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UsageComponentDraft {
    #[serde(rename = "billable_metric")]
    pub metric: String,
    #[serde(rename = "cost_per_metric", default)]
    pub cost_per_unit: f64,
    #[serde(rename = "metric_amount_per_cost", default = "default_units_per_cost")]
    pub units_per_cost: f64,
    #[serde(rename = "free_metric_quantity", default)]
    pub free_units: f64,
}

fn default_units_per_cost() -> f64 {
    DEFAULT_UNITS_PER_COST
}

impl UsageComponentDraft {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            cost_per_unit: DEFAULT_COST_PER_UNIT,
            units_per_cost: DEFAULT_UNITS_PER_COST,
            free_units: DEFAULT_FREE_UNITS,
        }
    }

    /// Applies the same normalization the editor applies to its inputs.
    pub fn normalized(self) -> Self {
        Self {
            metric: self.metric,
            cost_per_unit: normalize_cost_per_unit(Some(self.cost_per_unit)),
            units_per_cost: normalize_units_per_cost(Some(self.units_per_cost)),
            free_units: normalize_free_units(Some(self.free_units)),
        }
    }

    /// Only the metric can make a draft invalid.
    pub fn validate(&self, allowed_metrics: &BTreeSet<String>) -> Result<(), DraftError> {
        match check_metric(Some(self.metric.as_str()), allowed_metrics) {
            Some(error) => Err(DraftError::Invalid(vec![error])),
            None => Ok(()),
        }
    }
}

/// A stored plan component.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanComponent {
    pub id: u64,
    #[serde(flatten)]
    pub draft: UsageComponentDraft,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Metric,
    CostPerUnit,
    UnitsPerCost,
    FreeUnits,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DraftError {
    #[error("invalid draft: {}", format_field_errors(.0))]
    Invalid(Vec<FieldError>),
}

impl DraftError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DraftError::Invalid(errors) => errors,
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn check_metric(
    metric: Option<&str>,
    allowed_metrics: &BTreeSet<String>,
) -> Option<FieldError> {
    match metric {
        None | Some("") => Some(FieldError {
            field: DraftField::Metric,
            message: "Please select a metric".into(),
        }),
        Some(name) if !allowed_metrics.contains(name) => Some(FieldError {
            field: DraftField::Metric,
            message: format!("Unknown metric: {name}"),
        }),
        Some(_) => None,
    }
}

/// Blank or non-finite falls back to the default; negatives clamp to zero.
pub fn normalize_cost_per_unit(value: Option<f64>) -> f64 {
    match value.filter(|v| v.is_finite()) {
        Some(v) => round_to(v.max(0.0), COST_PER_UNIT_PRECISION),
        None => DEFAULT_COST_PER_UNIT,
    }
}

pub fn normalize_units_per_cost(value: Option<f64>) -> f64 {
    match value.filter(|v| v.is_finite()) {
        Some(v) => round_to(v, UNITS_PER_COST_PRECISION),
        None => DEFAULT_UNITS_PER_COST,
    }
}

pub fn normalize_free_units(value: Option<f64>) -> f64 {
    match value.filter(|v| v.is_finite()) {
        Some(v) => round_to(v, FREE_UNITS_PRECISION),
        None => DEFAULT_FREE_UNITS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> BTreeSet<String> {
        ["api_calls", "storage_gb"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(2.000004, 5), 2.0);
        assert_eq!(round_to(-1.23456, 4), -1.2346);
    }

    #[test]
    fn test_round_to_keeps_huge_values_finite() {
        assert_eq!(round_to(1e305, 5), 1e305);
        assert_eq!(round_to(-f64::MAX, 4), -f64::MAX);
        assert_eq!(normalize_free_units(Some(1e305)), 1e305);
        assert_eq!(normalize_cost_per_unit(Some(f64::MAX)), f64::MAX);
        assert!(normalize_units_per_cost(Some(1e306)).is_finite());
    }

    #[test]
    fn test_normalizers_apply_defaults_and_precision() {
        assert_eq!(normalize_cost_per_unit(None), 0.0);
        assert_eq!(normalize_cost_per_unit(Some(-3.0)), 0.0);
        assert_eq!(normalize_cost_per_unit(Some(0.000149)), 0.0001);
        assert_eq!(normalize_units_per_cost(None), 1.0);
        assert_eq!(normalize_units_per_cost(Some(f64::NAN)), 1.0);
        assert_eq!(normalize_free_units(Some(10.123456)), 10.12346);
    }

    #[test]
    fn test_metric_name() {
        let calls = BillableMetric {
            event_name: "api_calls".into(),
            property_name: None,
            aggregation_type: AggregationType::Count,
        };
        assert_eq!(calls.metric_name(), "api_calls");

        let bytes = BillableMetric {
            event_name: "upload".into(),
            property_name: Some("bytes".into()),
            aggregation_type: AggregationType::Sum,
        };
        assert_eq!(bytes.metric_name(), "sum(bytes) of upload");
    }

    #[test]
    fn test_draft_validation() {
        assert!(UsageComponentDraft::new("api_calls").validate(&allowed()).is_ok());

        let err = UsageComponentDraft::new("gpu_hours")
            .validate(&allowed())
            .unwrap_err();
        assert_eq!(err.field_errors()[0].field, DraftField::Metric);
        assert_eq!(err.field_errors()[0].message, "Unknown metric: gpu_hours");

        let err = UsageComponentDraft::new("").validate(&allowed()).unwrap_err();
        assert_eq!(err.field_errors()[0].message, "Please select a metric");
    }

    #[test]
    fn test_draft_wire_format() {
        let draft: UsageComponentDraft =
            serde_json::from_str(r#"{"billable_metric":"api_calls"}"#).unwrap();
        assert_eq!(draft, UsageComponentDraft::new("api_calls"));

        let json = serde_json::to_value(PlanComponent {
            id: 7,
            draft: UsageComponentDraft::new("api_calls"),
        })
        .unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["billable_metric"], "api_calls");
        assert_eq!(json["metric_amount_per_cost"], 1.0);
        assert_eq!(json["free_metric_quantity"], 0.0);
    }

    #[test]
    fn test_metric_summary_flattens() {
        let summary = BillableMetricSummary::from(BillableMetric {
            event_name: "api_calls".into(),
            property_name: None,
            aggregation_type: AggregationType::Count,
        });
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["event_name"], "api_calls");
        assert_eq!(json["aggregation_type"], "count");
        assert_eq!(json["metric_name"], "api_calls");
    }
}
