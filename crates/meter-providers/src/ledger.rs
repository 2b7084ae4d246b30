#![allow(non_snake_case)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use meter_types::{
    BillableMetric, BillableMetricSummary, DraftError, Invoice, Period, PeriodRevenue,
    PlanComponent, UsageComponentDraft,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{revenue, sample};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to read ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse ledger {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("metric already exists: {0}")]
    DuplicateMetric(String),
    #[error(transparent)]
    InvalidDraft(#[from] DraftError),
}

/// On-disk ledger layout.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerData {
    #[serde(default)]
    pub metrics: Vec<BillableMetric>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub components: Vec<PlanComponent>,
}

/// Shared handle to the billing ledger. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Ledger {
    inner: Arc<RwLock<LedgerData>>,
}

impl Ledger {
    pub fn from_data(data: LedgerData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub async fn read(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LedgerError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let data: LedgerData =
            serde_json::from_str(&contents).map_err(|source| LedgerError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_data(data))
    }

    /// Reads the ledger file, or falls back to generated sample data.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        match Self::read(&path).await {
            Ok(ledger) => {
                let data = ledger.inner.read().await;
                info!(
                    "loaded ledger {}: {} metrics, {} invoices, {} components",
                    path.as_ref().display(),
                    data.metrics.len(),
                    data.invoices.len(),
                    data.components.len()
                );
                drop(data);
                ledger
            }
            Err(e) => {
                warn!("{e}, using sample ledger");
                Self::from_data(sample::ledger_data(chrono::Local::now().date_naive()))
            }
        }
    }

    pub async fn period_revenue(&self, period1: Period, period2: Period) -> PeriodRevenue {
        let data = self.inner.read().await;
        PeriodRevenue {
            total_revenue_period_1: revenue::total_in(&data.invoices, &period1),
            total_revenue_period_2: revenue::total_in(&data.invoices, &period2),
        }
    }

    pub async fn metrics(&self) -> Vec<BillableMetricSummary> {
        let data = self.inner.read().await;
        data.metrics.iter().cloned().map(Into::into).collect()
    }

    pub async fn metric_names(&self) -> BTreeSet<String> {
        let data = self.inner.read().await;
        data.metrics.iter().map(BillableMetric::metric_name).collect()
    }

    pub async fn add_metric(
        &self,
        metric: BillableMetric,
    ) -> Result<BillableMetricSummary, LedgerError> {
        let mut data = self.inner.write().await;
        if data.metrics.iter().any(|m| m.same_definition(&metric)) {
            return Err(LedgerError::DuplicateMetric(metric.metric_name()));
        }
        let summary = BillableMetricSummary::from(metric.clone());
        data.metrics.push(metric);
        info!("added billable metric {}", summary.metric_name);
        Ok(summary)
    }

    pub async fn components(&self) -> Vec<PlanComponent> {
        self.inner.read().await.components.clone()
    }

    /// Validates against the metric catalog and stores the draft.
    pub async fn add_component(
        &self,
        draft: UsageComponentDraft,
    ) -> Result<PlanComponent, LedgerError> {
        let draft = draft.normalized();
        let mut data = self.inner.write().await;

        let allowedMetrics: BTreeSet<String> =
            data.metrics.iter().map(BillableMetric::metric_name).collect();
        draft.validate(&allowedMetrics)?;

        let nextId = data.components.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let component = PlanComponent { id: nextId, draft };
        data.components.push(component.clone());
        info!(
            "added plan component {} for metric {}",
            component.id, component.draft.metric
        );
        Ok(component)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use meter_types::{AggregationType, DraftField};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn api_calls() -> BillableMetric {
        BillableMetric {
            event_name: "api_calls".into(),
            property_name: None,
            aggregation_type: AggregationType::Count,
        }
    }

    fn ledger() -> Ledger {
        Ledger::from_data(LedgerData {
            metrics: vec![api_calls()],
            invoices: vec![
                Invoice {
                    customer_id: "acme".into(),
                    issued_on: date(2024, 2, 10),
                    amount: 100.0,
                },
                Invoice {
                    customer_id: "acme".into(),
                    issued_on: date(2024, 3, 5),
                    amount: 80.0,
                },
                Invoice {
                    customer_id: "globex".into(),
                    issued_on: date(2024, 3, 31),
                    amount: 30.0,
                },
            ],
            components: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_period_revenue_sums_each_window() {
        let march = Period::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        let february = Period::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();

        let revenue = ledger().period_revenue(march, february).await;

        assert_eq!(revenue.total_revenue_period_1, 110.0);
        assert_eq!(revenue.total_revenue_period_2, 100.0);
    }

    #[tokio::test]
    async fn test_duplicate_metric_rejected() {
        let ledger = ledger();
        let err = ledger.add_metric(api_calls()).await.unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateMetric(name) if name == "api_calls"));

        let bytes = BillableMetric {
            event_name: "api_calls".into(),
            property_name: Some("bytes".into()),
            aggregation_type: AggregationType::Sum,
        };
        ledger.add_metric(bytes).await.unwrap();
        assert_eq!(ledger.metrics().await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_component_assigns_ids() {
        let ledger = ledger();
        let first = ledger
            .add_component(UsageComponentDraft::new("api_calls"))
            .await
            .unwrap();
        let second = ledger
            .add_component(UsageComponentDraft {
                cost_per_unit: 0.000251,
                ..UsageComponentDraft::new("api_calls")
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.draft.cost_per_unit, 0.0003);
        assert_eq!(ledger.components().await.len(), 2);
    }

    #[tokio::test]
    async fn test_add_component_with_unknown_metric() {
        let err = ledger()
            .add_component(UsageComponentDraft::new("gpu_hours"))
            .await
            .unwrap_err();
        match err {
            LedgerError::InvalidDraft(e) => assert_eq!(e.field_errors()[0].field, DraftField::Metric),
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn test_read_missing_file_errors_and_load_falls_back() {
        let path = std::env::temp_dir().join("meter-ledger-does-not-exist.json");
        assert!(matches!(
            Ledger::read(&path).await,
            Err(LedgerError::Io { .. })
        ));

        let ledger = Ledger::load(&path).await;
        assert!(!ledger.metric_names().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_ledger_file() {
        let path = std::env::temp_dir().join(format!("meter-ledger-{}.json", std::process::id()));
        let json = r#"{
            "metrics": [{ "event_name": "api_calls", "aggregation_type": "count" }],
            "invoices": [{ "customer_id": "acme", "issued_on": "2024-03-02", "amount": 12.5 }],
            "components": [{ "id": 4, "billable_metric": "api_calls" }]
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let ledger = Ledger::read(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(ledger.metric_names().await.contains("api_calls"));
        let added = ledger
            .add_component(UsageComponentDraft::new("api_calls"))
            .await
            .unwrap();
        assert_eq!(added.id, 5);
    }
}
