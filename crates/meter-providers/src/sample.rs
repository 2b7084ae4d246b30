#![allow(non_snake_case)]

use chrono::{Days, NaiveDate};
use meter_types::{AggregationType, BillableMetric, Invoice};

use crate::ledger::LedgerData;

const SAMPLE_CUSTOMERS: &[&str] = &["acme", "globex", "initech"];
const SAMPLE_DAYS: u64 = 62;

/// Demo ledger used when no ledger file is configured: a small metric
/// catalog and one invoice per day for the last two months.
pub fn ledger_data(today: NaiveDate) -> LedgerData {
    let metrics = vec![
        BillableMetric {
            event_name: "api_calls".into(),
            property_name: None,
            aggregation_type: AggregationType::Count,
        },
        BillableMetric {
            event_name: "storage".into(),
            property_name: Some("gigabytes".into()),
            aggregation_type: AggregationType::Max,
        },
        BillableMetric {
            event_name: "compute".into(),
            property_name: Some("seconds".into()),
            aggregation_type: AggregationType::Sum,
        },
    ];

    let invoices = (0..SAMPLE_DAYS)
        .filter_map(|daysAgo| {
            let issuedOn = today.checked_sub_days(Days::new(daysAgo))?;
            let customer = SAMPLE_CUSTOMERS[(daysAgo as usize) % SAMPLE_CUSTOMERS.len()];
            Some(Invoice {
                customer_id: customer.to_string(),
                issued_on: issuedOn,
                amount: 40.0 + (daysAgo % 7) as f64 * 12.5,
            })
        })
        .collect();

    LedgerData {
        metrics,
        invoices,
        components: Vec::new(),
    }
}
