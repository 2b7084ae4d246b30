use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::revenue::RevenuePeriodSample;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub customer_id: String,
    pub issued_on: NaiveDate,
    pub amount: f64,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("period ends on {end} before it starts on {start}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Inclusive date range.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First of the month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    /// The same stretch of days one month earlier. The end day clamps to the
    /// last day of a shorter month.
    pub fn prior_month_to_date(today: NaiveDate) -> Self {
        let current = Self::month_to_date(today);
        let shift = |date: NaiveDate| date.checked_sub_months(Months::new(1)).unwrap_or(date);
        Self {
            start: shift(current.start),
            end: shift(current.end),
        }
    }
}

/// Totals for two periods, named after the revenue endpoint's fields.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PeriodRevenue {
    pub total_revenue_period_1: f64,
    pub total_revenue_period_2: f64,
}

impl From<PeriodRevenue> for RevenuePeriodSample {
    fn from(revenue: PeriodRevenue) -> Self {
        RevenuePeriodSample::new(
            Some(revenue.total_revenue_period_1),
            Some(revenue.total_revenue_period_2),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_rejects_inverted_range() {
        let err = Period::new(date(2024, 3, 10), date(2024, 3, 1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "period ends on 2024-03-01 before it starts on 2024-03-10"
        );
    }

    #[test]
    fn test_period_contains_is_inclusive() {
        let period = Period::new(date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert!(period.contains(date(2024, 3, 1)));
        assert!(period.contains(date(2024, 3, 31)));
        assert!(!period.contains(date(2024, 4, 1)));
    }

    #[test]
    fn test_month_to_date_windows() {
        let today = date(2024, 3, 31);
        assert_eq!(
            Period::month_to_date(today),
            Period::new(date(2024, 3, 1), today).unwrap()
        );
        assert_eq!(
            Period::prior_month_to_date(today),
            Period::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap()
        );
    }

    #[test]
    fn test_period_revenue_into_sample() {
        let sample = RevenuePeriodSample::from(PeriodRevenue {
            total_revenue_period_1: 110.0,
            total_revenue_period_2: 100.0,
        });
        assert_eq!(sample.percentage_change(), 10.0);
    }
}
