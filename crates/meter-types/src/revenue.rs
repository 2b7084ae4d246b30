use serde::{Deserialize, Serialize};

/// Accent used for a non-negative change.
pub const UP_ACCENT: &str = "#3f8600";
/// Accent used for a negative change.
pub const DOWN_ACCENT: &str = "#cf1322";

/// Signed change from `previous` to `current`, in percent.
///
/// Returns `0.0` when either side is absent or `previous` is exactly zero.
/// A prior value of zero and a missing prior value are reported the same way.
pub fn percentage_change(current: Option<f64>, previous: Option<f64>) -> f64 {
    match (current, previous) {
        (Some(current), Some(previous)) if previous != 0.0 => {
            ((current - previous) / previous) * 100.0
        }
        _ => 0.0,
    }
}

/// Current and prior period revenue, as handed over by the fetch layer.
/// `None` means the figure has not been loaded yet.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RevenuePeriodSample {
    pub current_value: Option<f64>,
    pub prior_value: Option<f64>,
}

impl RevenuePeriodSample {
    pub fn new(current_value: Option<f64>, prior_value: Option<f64>) -> Self {
        Self {
            current_value,
            prior_value,
        }
    }

    pub fn percentage_change(&self) -> f64 {
        percentage_change(self.current_value, self.prior_value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn of(change: f64) -> Self {
        if change >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    pub fn accent(self) -> &'static str {
        match self {
            Trend::Up => UP_ACCENT,
            Trend::Down => DOWN_ACCENT,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "\u{2191}",
            Trend::Down => "\u{2193}",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Trend::Up => "trend-up",
            Trend::Down => "trend-down",
        }
    }
}

/// What the revenue comparison widget shows for a given set of inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevenueView {
    Loading,
    Ready { current: f64, change: f64 },
}

impl RevenueView {
    /// Loading while the flag is set or either figure is missing.
    pub fn derive(sample: RevenuePeriodSample, is_loading: bool) -> Self {
        Self::with_change(sample, sample.percentage_change(), is_loading)
    }

    /// Like [`RevenueView::derive`] but with the change already computed,
    /// so callers that memoize the percentage don't compute it twice.
    pub fn with_change(sample: RevenuePeriodSample, change: f64, is_loading: bool) -> Self {
        match (is_loading, sample.current_value, sample.prior_value) {
            (false, Some(current), Some(_)) => RevenueView::Ready { current, change },
            _ => RevenueView::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RevenueView::Loading)
    }
}

/// The current figure exactly as received; no rounding.
pub fn format_amount(value: f64) -> String {
    format!("{value}")
}

/// Two decimals with a percent suffix. Negative zero prints as `0.00%`.
pub fn format_percentage(change: f64) -> String {
    let change = if change == 0.0 { 0.0 } else { change };
    format!("{change:.2}%")
}
