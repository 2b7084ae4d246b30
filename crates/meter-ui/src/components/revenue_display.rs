use leptos::prelude::*;
use meter_types::{format_amount, format_percentage, RevenuePeriodSample, RevenueView, Trend};

/// The sample pair as one memo and the change as a memo over it. `compute`
/// only reruns when one of the two figures actually changes.
pub(crate) fn revenue_memos(
    current: Signal<Option<f64>>,
    prior: Signal<Option<f64>>,
    compute: impl Fn(&RevenuePeriodSample) -> f64 + Send + Sync + 'static,
) -> (Memo<RevenuePeriodSample>, Memo<f64>) {
    let sample = Memo::new(move |_| RevenuePeriodSample::new(current.get(), prior.get()));
    let change = Memo::new(move |_| compute(&sample.get()));
    (sample, change)
}

/// Revenue figure for the current period next to its change from the prior
/// period.
///
/// Shows only a spinner while `is_loading` is set or either figure is still
/// missing. The percentage is a memo over the two figures, so flipping the
/// loading flag alone never recomputes it.
#[component]
pub fn RevenueDisplay(
    /// Revenue for the current period
    #[prop(into)]
    current: Signal<Option<f64>>,
    /// Revenue for the period being compared against
    #[prop(into)]
    prior: Signal<Option<f64>>,
    #[prop(into)] is_loading: Signal<bool>,
) -> impl IntoView {
    let (sample, change) = revenue_memos(current, prior, |s| s.percentage_change());

    view! {
        {move || {
            match RevenueView::with_change(sample.get(), change.get(), is_loading.get()) {
                RevenueView::Loading => {
                    view! {
                        <div class="loading">
                            <div class="spinner"></div>
                        </div>
                    }
                        .into_any()
                }
                RevenueView::Ready { current, change } => {
                    let trend = Trend::of(change);
                    view! {
                        <div class="revenue-display">
                            <h1 class="revenue-title">"Revenue"</h1>
                            <div class="revenue-row">
                                <h2 class="revenue-amount">"$ " {format_amount(current)}</h2>
                                <div
                                    class=format!("revenue-change {}", trend.css_class())
                                    style=format!("color: {}", trend.accent())
                                >
                                    <span class="trend-arrow">{trend.arrow()}</span>
                                    {format_percentage(change)}
                                </div>
                            </div>
                        </div>
                    }
                        .into_any()
                }
            }
        }}
    }
}
