use leptos::prelude::*;
use meter_types::PeriodRevenue;

use crate::components::metric_card::MetricCard;
use crate::components::revenue_display::RevenueDisplay;

const REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

#[server]
async fn get_period_revenue() -> Result<PeriodRevenue, ServerFnError> {
    use meter_providers::Ledger;
    use meter_types::Period;

    let ledger =
        use_context::<Ledger>().ok_or_else(|| ServerFnError::new("ledger unavailable"))?;
    let today = chrono::Local::now().date_naive();
    Ok(ledger
        .period_revenue(
            Period::month_to_date(today),
            Period::prior_month_to_date(today),
        )
        .await)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    // Stays None until the first successful fetch; failures keep the spinner up.
    #[allow(unused_variables)]
    let (revenue, setRevenue) = signal(Option::<PeriodRevenue>::None);

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        let fetch = move || {
            spawn_local(async move {
                match get_period_revenue().await {
                    Ok(latest) => setRevenue.set(Some(latest)),
                    Err(e) => leptos::logging::warn!("failed to load revenue: {e}"),
                }
            });
        };

        fetch();

        let handle = set_interval_with_handle(fetch, REFRESH_INTERVAL)
            .expect("failed to set interval");
        on_cleanup(move || handle.clear());
    }

    let current = Signal::derive(move || revenue.get().map(|r| r.total_revenue_period_1));
    let prior = Signal::derive(move || revenue.get().map(|r| r.total_revenue_period_2));
    let isLoading = Signal::derive(move || revenue.with(Option::is_none));

    view! {
        <div class="dashboard-header">
            <h1>"Billing Dashboard"</h1>
            <p class="subtitle">"Revenue and usage at a glance"</p>
        </div>
        <div class="dashboard-grid">
            <MetricCard
                title="Revenue".to_string()
                caption="Month to date vs. the same days last month"
            >
                <RevenueDisplay current=current prior=prior is_loading=isLoading />
            </MetricCard>
        </div>
    }
}
