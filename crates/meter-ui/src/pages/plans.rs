use leptos::prelude::*;
use meter_types::{PlanComponent, UsageComponentDraft};

use crate::components::toast::use_toasts;
use crate::components::usage_component_form::UsageComponentForm;

#[server]
async fn get_components() -> Result<Vec<PlanComponent>, ServerFnError> {
    use meter_providers::Ledger;

    let ledger =
        use_context::<Ledger>().ok_or_else(|| ServerFnError::new("ledger unavailable"))?;
    Ok(ledger.components().await)
}

#[server]
async fn get_metric_names() -> Result<Vec<String>, ServerFnError> {
    use meter_providers::Ledger;

    let ledger =
        use_context::<Ledger>().ok_or_else(|| ServerFnError::new("ledger unavailable"))?;
    Ok(ledger.metric_names().await.into_iter().collect())
}

#[server]
async fn create_component(draft: UsageComponentDraft) -> Result<PlanComponent, ServerFnError> {
    use meter_providers::Ledger;

    let ledger =
        use_context::<Ledger>().ok_or_else(|| ServerFnError::new("ledger unavailable"))?;
    ledger
        .add_component(draft)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

fn format_rate(component: &PlanComponent) -> String {
    format!(
        "${} per {}",
        component.draft.cost_per_unit, component.draft.units_per_cost
    )
}

#[component]
pub fn PlansPage() -> impl IntoView {
    #[allow(unused_variables)]
    let toasts = use_toasts();
    #[allow(unused_variables)]
    let (components, setComponents) =
        signal(Option::<Result<Vec<PlanComponent>, String>>::None);
    #[allow(unused_variables)]
    let (metricNames, setMetricNames) = signal(Vec::<String>::new());
    let (formVisible, setFormVisible) = signal(false);

    #[cfg(feature = "hydrate")]
    let refresh = move || {
        wasm_bindgen_futures::spawn_local(async move {
            let result = get_components().await.map_err(|e| e.to_string());
            setComponents.set(Some(result));
        });
    };

    #[cfg(feature = "hydrate")]
    {
        use wasm_bindgen_futures::spawn_local;

        refresh();
        spawn_local(async move {
            match get_metric_names().await {
                Ok(names) => setMetricNames.set(names),
                Err(e) => leptos::logging::warn!("failed to load metrics: {e}"),
            }
        });
    }

    let onSubmit = Callback::new(move |#[allow(unused_variables)] draft: UsageComponentDraft| {
        setFormVisible.set(false);
        #[cfg(feature = "hydrate")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                match create_component(draft).await {
                    Ok(component) => {
                        toasts.success(format!(
                            "Added usage component for {}",
                            component.draft.metric
                        ));
                        refresh();
                    }
                    Err(e) => toasts.error(format!("Failed to add component: {e}")),
                }
            });
        }
    });

    let onCancel = Callback::new(move |_: ()| setFormVisible.set(false));

    view! {
        <div class="dashboard-header">
            <h1>"Plan Components"</h1>
            <p class="subtitle">"Metered pricing line items"</p>
        </div>
        <div class="toolbar">
            <button class="btn btn-primary" on:click=move |_| setFormVisible.set(true)>
                "Add usage component"
            </button>
        </div>
        {move || {
            match components.get() {
                None => {
                    view! {
                        <div class="loading">
                            <div class="spinner"></div>
                            "Loading plan components..."
                        </div>
                    }
                        .into_any()
                }
                Some(Err(e)) => {
                    view! {
                        <div class="card">
                            <p class="login-error">"Failed to load plan components: " {e}</p>
                        </div>
                    }
                        .into_any()
                }
                Some(Ok(list)) => view! { <ComponentTable components=list /> }.into_any(),
            }
        }}
        <UsageComponentForm
            visible=formVisible
            metrics=metricNames
            on_submit=onSubmit
            on_cancel=onCancel
        />
    }
}

#[component]
fn ComponentTable(components: Vec<PlanComponent>) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-title">"Usage Components"</div>
            <table>
                <thead>
                    <tr>
                        <th>"ID"</th>
                        <th>"Metric"</th>
                        <th>"Rate"</th>
                        <th>"Free Units"</th>
                    </tr>
                </thead>
                <tbody>
                    {if components.is_empty() {
                        view! {
                            <tr>
                                <td colspan="4">"No usage components yet"</td>
                            </tr>
                        }
                            .into_any()
                    } else {
                        components
                            .into_iter()
                            .map(|component| {
                                let rate = format_rate(&component);
                                view! {
                                    <tr>
                                        <td>{component.id}</td>
                                        <td>{component.draft.metric.clone()}</td>
                                        <td>{rate}</td>
                                        <td>{component.draft.free_units}</td>
                                    </tr>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }}
                </tbody>
            </table>
        </div>
    }
}
