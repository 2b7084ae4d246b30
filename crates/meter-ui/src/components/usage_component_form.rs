use leptos::{ev, prelude::*};
use meter_types::{
    DraftField, EditorCapabilities, UsageComponentDraft, UsageComponentEditor,
    COST_PER_UNIT_PRECISION, FREE_UNITS_PRECISION, UNITS_PER_COST_PRECISION,
};

/// Blank input means "use the default".
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Input `step` matching a field's decimal precision.
fn step_for(precision: u32) -> String {
    match precision {
        0 => "1".to_string(),
        places => format!("0.{}1", "0".repeat(places as usize - 1)),
    }
}

/// Moves the editor with the modal's `visible` flag. Hiding discards the
/// draft, so showing again starts from the defaults.
pub(crate) fn sync_visibility(editor: RwSignal<UsageComponentEditor>, visible: bool) {
    if visible {
        editor.update(|e| e.open());
    } else {
        editor.update(|e| e.close());
    }
}

/// Modal for adding a usage pricing component to a plan.
///
/// Opening is driven by `visible`. Confirming with a valid draft calls
/// `on_submit`; an invalid draft keeps the modal open with inline errors.
#[component]
pub fn UsageComponentForm(
    #[prop(into)] visible: Signal<bool>,
    /// Metric names the user may choose from
    #[prop(into)]
    metrics: Signal<Vec<String>>,
    on_submit: Callback<UsageComponentDraft>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let editor = RwSignal::new(UsageComponentEditor::new());

    Effect::new(move |_| sync_visibility(editor, visible.get()));

    let capabilities = move || {
        EditorCapabilities::new(
            metrics.get_untracked(),
            move |draft| on_submit.run(draft),
            move || on_cancel.run(()),
        )
    };

    let handleConfirm = move |_: ev::MouseEvent| {
        let mut next = editor.get_untracked();
        next.confirm(&capabilities());
        editor.set(next);
    };

    let handleCancel = move |_: ev::MouseEvent| {
        let mut next = editor.get_untracked();
        next.cancel(&capabilities());
        editor.set(next);
    };

    let metricError = move || {
        editor.with(|e| e.error_for(DraftField::Metric).map(str::to_string))
    };

    view! {
        <Show when=move || visible.get() && editor.with(|e| e.is_open())>
            <div class="modal-backdrop">
                <div class="modal" role="dialog" aria-modal="true">
                    <div class="modal-header">"Add A Usage Pricing Component"</div>
                    <div class="modal-body">
                        <div class="form-group">
                            <label for="metric">"Metric"</label>
                            <select
                                id="metric"
                                name="metric"
                                class=move || {
                                    if metricError().is_some() { "input-error" } else { "" }
                                }
                                prop:value=move || {
                                    editor.with(|e| e.form().metric.clone().unwrap_or_default())
                                }
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    editor.update(|e| e.select_metric(value));
                                }
                            >
                                <option value="" disabled=true>"Select a metric"</option>
                                <For each=move || metrics.get() key=|name| name.clone() let:name>
                                    <option value=name.clone()>{name.clone()}</option>
                                </For>
                            </select>
                            {move || {
                                metricError().map(|message| {
                                    view! { <div class="field-error">{message}</div> }
                                })
                            }}
                        </div>

                        <div class="form-group">
                            <label for="cost_per_metric">"Cost Per Unit Amount"</label>
                            <div class="input-addon">
                                <span class="addon">"$"</span>
                                <input
                                    type="number"
                                    id="cost_per_metric"
                                    min="0"
                                    step=step_for(COST_PER_UNIT_PRECISION)
                                    prop:value=move || editor.with(|e| e.form().cost_per_unit.to_string())
                                    on:change=move |ev| {
                                        let value = parse_number(&event_target_value(&ev));
                                        editor.update(|e| e.set_cost_per_unit(value));
                                    }
                                />
                            </div>
                        </div>

                        <div class="form-group">
                            <div class="input-addon">
                                <span class="addon">"per"</span>
                                <input
                                    type="number"
                                    id="metric_amount_per_cost"
                                    step=step_for(UNITS_PER_COST_PRECISION)
                                    prop:value=move || editor.with(|e| e.form().units_per_cost.to_string())
                                    on:change=move |ev| {
                                        let value = parse_number(&event_target_value(&ev));
                                        editor.update(|e| e.set_units_per_cost(value));
                                    }
                                />
                            </div>
                        </div>

                        <div class="form-group">
                            <label for="free_amount">"Free Units"</label>
                            <input
                                type="number"
                                id="free_amount"
                                step=step_for(FREE_UNITS_PRECISION)
                                prop:value=move || editor.with(|e| e.form().free_units.to_string())
                                on:change=move |ev| {
                                    let value = parse_number(&event_target_value(&ev));
                                    editor.update(|e| e.set_free_units(value));
                                }
                            />
                        </div>
                    </div>
                    <div class="modal-footer">
                        <button class="btn btn-ghost" on:click=handleCancel>
                            "Cancel"
                        </button>
                        <button class="btn btn-primary" on:click=handleConfirm>
                            "Create"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
