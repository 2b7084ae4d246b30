use leptos::prelude::*;

/// Dashboard card with a title header and an optional caption under it.
#[component]
pub fn MetricCard(
    title: String,
    /// Small print under the title, e.g. the periods being compared
    #[prop(optional, into)]
    caption: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="card">
            <div class="card-title">{title}</div>
            {caption.map(|text| view! { <div class="card-caption">{text}</div> })}
            {children()}
        </div>
    }
}
