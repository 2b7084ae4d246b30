use leptos::prelude::*;
use leptos_router::hooks::use_location;

const LINKS: &[(&str, &str, &str)] = &[
    ("/", "\u{25A3}", "Dashboard"),
    ("/plans", "\u{2630}", "Plans"),
];

#[component]
pub fn Nav() -> impl IntoView {
    let location = use_location();

    view! {
        <nav class="nav-sidebar">
            <div class="nav-brand">
                <div class="brand-icon">"M"</div>
                <span class="brand-text">"Meter Console"</span>
            </div>
            <ul class="nav-links">
                {LINKS
                    .iter()
                    .map(|(href, icon, label)| {
                        let href = *href;
                        let pathname = location.pathname;
                        view! {
                            <li class=move || {
                                if pathname.get() == href { "nav-item active" } else { "nav-item" }
                            }>
                                <a href=href>
                                    <span class="nav-icon">{*icon}</span>
                                    <span>{*label}</span>
                                </a>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
