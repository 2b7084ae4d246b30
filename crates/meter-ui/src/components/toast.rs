use leptos::prelude::*;

const TOAST_LIFETIME: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
}

#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: ReadSignal<Vec<Toast>>,
    set_toasts: WriteSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl ToastContext {
    pub fn success(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(message.into(), ToastLevel::Error);
    }

    pub fn push(&self, message: String, level: ToastLevel) {
        let currentId = self.next_id.get_value();
        self.next_id.set_value(currentId + 1);

        self.set_toasts.update(|toasts| {
            toasts.push(Toast {
                id: currentId,
                message,
                level,
            });
        });

        let setToasts = self.set_toasts;
        set_timeout(
            move || {
                setToasts.update(|toasts| {
                    toasts.retain(|t| t.id != currentId);
                });
            },
            TOAST_LIFETIME,
        );
    }
}

pub fn use_toasts() -> ToastContext {
    expect_context::<ToastContext>()
}

/// Provides toast context and renders the toast container.
/// Place this once near the root of your app.
#[component]
pub fn ToastProvider(children: Children) -> impl IntoView {
    let (toasts, setToasts) = signal(Vec::<Toast>::new());

    let ctx = ToastContext {
        toasts,
        set_toasts: setToasts,
        next_id: StoredValue::new(0),
    };

    provide_context(ctx);

    view! {
        {children()}
        <div class="toast-container">
            <For each=move || ctx.toasts.get() key=|toast| toast.id let:toast>
                <div class=move || {
                    match toast.level {
                        ToastLevel::Success => "toast toast-success",
                        ToastLevel::Error => "toast toast-error",
                    }
                }>{toast.message.clone()}</div>
            </For>
        </div>
    }
}
