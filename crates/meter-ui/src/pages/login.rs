use leptos::prelude::*;

/// Lives outside `/api` so the page auth layer lets it through.
#[server(prefix = "/public")]
async fn login(token: String) -> Result<(), ServerFnError> {
    use http::header::{HeaderValue, SET_COOKIE};
    use leptos_axum::ResponseOptions;
    use meter_types::AuthToken;

    let authToken = use_context::<AuthToken>()
        .ok_or_else(|| ServerFnError::new("auth context unavailable"))?;

    if token != authToken.0 {
        tracing::warn!("rejected console login with invalid token");
        return Err(ServerFnError::new("invalid token"));
    }

    let responseOptions = expect_context::<ResponseOptions>();
    let cookieValue = format!(
        "session_token={token}; HttpOnly; Secure; SameSite=Strict; Path=/; Max-Age=604800"
    );
    responseOptions.insert_header(
        SET_COOKIE,
        HeaderValue::from_str(&cookieValue)
            .map_err(|e| ServerFnError::new(format!("cookie error: {e}")))?,
    );

    leptos_axum::redirect("/");

    Ok(())
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let loginAction = ServerAction::<Login>::new();
    let loginValue = loginAction.value();

    let errorMessage = move || {
        loginValue
            .get()
            .and_then(|result| result.err())
            .map(|e| e.to_string())
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <div class="login-header">
                    <div class="login-icon">"M"</div>
                    <h1>"Meter Console"</h1>
                    <p>"Enter your access token to continue"</p>
                </div>

                {move || {
                    errorMessage().map(|message| view! { <div class="login-error">{message}</div> })
                }}

                <ActionForm action=loginAction>
                    <div class="form-group">
                        <label for="token">"Access Token"</label>
                        <input
                            type="password"
                            id="token"
                            name="token"
                            placeholder="Enter your token"
                            required
                        />
                    </div>
                    <button type="submit" class="btn btn-primary">
                        "Sign In"
                    </button>
                </ActionForm>
            </div>
        </div>
    }
}
