#![allow(non_snake_case)]

#[cfg(feature = "ssr")]
mod config {
    use std::net::{IpAddr, SocketAddr};

    use serde::Deserialize;

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    pub struct Config {
        #[serde(default)]
        pub server: ServerConfig,
        #[serde(default)]
        pub auth: AuthConfig,
        #[serde(default)]
        pub ledger: LedgerConfig,
    }

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    pub struct ServerConfig {
        pub bind: String,
        pub port: u16,
    }

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    pub struct AuthConfig {
        pub token: String,
    }

    #[derive(Deserialize, Clone, Debug, PartialEq)]
    pub struct LedgerConfig {
        pub path: String,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                server: ServerConfig::default(),
                auth: AuthConfig::default(),
                ledger: LedgerConfig::default(),
            }
        }
    }

    impl Default for ServerConfig {
        fn default() -> Self {
            Self {
                bind: "0.0.0.0".into(),
                port: 3000,
            }
        }
    }

    impl Default for AuthConfig {
        fn default() -> Self {
            Self {
                token: "change-me-on-first-run".into(),
            }
        }
    }

    impl Default for LedgerConfig {
        fn default() -> Self {
            Self {
                path: "ledger.json".into(),
            }
        }
    }

    impl ServerConfig {
        pub fn socket_addr(&self) -> Option<SocketAddr> {
            let ip: IpAddr = self.bind.parse().ok()?;
            Some(SocketAddr::new(ip, self.port))
        }
    }

    pub fn parse(contents: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &str) -> Config {
        match std::fs::read_to_string(path) {
            Ok(contents) => match parse(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("failed to parse config {path}: {e}, using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("failed to read config {path}: {e}, using defaults");
                Config::default()
            }
        }
    }

}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use meter_api::middleware::auth::AppState;
    use meter_providers::Ledger;
    use meter_types::AuthToken;
    use meter_ui::{shell, App};
    use tower_http::trace::TraceLayer;
    use tracing_subscriber::{fmt, EnvFilter};

    // Initialize tracing
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse config path from args
    let args: Vec<String> = std::env::args().collect();
    let configPath = if let Some(idx) = args.iter().position(|a| a == "--config") {
        args.get(idx + 1)
            .cloned()
            .unwrap_or_else(|| "config.example.toml".into())
    } else {
        "config.example.toml".into()
    };

    let appConfig = config::load(&configPath);
    tracing::info!(
        "loaded config from {configPath}: bind={}:{} ledger={}",
        appConfig.server.bind,
        appConfig.server.port,
        appConfig.ledger.path
    );

    let ledger = Ledger::load(&appConfig.ledger.path).await;
    let authToken = AuthToken(appConfig.auth.token.clone());

    let appState = AppState {
        auth_token: appConfig.auth.token.clone(),
        ledger: ledger.clone(),
    };

    // Get Leptos configuration
    let conf = get_configuration(None).expect("failed to load Leptos configuration");
    let leptosOptions = conf.leptos_options;
    let addr = appConfig.server.socket_addr().unwrap_or_else(|| {
        tracing::warn!(
            "invalid bind address {}, using {}",
            appConfig.server.bind,
            leptosOptions.site_addr
        );
        leptosOptions.site_addr
    });

    // Generate route list from Leptos App
    let routes = generate_route_list(App);

    let apiRouter = meter_api::api_router(appState.clone());

    let pageAuthLayer = axum::middleware::from_fn_with_state(
        appState,
        meter_api::middleware::auth::require_page_auth,
    );

    // Server functions see the ledger and auth token through context;
    // the JSON API carries its own AppState.
    let app = Router::new()
        .leptos_routes_with_context(
            &leptosOptions,
            routes,
            {
                let authToken = authToken.clone();
                let ledger = ledger.clone();
                move || {
                    provide_context(authToken.clone());
                    provide_context(ledger.clone());
                }
            },
            {
                let leptosOptions = leptosOptions.clone();
                move || shell(leptosOptions.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptosOptions)
        .merge(apiRouter)
        .layer(pageAuthLayer)
        .layer(TraceLayer::new_for_http());

    tracing::info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server exited with error");
}

#[cfg(not(feature = "ssr"))]
fn main() {}
