use dioxus::prelude::*;

use ui::SiteProvider;
use views::{Admin, Home, Login};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/admin")]
    Admin {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

/// Request body cap. Image bytes travel JSON-encoded inside a server function payload,
/// which inflates a 5 MiB file to several times its size.
#[cfg(feature = "server")]
const BODY_LIMIT: usize = 24 * 1024 * 1024;

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use axum::extract::DefaultBodyLimit;
    use axum::middleware;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use server::auth::{self, require_admin, SessionGate};
    use server::realtime::{self, ChangeHub};
    use tower_http::services::ServeDir;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = server::settings()
        .await
        .expect("Failed to load settings");
    if settings.admin.password.is_empty() {
        tracing::warn!("ADMIN_PASSWORD is not set, every login will be rejected");
    }

    // Initialize database pool
    let pool = server::db::get_pool()
        .await
        .expect("Failed to connect to database");

    // Run migrations
    server::db::migrate(pool)
        .await
        .expect("Failed to run migrations");

    let hub = ChangeHub::new();
    realtime::spawn_listener(pool.clone(), hub.clone());

    let gate = SessionGate::new(settings.credentials(), settings.is_production());

    let router = axum::Router::new()
        .merge(auth::router(gate))
        .merge(realtime::router(hub))
        .nest_service(
            settings.storage.mount_path(),
            ServeDir::new(&settings.storage.root),
        )
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(middleware::from_fn(require_admin));

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SiteProvider {
            Router::<Route> {}
        }
    }
}
