use crate::{
    data_sources::backend::Backend,
    models::agent::Agent,
    server::{
        html::{layout::page, pages},
        live_socket::{signals_socket, trades_socket, LiveParams},
        settings_socket::settings_socket,
    },
    utils::formatting::start_of_local_day,
    views::{
        backtests_view::BacktestsView, dashboard_view::DashboardView, navigation::Route,
        signals_view::SignalsView,
    },
};
use actix::ArbiterHandle;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared by every request. Without a backend the pages still render, with
/// the configuration error as a banner and no data.
#[derive(Clone)]
pub struct DashboardState {
    pub backend: Option<Backend>,
    pub config_error: Option<String>,
    /// Arbiter the per-connection actors are started on.
    pub arbiter: ArbiterHandle,
}

impl DashboardState {
    fn render(&self, route: Route, body: &str) -> Html<String> {
        Html(page(route.path(), route.label(), body, self.config_error.as_deref()))
    }
}

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route(Route::Dashboard.path(), get(dashboard_page))
        .route(Route::Signals.path(), get(signals_page))
        .route(Route::Backtests.path(), get(backtests_page))
        .route(Route::Universe.path(), get(universe_page))
        .route(Route::Jobs.path(), get(jobs_page))
        .route(Route::Settings.path(), get(settings_page))
        .route(Route::Help.path(), get(help_page))
        .route("/ws/live/signals", get(signals_socket))
        .route("/ws/live/trades", get(trades_socket))
        .route("/ws/instellingen", get(settings_socket))
        .fallback(not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: DashboardState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "dashboard listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

async fn dashboard_page(State(state): State<DashboardState>) -> Html<String> {
    let body = match &state.backend {
        Some(backend) => pages::dashboard(&DashboardView::load(backend, start_of_local_day()).await, true),
        None => pages::dashboard(&DashboardView::default(), false),
    };

    state.render(Route::Dashboard, &body)
}

async fn signals_page(State(state): State<DashboardState>, Query(params): Query<LiveParams>) -> Html<String> {
    let agent = params.agent.as_deref().and_then(|agent| agent.parse::<Agent>().ok());

    let body = match &state.backend {
        Some(backend) => pages::signals(&SignalsView::load(backend, agent).await, true),
        None => pages::signals(
            &SignalsView {
                agent,
                ..Default::default()
            },
            false,
        ),
    };

    state.render(Route::Signals, &body)
}

async fn backtests_page(State(state): State<DashboardState>) -> Html<String> {
    let view = match &state.backend {
        Some(backend) => BacktestsView::load(backend).await,
        None => BacktestsView::default(),
    };

    state.render(Route::Backtests, &pages::backtests(&view))
}

async fn universe_page(State(state): State<DashboardState>) -> Html<String> {
    state.render(Route::Universe, &pages::placeholder(Route::Universe))
}

async fn jobs_page(State(state): State<DashboardState>) -> Html<String> {
    state.render(Route::Jobs, &pages::placeholder(Route::Jobs))
}

async fn settings_page(State(state): State<DashboardState>) -> Html<String> {
    state.render(Route::Settings, &pages::settings(state.backend.is_some()))
}

async fn help_page(State(state): State<DashboardState>) -> Html<String> {
    state.render(Route::Help, &pages::help())
}

async fn not_found_page(State(state): State<DashboardState>, uri: Uri) -> impl IntoResponse {
    let html = page(
        uri.path(),
        "Niet gevonden",
        &pages::not_found(uri.path()),
        state.config_error.as_deref(),
    );

    (StatusCode::NOT_FOUND, Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::dummy::{dummy_backend::DummyBackend, dummy_feed::seed};
    use actix::Arbiter;

    async fn get_page(state: DashboardState, path: &str) -> (StatusCode, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move { axum::serve(listener, router(state)).await });

        let res = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
        let status = StatusCode::from_u16(res.status().as_u16()).unwrap();
        let body = res.text().await.unwrap();
        server.abort();

        (status, body)
    }

    fn seeded_state() -> DashboardState {
        let dummy = DummyBackend::new();
        seed(&dummy);

        DashboardState {
            backend: Some(Backend::Dummy(dummy)),
            config_error: None,
            arbiter: Arbiter::current(),
        }
    }

    fn unconfigured_state() -> DashboardState {
        DashboardState {
            backend: None,
            config_error: Some("SUPABASE_URL niet gezet".to_string()),
            arbiter: Arbiter::current(),
        }
    }

    #[actix::test]
    async fn renders_every_sidebar_page() {
        for route in Route::ALL {
            let (status, html) = get_page(seeded_state(), route.path()).await;
            assert_eq!(status, StatusCode::OK, "{}", route.path());
            assert!(html.contains(&format!("<h1>{}</h1>", route.label())));
        }
    }

    #[actix::test]
    async fn dashboard_shows_one_card_per_agent() {
        let (_, html) = get_page(seeded_state(), "/").await;

        assert!(html.contains("Crypto equity (laatste)"));
        assert!(html.contains("Aandelen equity (laatste)"));
        assert!(html.contains(r#"data-live="/ws/live/trades""#));
    }

    #[actix::test]
    async fn unknown_paths_render_not_found() {
        let (status, html) = get_page(seeded_state(), "/bestaat/niet").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("<code>/bestaat/niet</code>"));
    }

    #[actix::test]
    async fn missing_configuration_shows_banner_without_data() {
        let (status, html) = get_page(unconfigured_state(), "/signalen").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(r#"<div class="banner">SUPABASE_URL niet gezet</div>"#));
        assert!(!html.contains(r#"data-live=""#));

        let (_, html) = get_page(unconfigured_state(), "/instellingen").await;
        assert!(!html.contains(r#"<form id="settings-form""#));
    }
}
