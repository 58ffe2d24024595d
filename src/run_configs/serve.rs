use crate::{
    data_sources::{
        backend::Backend,
        dummy::{
            dummy_backend::DummyBackend,
            dummy_feed::{seed, spawn_demo_feed},
        },
        supabase::{supabase_client::SupabaseClient, supabase_config::SupabaseConfig},
    },
    server::dashboard_server::{serve, DashboardState},
};
use actix::Arbiter;
use anyhow::Result;
use std::{net::SocketAddr, time::Duration};
use tracing::{info, warn};

const DEMO_FEED_EVERY: Duration = Duration::from_secs(5);

/// Serves the dashboard against the configured backend. Missing configuration
/// is not fatal: every page shows it as a banner.
pub async fn run(addr: SocketAddr) -> Result<()> {
    let state = match SupabaseConfig::from_env() {
        Ok(config) => {
            info!(url = %config.url, "using supabase backend");
            DashboardState {
                backend: Some(Backend::Supabase(SupabaseClient::new(config))),
                config_error: None,
                arbiter: Arbiter::current(),
            }
        }
        Err(e) => {
            warn!(error = %e, "backend not configured");
            DashboardState {
                backend: None,
                config_error: Some(e.to_string()),
                arbiter: Arbiter::current(),
            }
        }
    };

    serve(state, addr).await
}

/// Serves the dashboard on seeded in-memory data that keeps changing.
pub async fn run_demo(addr: SocketAddr) -> Result<()> {
    let dummy = DummyBackend::new();
    seed(&dummy);

    let feed = spawn_demo_feed(dummy.clone(), DEMO_FEED_EVERY);
    info!("demo mode, no data leaves this process");

    let state = DashboardState {
        backend: Some(Backend::Dummy(dummy)),
        config_error: None,
        arbiter: Arbiter::current(),
    };

    let res = serve(state, addr).await;
    feed.abort();

    res
}
