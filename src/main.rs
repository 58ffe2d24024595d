mod data_sources;
mod models;
mod run_configs;
mod server;
mod utils;
mod views;

use crate::{
    models::agent::Agent,
    run_configs::watch::WatchTable,
    utils::constants::{DEFAULT_DASHBOARD_HOST, DEFAULT_DASHBOARD_PORT, DEFAULT_LIVE_TABLE_LIMIT},
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "trading-dashboard", about = "Read-mostly dashboard for the trading agents", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, env = "DASHBOARD_HOST", default_value = DEFAULT_DASHBOARD_HOST, global = true)]
    host: String,

    #[arg(long, env = "DASHBOARD_PORT", default_value_t = DEFAULT_DASHBOARD_PORT, global = true)]
    port: u16,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard against the configured backend (default)
    Serve,
    /// Serve the dashboard on seeded in-memory data
    Demo,
    /// Log a live table to the terminal
    Watch {
        #[arg(value_enum, default_value = "signals")]
        table: WatchTable,

        /// crypto or stocks
        #[arg(long)]
        agent: Option<Agent>,

        #[arg(long, default_value_t = DEFAULT_LIVE_TABLE_LIMIT)]
        limit: usize,
    },
}

#[actix::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trading_dashboard=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cli.host, cli.port))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_configs::serve::run(addr).await,
        Command::Demo => run_configs::serve::run_demo(addr).await,
        Command::Watch { table, agent, limit } => run_configs::watch::run(table, agent, limit).await,
    }
}
