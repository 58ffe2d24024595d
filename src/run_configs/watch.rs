use crate::{
    data_sources::{
        backend::Backend,
        supabase::{supabase_client::SupabaseClient, supabase_config::SupabaseConfig},
    },
    models::{
        agent::Agent,
        live_table::live_table_builder::LiveTableBuilder,
        message_payloads::{rows_changed_payload::RowsChangedPayload, stop_payload::StopPayload},
        query::Filter,
        rows::{signal_row::SignalRow, trade_row::TradeRow},
        traits::table_row::TableRow,
    },
    views::table_view::TableView,
};
use actix::{Actor, Context, Handler};
use anyhow::Result;
use clap::ValueEnum;
use std::marker::PhantomData;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WatchTable {
    Signals,
    Trades,
}

/// Prints every live-table change to the log.
pub struct RowLogger<R> {
    table: &'static str,
    _row: PhantomData<R>,
}

impl<R> RowLogger<R> {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            _row: PhantomData,
        }
    }
}

impl<R: TableRow + TableView> Actor for RowLogger<R> {
    type Context = Context<Self>;
}

impl<R: TableRow + TableView> Handler<RowsChangedPayload<R>> for RowLogger<R> {
    type Result = ();

    fn handle(&mut self, msg: RowsChangedPayload<R>, _ctx: &mut Self::Context) -> Self::Result {
        if msg.loading {
            return;
        }

        if let Some(error) = &msg.error {
            warn!(table = self.table, %error, "live table error");
        }

        info!(table = self.table, rows = msg.rows.len(), "{}", R::headers().join(" | "));
        for row in msg.rows.iter() {
            info!(table = self.table, "{}", row.cells().join(" | "));
        }
    }
}

pub async fn run(table: WatchTable, agent: Option<Agent>, limit: usize) -> Result<()> {
    let backend = Backend::Supabase(SupabaseClient::new(SupabaseConfig::from_env()?));
    let filter = agent.map(|agent| Filter::eq("agent", agent.as_str()));

    match table {
        WatchTable::Signals => watch::<SignalRow>(backend, filter, limit).await,
        WatchTable::Trades => watch::<TradeRow>(backend, filter, limit).await,
    }
}

async fn watch<R: TableRow + TableView>(backend: Backend, filter: Option<Filter>, limit: usize) -> Result<()> {
    let logger = RowLogger::<R>::new(R::TABLE).start();

    let live = LiveTableBuilder::<R>::new()
        .backend(backend)
        .limit(limit)
        .filter(filter)
        .observer(logger.recipient())
        .build()?
        .start();

    info!(table = R::TABLE, "watching, ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    live.do_send(StopPayload);

    Ok(())
}
