use crate::{
    models::{
        agent::Agent,
        live_table::{live_table::LiveTable, live_table_builder::LiveTableBuilder},
        message_payloads::{
            observe_rows_payload::ObserveRowsPayload, rows_changed_payload::RowsChangedPayload,
            stop_payload::StopPayload,
        },
        query::Filter,
        rows::{signal_row::SignalRow, trade_row::TradeRow},
        traits::table_row::TableRow,
    },
    server::{channel_forwarder::ChannelForwarder, dashboard_server::DashboardState},
    utils::constants::{RECENT_TRADES_LIMIT, SIGNALS_PAGE_LIMIT},
    views::table_view::TableView,
};
use actix::Actor;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::{select, sync::mpsc::unbounded_channel};
use tracing::{debug, warn};

#[derive(Debug, Default, Deserialize)]
pub struct LiveParams {
    pub agent: Option<String>,
}

impl LiveParams {
    /// Unknown or empty values mean no filter.
    pub fn agent_filter(&self) -> Option<Filter> {
        self.agent
            .as_deref()
            .and_then(|agent| agent.parse::<Agent>().ok())
            .map(|agent| Filter::eq("agent", agent.as_str()))
    }
}

pub async fn signals_socket(
    ws: WebSocketUpgrade,
    State(state): State<DashboardState>,
    Query(params): Query<LiveParams>,
) -> Response {
    let filter = params.agent_filter();
    ws.on_upgrade(move |socket| run::<SignalRow>(socket, state, SIGNALS_PAGE_LIMIT, filter))
}

pub async fn trades_socket(
    ws: WebSocketUpgrade,
    State(state): State<DashboardState>,
    Query(params): Query<LiveParams>,
) -> Response {
    let filter = params.agent_filter();
    ws.on_upgrade(move |socket| run::<TradeRow>(socket, state, RECENT_TRADES_LIMIT, filter))
}

pub fn rows_frame<R: TableRow + TableView>(update: &RowsChangedPayload<R>) -> String {
    let rows: Vec<Vec<String>> = update.rows.iter().map(|row| row.cells()).collect();

    json!({
        "type": "rows",
        "rows": rows,
        "error": update.error,
        "loading": update.loading,
        "empty": R::empty_text(),
    })
    .to_string()
}

fn error_frame(message: &str) -> String {
    json!({
        "type": "rows",
        "rows": [],
        "error": message,
        "loading": false,
        "empty": "",
    })
    .to_string()
}

/// One live table per connection; closing the socket stops it.
async fn run<R: TableRow + TableView>(socket: WebSocket, state: DashboardState, limit: usize, filter: Option<Filter>) {
    let (mut sender, mut receiver) = socket.split();

    let Some(backend) = state.backend.clone() else {
        let frame = error_frame(state.config_error.as_deref().unwrap_or_default());
        let _ = sender.send(Message::Text(frame)).await;
        return;
    };

    let (tx, mut rx) = unbounded_channel::<RowsChangedPayload<R>>();
    let forwarder = ChannelForwarder::<RowsChangedPayload<R>>::start_in_arbiter(&state.arbiter, move |_| {
        ChannelForwarder::new(tx)
    });

    let table = LiveTableBuilder::<R>::new()
        .backend(backend)
        .limit(limit)
        .filter(filter)
        .build();

    let table = match table {
        Ok(table) => LiveTable::start_in_arbiter(&state.arbiter, move |_| table),
        Err(e) => {
            warn!(table = R::TABLE, error = %e, "unable to build live table");
            let frame = error_frame(&e.to_string());
            let _ = sender.send(Message::Text(frame)).await;
            return;
        }
    };

    table.do_send(ObserveRowsPayload {
        observer: forwarder.recipient(),
    });

    debug!(table = R::TABLE, "live socket opened");

    loop {
        select! {
            update = rx.recv() => {
                let Some(update) = update else { break };
                let frame = rows_frame(&update);
                if sender.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    table.do_send(StopPayload);
    debug!(table = R::TABLE, "live socket closed");
}
