use crate::{
    data_sources::backend::Backend,
    models::{agent::Agent, query::Query, rows::signal_row::SignalRow, traits::table_row::TableRow},
    utils::{constants::SIGNALS_PAGE_LIMIT, formatting::fmt_ts},
    views::table_view::TableView,
};
use tracing::warn;

impl TableView for SignalRow {
    fn headers() -> &'static [&'static str] {
        &["Datum", "Agent", "Instrument", "Kant", "Conf.", "Reden"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            fmt_ts(&self.ts),
            self.agent.to_string(),
            self.symbol.clone(),
            self.side.to_string(),
            format!("{:.2}", self.confidence.unwrap_or(0.0)),
            self.reason.clone().unwrap_or_default(),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignalsView {
    pub agent: Option<Agent>,
    pub rows: Vec<SignalRow>,
    pub error: Option<String>,
}

impl SignalsView {
    pub fn query(agent: Option<Agent>) -> Query {
        let query = Query::from_table(SignalRow::TABLE)
            .select(SignalRow::COLUMNS)
            .order(SignalRow::ORDER_COLUMN, false)
            .limit(SIGNALS_PAGE_LIMIT);

        match agent {
            Some(agent) => query.eq("agent", agent.as_str()),
            None => query,
        }
    }

    /// One-shot fetch of the most recent signals.
    pub async fn load(backend: &Backend, agent: Option<Agent>) -> Self {
        match backend.select_rows::<SignalRow>(&Self::query(agent)).await {
            Ok(rows) => Self { agent, rows, error: None },
            Err(e) => {
                warn!(error = %e, "loading signals failed");
                Self {
                    agent,
                    rows: vec![],
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
