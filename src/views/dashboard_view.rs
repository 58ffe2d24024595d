use crate::{
    data_sources::backend::Backend,
    models::{
        agent::Agent,
        dashboard_error::DashboardError,
        query::Query,
        rows::{equity_snapshot_row::EquitySnapshotRow, signal_row::SignalRow, trade_row::TradeRow},
        traits::table_row::TableRow,
    },
    utils::{
        constants::{EQUITY_SCAN_WINDOW, PLACEHOLDER},
        formatting::{fmt_eur, fmt_num, fmt_ts, or_placeholder},
    },
    views::table_view::TableView,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::warn;

impl TableView for TradeRow {
    fn headers() -> &'static [&'static str] {
        &["Datum", "Agent", "Instrument", "Kant", "Aantal", "Prijs", "Prijs (EUR)", "Valuta"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            fmt_ts(&self.ts),
            self.agent.to_string(),
            self.symbol.clone(),
            self.side.to_string(),
            fmt_num(self.qty, 4),
            fmt_num(self.price, 2),
            fmt_num(self.price_eur, 2),
            or_placeholder(self.quote_ccy.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityCard {
    pub title: String,
    pub value: String,
    pub sub: String,
}

impl EquityCard {
    pub fn new(agent: Agent, snapshot: Option<&EquitySnapshotRow>) -> Self {
        let title = match agent {
            Agent::Crypto => "Crypto equity (laatste)".to_string(),
            Agent::Stocks => "Aandelen equity (laatste)".to_string(),
            Agent::Other => format!("{} equity (laatste)", agent.label()),
        };

        match snapshot {
            Some(snapshot) => Self {
                title,
                value: fmt_eur(snapshot.equity),
                sub: fmt_ts(&snapshot.ts),
            },
            None => Self {
                title,
                value: PLACEHOLDER.to_string(),
                sub: String::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub cards: Vec<EquityCard>,
    pub signals_today: u64,
    pub trades_today: u64,
    pub errors: Vec<String>,
}

/// First snapshot per agent in the given (newest first) slice. Agents whose
/// latest snapshot falls outside the slice are simply absent.
pub fn latest_per_agent(snapshots: &[EquitySnapshotRow]) -> IndexMap<Agent, &EquitySnapshotRow> {
    let mut latest = IndexMap::new();

    for snapshot in snapshots {
        latest.entry(snapshot.agent).or_insert(snapshot);
    }

    latest
}

impl DashboardView {
    pub fn snapshots_query() -> Query {
        Query::from_table(EquitySnapshotRow::TABLE)
            .select(EquitySnapshotRow::COLUMNS)
            .order(EquitySnapshotRow::ORDER_COLUMN, false)
            .limit(EQUITY_SCAN_WINDOW)
    }

    pub fn count_since_query(table: &str, since: &DateTime<Utc>) -> Query {
        Query::from_table(table).gte("ts", since.to_rfc3339())
    }

    /// Overview cards plus today's counts. `since` is the start of the
    /// viewer's local day.
    pub async fn load(backend: &Backend, since: DateTime<Utc>) -> Self {
        let snapshots_query = Self::snapshots_query();
        let signals_query = Self::count_since_query(SignalRow::TABLE, &since);
        let trades_query = Self::count_since_query(TradeRow::TABLE, &since);

        let (snapshots, signals_today, trades_today) = tokio::join!(
            backend.select_rows::<EquitySnapshotRow>(&snapshots_query),
            backend.count(&signals_query),
            backend.count(&trades_query),
        );

        let mut errors = vec![];

        let snapshots = snapshots.unwrap_or_else(|e| {
            warn!(error = %e, "loading equity snapshots failed");
            errors.push(e.to_string());
            vec![]
        });

        let latest = latest_per_agent(&snapshots);
        let cards = Agent::KNOWN
            .iter()
            .map(|agent| EquityCard::new(*agent, latest.get(agent).copied()))
            .collect();

        let mut count_or_zero = |res: Result<u64, DashboardError>| {
            res.unwrap_or_else(|e| {
                warn!(error = %e, "counting today's rows failed");
                errors.push(e.to_string());
                0
            })
        };
        let signals_today = count_or_zero(signals_today);
        let trades_today = count_or_zero(trades_today);

        Self {
            cards,
            signals_today,
            trades_today,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::dummy::dummy_backend::DummyBackend;
    use chrono::TimeZone;
    use serde_json::json;

    fn snapshot(hour: u32, agent: &str, equity: f64) -> serde_json::Value {
        json!({
            "ts": format!("2025-10-14T{:02}:00:00+00:00", hour),
            "equity": equity,
            "day_pnl": null,
            "agent": agent,
        })
    }

    #[test]
    fn picks_the_first_snapshot_per_agent() {
        let rows: Vec<EquitySnapshotRow> = [
            snapshot(12, "crypto", 10_100.0),
            snapshot(11, "stocks", 20_000.0),
            snapshot(10, "crypto", 9_900.0),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

        let latest = latest_per_agent(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[&Agent::Crypto].equity, 10_100.0);
        assert_eq!(latest.keys().copied().collect::<Vec<_>>(), vec![Agent::Crypto, Agent::Stocks]);
    }

    #[actix::test]
    async fn cards_show_latest_equity_or_placeholder() {
        let dummy = DummyBackend::new();
        dummy.insert("equity_snapshots", snapshot(9, "crypto", 1_000.0));
        dummy.insert("equity_snapshots", snapshot(10, "crypto", 1_234.567));

        let since = Utc.with_ymd_and_hms(2025, 10, 14, 0, 0, 0).unwrap();
        let view = DashboardView::load(&Backend::Dummy(dummy), since).await;

        assert_eq!(
            view.cards[0],
            EquityCard {
                title: "Crypto equity (laatste)".to_string(),
                value: "1234.57 EUR".to_string(),
                sub: "2025-10-14 10:00:00".to_string(),
            }
        );
        assert_eq!(view.cards[1].value, "—");
        assert_eq!(view.cards[1].sub, "");
        assert!(view.errors.is_empty());
    }

    #[actix::test]
    async fn stocks_snapshot_outside_the_window_is_missed() {
        let dummy = DummyBackend::new();
        dummy.insert("equity_snapshots", snapshot(0, "stocks", 5_000.0));
        for i in 0..EQUITY_SCAN_WINDOW {
            dummy.insert(
                "equity_snapshots",
                json!({
                    "ts": format!("2025-10-14T01:{:02}:{:02}+00:00", i / 60, i % 60),
                    "equity": 1.0,
                    "agent": "crypto",
                }),
            );
        }

        let since = Utc.with_ymd_and_hms(2025, 10, 14, 0, 0, 0).unwrap();
        let view = DashboardView::load(&Backend::Dummy(dummy), since).await;
        assert_eq!(view.cards[1].value, "—");
    }

    #[actix::test]
    async fn counts_only_rows_since_start_of_day() {
        let dummy = DummyBackend::new();
        for ts in ["2025-10-13T23:59:59Z", "2025-10-14T00:00:00Z", "2025-10-14T09:00:00Z"] {
            dummy.insert("signals", json!({"ts": ts}));
        }
        dummy.insert("trades", json!({"ts": "2025-10-14T10:00:00Z"}));

        let since = Utc.with_ymd_and_hms(2025, 10, 14, 0, 0, 0).unwrap();
        let view = DashboardView::load(&Backend::Dummy(dummy), since).await;

        assert_eq!(view.signals_today, 2);
        assert_eq!(view.trades_today, 1);
    }

    #[actix::test]
    async fn failures_are_collected_not_fatal() {
        let dummy = DummyBackend::new();
        dummy.fail_table("trades", "permission denied");

        let view = DashboardView::load(&Backend::Dummy(dummy), Utc::now()).await;
        assert_eq!(view.trades_today, 0);
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.cards.len(), 2);
    }
}
