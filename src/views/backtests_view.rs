use crate::{
    data_sources::backend::Backend,
    models::{query::Query, rows::backtest_run_row::BacktestRunRow, traits::table_row::TableRow},
    utils::{
        constants::{BACKTESTS_PAGE_LIMIT, PLACEHOLDER},
        formatting::{fmt_count, fmt_num, fmt_pct, fmt_ts_local, or_placeholder},
    },
    views::table_view::TableView,
};
use tracing::warn;

impl TableView for BacktestRunRow {
    fn headers() -> &'static [&'static str] {
        &[
            "Datum",
            "Agent",
            "Exchange/Bron",
            "Symbols",
            "TF/Interval",
            "Sharpe",
            "Rendement",
            "Max DD",
            "Trades",
        ]
    }

    fn cells(&self) -> Vec<String> {
        let metrics = self.backtest_metrics.clone().unwrap_or_default();
        let symbols = if self.symbols.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            self.symbols.join(", ")
        };

        vec![
            fmt_ts_local(&self.created_at),
            self.agent.to_string(),
            or_placeholder(self.exchange.as_deref()),
            symbols,
            or_placeholder(self.timeframe.as_deref()),
            fmt_num(metrics.sharpe, 2),
            fmt_pct(metrics.gross_return),
            fmt_pct(metrics.max_drawdown),
            fmt_count(metrics.trades_count),
        ]
    }

    fn empty_text() -> &'static str {
        "Geen backtests gevonden."
    }
}

#[derive(Debug, Clone, Default)]
pub struct BacktestsView {
    pub rows: Vec<BacktestRunRow>,
    pub error: Option<String>,
}

impl BacktestsView {
    pub fn query() -> Query {
        Query::from_table(BacktestRunRow::TABLE)
            .select(BacktestRunRow::COLUMNS)
            .order(BacktestRunRow::ORDER_COLUMN, false)
            .limit(BACKTESTS_PAGE_LIMIT)
    }

    pub async fn load(backend: &Backend) -> Self {
        match backend.select_rows::<BacktestRunRow>(&Self::query()).await {
            Ok(rows) => Self { rows, error: None },
            Err(e) => {
                warn!(error = %e, "loading backtests failed");
                Self {
                    rows: vec![],
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::dummy::dummy_backend::DummyBackend;
    use serde_json::json;

    #[actix::test]
    async fn runs_without_metrics_are_listed_with_placeholders() {
        let dummy = DummyBackend::new();
        dummy.insert(
            "backtest_runs",
            json!({
                "run_id": "r-1",
                "created_at": "2025-10-13T08:00:00Z",
                "agent": "stocks",
                "exchange": "degiro",
                "symbols": ["ASML", "AAPL"],
                "timeframe": "1d",
                "backtest_metrics": [{"sharpe": 1.234, "gross_return": 0.1234, "max_drawdown": 0.05, "trades_count": 12}],
            }),
        );
        dummy.insert(
            "backtest_runs",
            json!({
                "run_id": 2,
                "created_at": "2025-10-14T08:00:00Z",
                "agent": "crypto",
                "exchange": null,
                "symbols": null,
                "timeframe": null,
                "backtest_metrics": [],
            }),
        );

        let view = BacktestsView::load(&Backend::Dummy(dummy)).await;
        assert_eq!(view.rows.len(), 2);

        let bare = view.rows[0].cells();
        assert_eq!(bare[1], "crypto");
        assert_eq!(&bare[2..], &["—", "—", "—", "—", "—", "—", "—"]);

        let full = view.rows[1].cells();
        assert_eq!(&full[2..], &["degiro", "ASML, AAPL", "1d", "1.23", "12.34%", "5.00%", "12"]);
    }
}
