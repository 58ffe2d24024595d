use crate::{
    models::{agent::Agent, traits::table_row::TableRow},
    utils::serde_helpers::{deserialize_ts, one_or_none, string_list, text_or_number},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestMetrics {
    pub sharpe: Option<f64>,
    pub gross_return: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub trades_count: Option<i64>,
}

/// A backtest run left-joined with its metrics; runs without metrics keep
/// `backtest_metrics` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRunRow {
    #[serde(deserialize_with = "text_or_number")]
    pub run_id: String,
    #[serde(deserialize_with = "deserialize_ts")]
    pub created_at: DateTime<Utc>,
    pub agent: Agent,
    pub exchange: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub symbols: Vec<String>,
    pub timeframe: Option<String>,
    #[serde(default, deserialize_with = "one_or_none")]
    pub backtest_metrics: Option<BacktestMetrics>,
}

impl TableRow for BacktestRunRow {
    const TABLE: &'static str = "backtest_runs";
    const COLUMNS: &'static str = "run_id,created_at,agent,exchange,symbols,timeframe,backtest_metrics(sharpe,gross_return,max_drawdown,trades_count)";
    const ORDER_COLUMN: &'static str = "created_at";
}
