use crate::{
    models::{agent::Agent, side::Side, traits::table_row::TableRow},
    utils::serde_helpers::deserialize_ts,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: DateTime<Utc>,
    pub symbol: String,
    pub side: Side,
    /// Model confidence in [0, 1].
    pub confidence: Option<f64>,
    pub reason: Option<String>,
    pub agent: Agent,
}

impl TableRow for SignalRow {
    const TABLE: &'static str = "signals";
    const COLUMNS: &'static str = "ts,symbol,side,confidence,reason,agent";
    const ORDER_COLUMN: &'static str = "ts";
}
