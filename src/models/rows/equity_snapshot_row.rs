use crate::{
    models::{agent::Agent, traits::table_row::TableRow},
    utils::serde_helpers::deserialize_ts,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquitySnapshotRow {
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: DateTime<Utc>,
    pub equity: f64,
    pub day_pnl: Option<f64>,
    pub agent: Agent,
}

impl TableRow for EquitySnapshotRow {
    const TABLE: &'static str = "equity_snapshots";
    const COLUMNS: &'static str = "ts,equity,day_pnl,agent";
    const ORDER_COLUMN: &'static str = "ts";
}
