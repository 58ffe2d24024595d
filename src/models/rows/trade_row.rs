use crate::{
    models::{agent::Agent, side::Side, traits::table_row::TableRow},
    utils::serde_helpers::deserialize_ts,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    #[serde(deserialize_with = "deserialize_ts")]
    pub ts: DateTime<Utc>,
    pub symbol: String,
    pub side: Side,
    pub qty: Option<f64>,
    pub price: Option<f64>,
    pub price_eur: Option<f64>,
    pub quote_ccy: Option<String>,
    pub agent: Agent,
}

impl TableRow for TradeRow {
    const TABLE: &'static str = "trades";
    const COLUMNS: &'static str = "ts,symbol,side,qty,price,price_eur,quote_ccy,agent";
    const ORDER_COLUMN: &'static str = "ts";
}
