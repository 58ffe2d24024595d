use crate::{
    models::{
        fx_source::FxSource,
        rows::strategy_params::{CryptoStrategy, StocksStrategy},
        traits::table_row::TableRow,
    },
    utils::{
        constants::SETTINGS_COLUMNS,
        serde_helpers::{lenient, lenient_f64, lenient_list, lenient_ts},
    },
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton configuration record as stored by the backend. Every column
/// is nullable there, so every field is optional here; defaults are applied by
/// the settings form. A malformed column reads as missing, so one bad value
/// never hides the rest of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRow {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub fx_source: Option<FxSource>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fallback_usdt_eur: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub whitelist: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub strategy_crypto: Option<CryptoStrategy>,
    #[serde(default, deserialize_with = "lenient")]
    pub strategy_stocks: Option<StocksStrategy>,
    #[serde(default, deserialize_with = "lenient")]
    pub use_ai_crypto: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub use_ai_stocks: Option<bool>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ai_conf_min: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_ts",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SettingsRow {
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            id: crate::utils::constants::SETTINGS_ID,
            fx_source: None,
            fallback_usdt_eur: None,
            whitelist: None,
            strategy_crypto: None,
            strategy_stocks: None,
            use_ai_crypto: None,
            use_ai_stocks: None,
            ai_conf_min: None,
            updated_at: None,
        }
    }
}

impl TableRow for SettingsRow {
    const TABLE: &'static str = "settings";
    const COLUMNS: &'static str = SETTINGS_COLUMNS;
    const ORDER_COLUMN: &'static str = "id";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn a_bad_column_keeps_the_rest_of_the_record() {
        let row: SettingsRow = serde_json::from_value(json!({
            "id": 1,
            "fx_source": "weird",
            "fallback_usdt_eur": 1.1,
            "whitelist": ["SOLEUR"],
            "strategy_crypto": {"timeframe": "1h", "rsi_buy": "", "cooldown_sec": 7200.0},
            "strategy_stocks": "broken",
            "use_ai_crypto": "yes",
            "ai_conf_min": "0.7",
            "updated_at": "not a time",
        }))
        .unwrap();

        assert_eq!(row.fx_source, None);
        assert_eq!(row.fallback_usdt_eur, Some(1.1));
        assert_eq!(row.whitelist, Some(vec!["SOLEUR".to_string()]));
        assert_eq!(row.strategy_stocks, None);
        assert_eq!(row.use_ai_crypto, None);
        assert_eq!(row.ai_conf_min, Some(0.7));
        assert_eq!(row.updated_at, None);

        let crypto = row.strategy_crypto.unwrap();
        assert_eq!(crypto.timeframe, "1h");
        assert_eq!(crypto.thresholds.rsi_buy, 30.0);
        assert_eq!(crypto.thresholds.cooldown_sec, 7200);
    }

    #[test]
    fn null_columns_read_as_missing() {
        let row: SettingsRow =
            serde_json::from_value(json!({"id": 1, "whitelist": null, "strategy_crypto": null})).unwrap();
        assert_eq!(row, SettingsRow::empty());
    }
}
