use crate::utils::serde_helpers::{lenient, lenient_f64};
use serde::{Deserialize, Serialize};

/// Entry/exit thresholds shared by both agents' strategy bundles. Decoded
/// only as part of a bundle, which knows which defaults fill the gaps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyThresholds {
    pub cooldown_sec: i64,
    pub rsi_buy: f64,
    pub rsi_sell: f64,
    pub z_buy: f64,
    pub z_sell: f64,
    pub tp_pct: f64,
    pub sl_pct: f64,
}

impl StrategyThresholds {
    /// Form metadata per threshold: key, label, input kind, step.
    pub const FIELDS: [(&'static str, &'static str, &'static str, &'static str); 7] = [
        ("cooldown_sec", "Cooldown (sec)", "int", "1"),
        ("rsi_buy", "RSI koop", "number", "1"),
        ("rsi_sell", "RSI verkoop", "number", "1"),
        ("z_buy", "z-score koop", "number", "0.1"),
        ("z_sell", "z-score verkoop", "number", "0.1"),
        ("tp_pct", "Take-profit %", "number", "0.01"),
        ("sl_pct", "Stop-loss %", "number", "0.01"),
    ];

    pub fn crypto() -> Self {
        Self {
            cooldown_sec: 21600,
            rsi_buy: 30.0,
            rsi_sell: 55.0,
            z_buy: -2.0,
            z_sell: 0.0,
            tp_pct: 0.06,
            sl_pct: 0.03,
        }
    }

    pub fn stocks() -> Self {
        Self {
            cooldown_sec: 21600,
            rsi_buy: 35.0,
            rsi_sell: 60.0,
            z_buy: -1.5,
            z_sell: 0.0,
            tp_pct: 0.08,
            sl_pct: 0.04,
        }
    }
}

/// Thresholds as stored. A missing or malformed field reads as `None`.
#[derive(Debug, Deserialize)]
struct ThresholdsRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    cooldown_sec: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rsi_buy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    rsi_sell: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    z_buy: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    z_sell: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    tp_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    sl_pct: Option<f64>,
}

impl ThresholdsRecord {
    fn or(self, defaults: StrategyThresholds) -> StrategyThresholds {
        StrategyThresholds {
            cooldown_sec: self
                .cooldown_sec
                .map(|secs| secs.round() as i64)
                .unwrap_or(defaults.cooldown_sec),
            rsi_buy: self.rsi_buy.unwrap_or(defaults.rsi_buy),
            rsi_sell: self.rsi_sell.unwrap_or(defaults.rsi_sell),
            z_buy: self.z_buy.unwrap_or(defaults.z_buy),
            z_sell: self.z_sell.unwrap_or(defaults.z_sell),
            tp_pct: self.tp_pct.unwrap_or(defaults.tp_pct),
            sl_pct: self.sl_pct.unwrap_or(defaults.sl_pct),
        }
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CryptoStrategyRecord")]
pub struct CryptoStrategy {
    pub timeframe: String,
    #[serde(flatten)]
    pub thresholds: StrategyThresholds,
}

impl Default for CryptoStrategy {
    fn default() -> Self {
        Self {
            timeframe: "4h".to_string(),
            thresholds: StrategyThresholds::crypto(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CryptoStrategyRecord {
    #[serde(default, deserialize_with = "lenient")]
    timeframe: Option<String>,
    #[serde(flatten)]
    thresholds: ThresholdsRecord,
}

impl From<CryptoStrategyRecord> for CryptoStrategy {
    fn from(record: CryptoStrategyRecord) -> Self {
        let defaults = Self::default();

        Self {
            timeframe: non_blank(record.timeframe).unwrap_or(defaults.timeframe),
            thresholds: record.thresholds.or(defaults.thresholds),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StocksStrategyRecord")]
pub struct StocksStrategy {
    pub interval: String,
    #[serde(flatten)]
    pub thresholds: StrategyThresholds,
}

impl Default for StocksStrategy {
    fn default() -> Self {
        Self {
            interval: "1d".to_string(),
            thresholds: StrategyThresholds::stocks(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StocksStrategyRecord {
    #[serde(default, deserialize_with = "lenient")]
    interval: Option<String>,
    #[serde(flatten)]
    thresholds: ThresholdsRecord,
}

impl From<StocksStrategyRecord> for StocksStrategy {
    fn from(record: StocksStrategyRecord) -> Self {
        let defaults = Self::default();

        Self {
            interval: non_blank(record.interval).unwrap_or(defaults.interval),
            thresholds: record.thresholds.or(defaults.thresholds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundles_keep_their_flat_wire_shape() {
        let json = serde_json::to_value(StocksStrategy::default()).unwrap();
        assert_eq!(json["interval"], "1d");
        assert_eq!(json["rsi_buy"], 35.0);
        assert!(json.get("thresholds").is_none());
    }

    #[test]
    fn partial_bundles_fill_in_defaults() {
        let parsed: CryptoStrategy =
            serde_json::from_value(json!({"timeframe": "1h", "rsi_buy": 25})).unwrap();
        assert_eq!(parsed.timeframe, "1h");
        assert_eq!(parsed.thresholds.rsi_buy, 25.0);
        assert_eq!(parsed.thresholds.tp_pct, 0.06);
    }

    #[test]
    fn partial_stocks_bundles_fill_in_stocks_defaults() {
        let parsed: StocksStrategy = serde_json::from_value(json!({"interval": "1d"})).unwrap();
        assert_eq!(parsed, StocksStrategy::default());
        assert_eq!(parsed.thresholds.rsi_buy, 35.0);
        assert_eq!(parsed.thresholds.rsi_sell, 60.0);
        assert_eq!(parsed.thresholds.z_buy, -1.5);
        assert_eq!(parsed.thresholds.tp_pct, 0.08);
        assert_eq!(parsed.thresholds.sl_pct, 0.04);
    }

    #[test]
    fn malformed_thresholds_fall_back_per_field() {
        let parsed: CryptoStrategy = serde_json::from_value(json!({
            "timeframe": "",
            "cooldown_sec": 3600.4,
            "rsi_buy": "",
            "rsi_sell": "50",
            "tp_pct": null,
        }))
        .unwrap();

        assert_eq!(parsed.timeframe, "4h");
        assert_eq!(parsed.thresholds.cooldown_sec, 3600);
        assert_eq!(parsed.thresholds.rsi_buy, 30.0);
        assert_eq!(parsed.thresholds.rsi_sell, 50.0);
        assert_eq!(parsed.thresholds.tp_pct, 0.06);
    }
}
