use crate::{
    models::{
        dashboard_error::DashboardError,
        fx_source::FxSource,
        rows::{
            settings_row::SettingsRow,
            strategy_params::{CryptoStrategy, StocksStrategy},
        },
    },
    utils::constants::{
        DEFAULT_AI_CONF_MIN, DEFAULT_FALLBACK_USDT_EUR, DEFAULT_WHITELIST, FALLBACK_RATE_MAX,
        FALLBACK_RATE_MIN, SETTINGS_ID,
    },
};
use serde::{Deserialize, Serialize};

/// Editable copy of the settings record. Free-text inputs stay text until
/// they are validated on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub fx_source: FxSource,
    pub fallback_usdt_eur: String,
    pub whitelist: String,
    pub strategy_crypto: CryptoStrategy,
    pub strategy_stocks: StocksStrategy,
    pub use_ai_crypto: bool,
    pub use_ai_stocks: bool,
    pub ai_conf_min: String,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self {
            fx_source: FxSource::default(),
            fallback_usdt_eur: DEFAULT_FALLBACK_USDT_EUR.to_string(),
            whitelist: DEFAULT_WHITELIST.to_string(),
            strategy_crypto: CryptoStrategy::default(),
            strategy_stocks: StocksStrategy::default(),
            use_ai_crypto: false,
            use_ai_stocks: false,
            ai_conf_min: DEFAULT_AI_CONF_MIN.to_string(),
        }
    }
}

impl SettingsForm {
    /// Server values, falling back per field. A stored record with no
    /// whitelist shows an empty one rather than the default.
    pub fn from_row(row: &SettingsRow) -> Self {
        Self {
            fx_source: row.fx_source.unwrap_or_default(),
            fallback_usdt_eur: row
                .fallback_usdt_eur
                .unwrap_or(DEFAULT_FALLBACK_USDT_EUR)
                .to_string(),
            whitelist: row
                .whitelist
                .as_ref()
                .map(|symbols| symbols.join(","))
                .unwrap_or_default(),
            strategy_crypto: row.strategy_crypto.clone().unwrap_or_default(),
            strategy_stocks: row.strategy_stocks.clone().unwrap_or_default(),
            use_ai_crypto: row.use_ai_crypto.unwrap_or(false),
            use_ai_stocks: row.use_ai_stocks.unwrap_or(false),
            ai_conf_min: row.ai_conf_min.unwrap_or(DEFAULT_AI_CONF_MIN).to_string(),
        }
    }

    /// Checks every field and produces the full record to upsert.
    pub fn validate(&self) -> Result<SettingsRow, DashboardError> {
        let fallback_usdt_eur = parse_fallback_rate(&self.fallback_usdt_eur)?;
        let ai_conf_min = parse_ai_conf_min(&self.ai_conf_min)?;

        Ok(SettingsRow {
            id: SETTINGS_ID,
            fx_source: Some(self.fx_source),
            fallback_usdt_eur: Some(fallback_usdt_eur),
            whitelist: Some(parse_whitelist(&self.whitelist)),
            strategy_crypto: Some(self.strategy_crypto.clone()),
            strategy_stocks: Some(self.strategy_stocks.clone()),
            use_ai_crypto: Some(self.use_ai_crypto),
            use_ai_stocks: Some(self.use_ai_stocks),
            ai_conf_min: Some(ai_conf_min),
            updated_at: None,
        })
    }
}

pub fn parse_fallback_rate(text: &str) -> Result<f64, DashboardError> {
    match text.trim().parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > FALLBACK_RATE_MIN && rate < FALLBACK_RATE_MAX => Ok(rate),
        _ => Err(DashboardError::Validation(format!(
            "Fallback USDT→EUR moet een getal tussen {} en {} zijn.",
            FALLBACK_RATE_MIN, FALLBACK_RATE_MAX
        ))),
    }
}

pub fn parse_ai_conf_min(text: &str) -> Result<f64, DashboardError> {
    match text.trim().parse::<f64>() {
        Ok(threshold) if threshold.is_finite() && (0.0..=1.0).contains(&threshold) => Ok(threshold),
        _ => Err(DashboardError::Validation(
            "AI confidence drempel moet een getal tussen 0 en 1 zijn.".to_string(),
        )),
    }
}

pub fn parse_whitelist(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_rate_bounds_are_exclusive() {
        assert!(parse_fallback_rate("0.4").is_err());
        assert!(parse_fallback_rate("0.5").is_err());
        assert!(parse_fallback_rate("1.5").is_err());
        assert!(parse_fallback_rate("abc").is_err());
        assert!(parse_fallback_rate("NaN").is_err());
        assert_eq!(parse_fallback_rate(" 0.92 ").unwrap(), 0.92);
    }

    #[test]
    fn whitelist_entries_are_trimmed_and_blank_ones_dropped() {
        assert_eq!(parse_whitelist(" BTCEUR, ,ETHEUR ,"), vec!["BTCEUR", "ETHEUR"]);
        assert!(parse_whitelist("").is_empty());
    }

    #[test]
    fn validate_builds_the_full_record() {
        let form = SettingsForm {
            fallback_usdt_eur: "0.95".to_string(),
            whitelist: "SOLEUR, BTCEUR".to_string(),
            use_ai_stocks: true,
            ..SettingsForm::default()
        };

        let row = form.validate().unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.fallback_usdt_eur, Some(0.95));
        assert_eq!(row.whitelist, Some(vec!["SOLEUR".to_string(), "BTCEUR".to_string()]));
        assert_eq!(row.use_ai_stocks, Some(true));
        assert_eq!(row.strategy_crypto, Some(CryptoStrategy::default()));
        assert_eq!(row.ai_conf_min, Some(0.55));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let form = SettingsForm {
            ai_conf_min: "1.2".to_string(),
            ..SettingsForm::default()
        };
        assert!(matches!(form.validate(), Err(DashboardError::Validation(_))));
    }

    #[test]
    fn server_values_fill_the_form_with_per_field_defaults() {
        let mut row = SettingsRow::empty();
        row.fallback_usdt_eur = Some(1.1);
        row.use_ai_crypto = Some(true);

        let form = SettingsForm::from_row(&row);
        assert_eq!(form.fallback_usdt_eur, "1.1");
        assert_eq!(form.whitelist, "");
        assert_eq!(form.fx_source, FxSource::Auto);
        assert!(form.use_ai_crypto);
        assert_eq!(form.ai_conf_min, "0.55");
        assert_eq!(form.strategy_stocks, StocksStrategy::default());
    }

    #[test]
    fn partial_form_payloads_use_defaults() {
        let form: SettingsForm =
            serde_json::from_str(r#"{"fallback_usdt_eur": "1.0", "strategy_crypto": {"rsi_buy": 28}}"#).unwrap();

        assert_eq!(form.fallback_usdt_eur, "1.0");
        assert_eq!(form.whitelist, "BTCEUR,ETHEUR");
        assert_eq!(form.strategy_crypto.thresholds.rsi_buy, 28.0);
        assert_eq!(form.strategy_crypto.timeframe, "4h");
    }
}
