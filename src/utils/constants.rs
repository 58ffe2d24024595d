use std::time::Duration;

/// Identifier of the singleton settings row.
pub const SETTINGS_ID: i64 = 1;

pub const SETTINGS_COLUMNS: &str = "id,fx_source,fallback_usdt_eur,whitelist,strategy_crypto,strategy_stocks,use_ai_crypto,use_ai_stocks,ai_conf_min,updated_at";

pub const DEFAULT_FALLBACK_USDT_EUR: f64 = 0.92;
pub const DEFAULT_WHITELIST: &str = "BTCEUR,ETHEUR";
pub const DEFAULT_AI_CONF_MIN: f64 = 0.55;

/// Exclusive bounds for the manual USDT→EUR fallback rate.
pub const FALLBACK_RATE_MIN: f64 = 0.5;
pub const FALLBACK_RATE_MAX: f64 = 1.5;

/// How many recent equity snapshots the overview scans for the latest one per agent.
pub const EQUITY_SCAN_WINDOW: usize = 50;
pub const SIGNALS_PAGE_LIMIT: usize = 100;
pub const BACKTESTS_PAGE_LIMIT: usize = 100;
pub const RECENT_TRADES_LIMIT: usize = 20;
pub const DEFAULT_LIVE_TABLE_LIMIT: usize = 100;

pub const STATUS_CLEAR_DELAY: Duration = Duration::from_millis(2500);
pub const REALTIME_HEARTBEAT: Duration = Duration::from_secs(25);
pub const REALTIME_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

pub const PLACEHOLDER: &str = "—";

pub const DEFAULT_DASHBOARD_HOST: &str = "127.0.0.1";
pub const DEFAULT_DASHBOARD_PORT: u16 = 5173;
