pub mod backtest_run_row;
pub mod equity_snapshot_row;
pub mod settings_row;
pub mod signal_row;
pub mod strategy_params;
pub mod trade_row;
