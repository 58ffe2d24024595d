use crate::{
    data_sources::dummy::dummy_backend::DummyBackend,
    models::{agent::Agent, side::Side},
    utils::constants::{DEFAULT_WHITELIST, SETTINGS_ID},
};
use chrono::{Duration as ChronoDuration, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::{task::JoinHandle, time::interval};
use tracing::{debug, info};
use uuid::Uuid;

const CRYPTO_SYMBOLS: [&str; 3] = ["BTCEUR", "ETHEUR", "SOLEUR"];
const STOCK_SYMBOLS: [&str; 3] = ["ASML", "AAPL", "MSFT"];
const REASONS: [&str; 3] = ["rsi_oversold", "z_score_revert", "take_profit"];

/// Fills an empty dummy backend with a day of representative history.
pub fn seed(backend: &DummyBackend) {
    let mut rng = StdRng::seed_from_u64(7);
    let now = Utc::now();

    for hours_ago in (1..=24).rev() {
        let ts = now - ChronoDuration::hours(hours_ago);

        for agent in Agent::KNOWN {
            let equity = match agent {
                Agent::Crypto => 10_000.0,
                _ => 25_000.0,
            } + rng.gen_range(-250.0..250.0);

            backend.insert(
                "equity_snapshots",
                json!({
                    "ts": ts.to_rfc3339(),
                    "equity": equity,
                    "day_pnl": rng.gen_range(-80.0..80.0),
                    "agent": agent.as_str(),
                }),
            );
        }

        if hours_ago % 3 == 0 {
            backend.insert("signals", signal(&mut rng, ts.to_rfc3339()));
            backend.insert("trades", trade(&mut rng, ts.to_rfc3339()));
        }
    }

    for (i, agent) in Agent::KNOWN.iter().enumerate() {
        let created_at = now - ChronoDuration::days(i as i64 + 1);
        backend.insert(
            "backtest_runs",
            json!({
                "run_id": Uuid::new_v4().to_string(),
                "created_at": created_at.to_rfc3339(),
                "agent": agent.as_str(),
                "exchange": match agent {
                    Agent::Crypto => "bitvavo",
                    _ => "degiro",
                },
                "symbols": symbols(*agent),
                "timeframe": match agent {
                    Agent::Crypto => "4h",
                    _ => "1d",
                },
                "backtest_metrics": [{
                    "sharpe": rng.gen_range(0.2..2.0),
                    "gross_return": rng.gen_range(-0.1..0.4),
                    "max_drawdown": rng.gen_range(0.02..0.2),
                    "trades_count": rng.gen_range(5..60),
                }],
            }),
        );
    }

    // A run whose metrics were never written.
    backend.insert(
        "backtest_runs",
        json!({
            "run_id": Uuid::new_v4().to_string(),
            "created_at": (now - ChronoDuration::days(5)).to_rfc3339(),
            "agent": "crypto",
            "exchange": null,
            "symbols": null,
            "timeframe": null,
            "backtest_metrics": [],
        }),
    );

    backend.insert(
        "settings",
        json!({
            "id": SETTINGS_ID,
            "fx_source": "auto",
            "fallback_usdt_eur": 0.92,
            "whitelist": DEFAULT_WHITELIST.split(',').collect::<Vec<_>>(),
            "strategy_crypto": null,
            "strategy_stocks": null,
            "use_ai_crypto": false,
            "use_ai_stocks": false,
            "ai_conf_min": 0.55,
            "updated_at": now.to_rfc3339(),
        }),
    );

    info!("demo backend seeded");
}

/// Inserts a signal, and now and then a trade, every `every`.
pub fn spawn_demo_feed(backend: DummyBackend, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        let mut ticker = interval(every);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let ts = Utc::now().to_rfc3339();

            let signal = signal(&mut rng, ts.clone());
            debug!(symbol = %signal["symbol"], "demo signal");
            backend.insert("signals", signal);

            if rng.gen_bool(0.4) {
                backend.insert("trades", trade(&mut rng, ts));
            }
        }
    })
}

fn pick_agent(rng: &mut StdRng) -> Agent {
    Agent::KNOWN[rng.gen_range(0..Agent::KNOWN.len())]
}

fn pick_symbol(rng: &mut StdRng, agent: Agent) -> &'static str {
    let symbols = match agent {
        Agent::Crypto => &CRYPTO_SYMBOLS,
        _ => &STOCK_SYMBOLS,
    };
    symbols[rng.gen_range(0..symbols.len())]
}

fn pick_side(rng: &mut StdRng) -> Side {
    if rng.gen_bool(0.5) {
        Side::Buy
    } else {
        Side::Sell
    }
}

fn symbols(agent: Agent) -> Vec<&'static str> {
    match agent {
        Agent::Crypto => CRYPTO_SYMBOLS.to_vec(),
        _ => STOCK_SYMBOLS.to_vec(),
    }
}

fn signal(rng: &mut StdRng, ts: String) -> Value {
    let agent = pick_agent(rng);

    json!({
        "ts": ts,
        "symbol": pick_symbol(rng, agent),
        "side": pick_side(rng),
        "confidence": rng.gen_range(0.3..0.95),
        "reason": REASONS[rng.gen_range(0..REASONS.len())],
        "agent": agent.as_str(),
    })
}

fn trade(rng: &mut StdRng, ts: String) -> Value {
    let agent = pick_agent(rng);
    let (price, quote_ccy) = match agent {
        Agent::Crypto => (rng.gen_range(2_000.0..60_000.0), "USDT"),
        _ => (rng.gen_range(100.0..900.0), "EUR"),
    };
    let price_eur = match quote_ccy {
        "USDT" => price * 0.92,
        _ => price,
    };

    json!({
        "ts": ts,
        "symbol": pick_symbol(rng, agent),
        "side": pick_side(rng),
        "qty": rng.gen_range(0.01..2.0),
        "price": price,
        "price_eur": price_eur,
        "quote_ccy": quote_ccy,
        "agent": agent.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            query::Query,
            rows::{backtest_run_row::BacktestRunRow, settings_row::SettingsRow, trade_row::TradeRow},
        },
        data_sources::backend::Backend,
    };

    #[actix::test]
    async fn seeded_rows_decode_as_table_rows() {
        let dummy = DummyBackend::new();
        seed(&dummy);
        let backend = Backend::Dummy(dummy);

        let trades: Vec<TradeRow> = backend.select_rows(&Query::from_table("trades")).await.unwrap();
        assert_eq!(trades.len(), 8);

        let runs: Vec<BacktestRunRow> = backend
            .select_rows(&Query::from_table("backtest_runs"))
            .await
            .unwrap();
        assert_eq!(runs.iter().filter(|run| run.backtest_metrics.is_none()).count(), 1);

        let settings: Vec<SettingsRow> = backend
            .select_rows(&Query::from_table("settings").eq("id", SETTINGS_ID))
            .await
            .unwrap();
        assert_eq!(settings[0].fallback_usdt_eur, Some(0.92));
    }
}
