use crate::{
    models::{
        agent::Agent,
        fx_source::FxSource,
        rows::{strategy_params::StrategyThresholds, trade_row::TradeRow},
    },
    server::html::layout::escape,
    views::{
        backtests_view::BacktestsView,
        dashboard_view::DashboardView,
        help_view::{placeholder_text, HELP_COMING_SOON, HELP_STEPS},
        navigation::Route,
        signals_view::SignalsView,
        table_view::TableView,
    },
};

/// A table, optionally kept live over a websocket at `live`. The
/// server-rendered rows are the first paint; the socket replaces them.
pub fn table<R: TableView>(id: &str, rows: &[R], live: Option<&str>, error: Option<&str>) -> String {
    let head: String = R::headers()
        .iter()
        .map(|h| format!("<th>{}</th>", escape(h)))
        .collect();

    let body: String = if rows.is_empty() {
        format!(
            r#"<tr><td colspan="{}">{}</td></tr>"#,
            R::headers().len(),
            escape(R::empty_text())
        )
    } else {
        rows.iter()
            .map(|row| {
                let cells: String = row
                    .cells()
                    .iter()
                    .map(|cell| format!("<td>{}</td>", escape(cell)))
                    .collect();
                format!("<tr>{}</tr>", cells)
            })
            .collect()
    };

    let live = live
        .map(|url| format!(r#" data-live="{}""#, escape(url)))
        .unwrap_or_default();

    format!(
        r#"<div id="{id}-error" class="error">{error}</div><div class="box"><table id="{id}"{live}><thead><tr>{head}</tr></thead><tbody>{body}</tbody></table></div>"#,
        id = id,
        error = escape(error.unwrap_or_default()),
        live = live,
        head = head,
        body = body,
    )
}

fn card(title: &str, value: &str, sub: &str) -> String {
    let sub = if sub.is_empty() {
        String::new()
    } else {
        format!(r#"<div class="sub">{}</div>"#, escape(sub))
    };

    format!(
        r#"<div class="card"><div class="title">{}</div><div class="value">{}</div>{}</div>"#,
        escape(title),
        escape(value),
        sub
    )
}

fn errors(messages: &[String]) -> String {
    messages
        .iter()
        .map(|message| format!(r#"<div class="error">{}</div>"#, escape(message)))
        .collect()
}

pub fn dashboard(view: &DashboardView, live: bool) -> String {
    let mut cards: String = view
        .cards
        .iter()
        .map(|c| card(&c.title, &c.value, &c.sub))
        .collect();
    cards.push_str(&card("Signalen (vandaag)", &view.signals_today.to_string(), ""));
    cards.push_str(&card("Trades (vandaag)", &view.trades_today.to_string(), ""));

    let trades = table::<TradeRow>(
        "recent-trades",
        &[],
        live.then_some("/ws/live/trades"),
        None,
    );

    format!(
        r#"{}<div class="cards">{}</div><h3>Recente trades</h3>{}"#,
        errors(&view.errors),
        cards,
        trades
    )
}

fn agent_filters(selected: Option<Agent>) -> String {
    let mut links = vec![(None, "Alle")];
    links.extend(Agent::KNOWN.iter().map(|agent| (Some(*agent), agent.label())));

    let links: String = links
        .into_iter()
        .map(|(agent, label)| {
            let href = match agent {
                Some(agent) => format!("/signalen?agent={}", agent.as_str()),
                None => "/signalen".to_string(),
            };
            if agent == selected {
                format!("<strong>{}</strong> ", label)
            } else {
                format!(r#"<a href="{}">{}</a>"#, href, label)
            }
        })
        .collect();

    format!(r#"<div class="filters">{}</div>"#, links)
}

pub fn signals(view: &SignalsView, live: bool) -> String {
    let url = match view.agent {
        Some(agent) => format!("/ws/live/signals?agent={}", agent.as_str()),
        None => "/ws/live/signals".to_string(),
    };

    format!(
        "{}{}",
        agent_filters(view.agent),
        table("signals", &view.rows, live.then_some(url.as_str()), view.error.as_deref())
    )
}

pub fn backtests(view: &BacktestsView) -> String {
    table("backtests", &view.rows, None, view.error.as_deref())
}

pub fn help() -> String {
    let steps: String = HELP_STEPS
        .iter()
        .map(|step| format!("<li>{}</li>", escape(step)))
        .collect();

    format!("<ol>{}</ol><p>{}</p>", steps, escape(HELP_COMING_SOON))
}

pub fn placeholder(route: Route) -> String {
    format!("<p>{}</p>", escape(placeholder_text(route).unwrap_or_default()))
}

pub fn not_found(path: &str) -> String {
    format!(
        r#"<p>Pagina <code>{}</code> bestaat niet. <a href="/">Terug naar het overzicht</a>.</p>"#,
        escape(path)
    )
}

fn field(label: &str, input: &str) -> String {
    format!("<label><span>{}</span>{}</label>", escape(label), input)
}

fn text_input(name: &str) -> String {
    format!(r#"<input name="{}" data-kind="text">"#, name)
}

fn number_input(name: &str, kind: &str, step: &str) -> String {
    format!(r#"<input type="number" name="{}" data-kind="{}" step="{}">"#, name, kind, step)
}

fn checkbox(name: &str) -> String {
    format!(r#"<input type="checkbox" name="{}" data-kind="bool">"#, name)
}

fn strategy_section(title: &str, prefix: &str, period_field: &str, period_label: &str) -> String {
    let mut fields = field(period_label, &text_input(&format!("{}.{}", prefix, period_field)));

    for (key, label, kind, step) in StrategyThresholds::FIELDS {
        fields.push_str(&field(label, &number_input(&format!("{}.{}", prefix, key), kind, step)));
    }

    format!(r#"<section><h3>{}</h3><div class="grid">{}</div></section>"#, escape(title), fields)
}

/// The settings form. Values arrive over the settings socket; the form stays
/// hidden until the first load has finished.
pub fn settings(enabled: bool) -> String {
    if !enabled {
        return String::new();
    }

    let fx_options: String = FxSource::ALL
        .iter()
        .map(|source| format!(r#"<option value="{}">{}</option>"#, source.as_str(), escape(source.label())))
        .collect();

    let general = [
        field(
            "FX bron",
            &format!(r#"<select name="fx_source" data-kind="text">{}</select>"#, fx_options),
        ),
        field("Fallback USDT→EUR", &number_input("fallback_usdt_eur", "text", "0.001")),
        field("Crypto-whitelist (comma)", &text_input("whitelist")),
    ]
    .concat();

    let ai = [
        field("AI voor Crypto", &checkbox("use_ai_crypto")),
        field("AI voor Aandelen", &checkbox("use_ai_stocks")),
        field(
            "AI confidence drempel (0.50–0.90)",
            &format!(
                r#"{}<span class="hint">Voorbeeld: 0.60 betekent alleen BUY als model ≥ 60% kans op stijging; SELL als ≤ 40%.</span>"#,
                number_input("ai_conf_min", "text", "0.01")
            ),
        ),
    ]
    .concat();

    format!(
        r#"<div id="settings-loading">Bezig met laden…</div>
<div id="settings-load-error" class="error"></div>
<form id="settings-form" style="display:none">
<section><h3>Algemeen (EUR &amp; FX)</h3><div class="grid">{general}</div></section>
<section><h3>AI &amp; Modellen</h3><div class="grid">{ai}</div></section>
{crypto}
{stocks}
<div id="settings-validation" class="error"></div>
<div><button type="submit">Opslaan</button> <span id="settings-status"></span></div>
</form>"#,
        general = general,
        ai = ai,
        crypto = strategy_section("Strategie – Crypto (swing)", "strategy_crypto", "timeframe", "Timeframe"),
        stocks = strategy_section("Strategie – Aandelen (swing)", "strategy_stocks", "interval", "Interval"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rows::backtest_run_row::BacktestRunRow;

    #[test]
    fn empty_table_shows_its_empty_text() {
        let html = table::<BacktestRunRow>("backtests", &[], None, None);
        assert!(html.contains(r#"<td colspan="9">Geen backtests gevonden.</td>"#));
        assert!(!html.contains("data-live"));
    }

    #[test]
    fn live_signals_table_keeps_the_agent_filter() {
        let view = SignalsView {
            agent: Some(Agent::Stocks),
            ..SignalsView::default()
        };

        let html = signals(&view, true);
        assert!(html.contains(r#"data-live="/ws/live/signals?agent=stocks""#));
        assert!(html.contains("<strong>Aandelen</strong>"));
        assert!(html.contains("Geen data"));
    }

    #[test]
    fn settings_form_names_every_strategy_field() {
        let html = settings(true);
        assert!(html.contains("Bezig met laden…"));
        assert!(html.contains(r#"name="strategy_crypto.timeframe""#));
        assert!(html.contains(r#"name="strategy_stocks.interval""#));
        assert!(html.contains(r#"name="strategy_stocks.cooldown_sec" data-kind="int""#));
        assert!(html.contains(r#"name="ai_conf_min" data-kind="text""#));
        assert!(html.contains(r#"<option value="manual">handmatig (fallback)</option>"#));
    }
}
