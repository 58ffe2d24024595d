use crate::views::navigation::Route;

pub const HELP_STEPS: [&str; 3] = [
    "Start bots (crypto/stocks) → er komen equity, signalen en trades binnen.",
    "Backfill & Train AI → daarna zie je runs bij Backtests.",
    "Instellingen → stel EUR/FX en drempels in.",
];

pub const HELP_COMING_SOON: &str =
    "Binnenkort: Universe (tickers) en Jobs (backfill/train) vanuit dit dashboard.";

/// Body text of the pages that are not built yet.
pub fn placeholder_text(route: Route) -> Option<&'static str> {
    match route {
        Route::Universe => Some("Beheer van tickers volgt binnenkort."),
        Route::Jobs => Some("Backfill- en trainjobs starten volgt binnenkort."),
        _ => None,
    }
}
