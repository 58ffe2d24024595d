#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Signals,
    Backtests,
    Universe,
    Jobs,
    Settings,
    Help,
}

impl Route {
    /// Sidebar order.
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Signals,
        Route::Backtests,
        Route::Universe,
        Route::Jobs,
        Route::Settings,
        Route::Help,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Signals => "/signalen",
            Route::Backtests => "/backtests",
            Route::Universe => "/universe",
            Route::Jobs => "/jobs",
            Route::Settings => "/instellingen",
            Route::Help => "/help",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Signals => "Signalen",
            Route::Backtests => "Backtests",
            Route::Universe => "Universe",
            Route::Jobs => "Jobs",
            Route::Settings => "Instellingen",
            Route::Help => "Help",
        }
    }

    /// The overview only matches its own path; every other entry also
    /// matches nested paths.
    pub fn is_active(&self, current_path: &str) -> bool {
        let path = self.path();

        match self {
            Route::Dashboard => current_path == path,
            _ => {
                current_path == path
                    || current_path
                        .strip_prefix(path)
                        .map_or(false, |rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarItem {
    pub route: Route,
    pub active: bool,
}

pub fn sidebar(current_path: &str) -> Vec<SidebarItem> {
    Route::ALL
        .iter()
        .map(|route| SidebarItem {
            route: *route,
            active: route.is_active(current_path),
        })
        .collect()
}

pub fn footer(year: i32) -> String {
    format!("© {} – NL / EUR", year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(path: &str) -> Vec<&'static str> {
        sidebar(path)
            .into_iter()
            .filter(|item| item.active)
            .map(|item| item.route.label())
            .collect()
    }

    #[test]
    fn overview_matches_only_the_root() {
        assert_eq!(active("/"), vec!["Dashboard"]);
        assert_eq!(active("/signalen"), vec!["Signalen"]);
    }

    #[test]
    fn other_routes_match_by_prefix() {
        assert_eq!(active("/backtests/42"), vec!["Backtests"]);
        assert!(active("/backtestsx").is_empty());
        assert!(active("/onbekend").is_empty());
    }

    #[test]
    fn sidebar_lists_all_routes_in_order() {
        let labels: Vec<&str> = sidebar("/").iter().map(|item| item.route.label()).collect();
        assert_eq!(
            labels,
            vec!["Dashboard", "Signalen", "Backtests", "Universe", "Jobs", "Instellingen", "Help"]
        );
        assert_eq!(footer(2025), "© 2025 – NL / EUR");
    }
}
