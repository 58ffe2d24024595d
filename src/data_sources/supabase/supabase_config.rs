use crate::models::dashboard_error::DashboardError;
use std::env;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "VITE_SUPABASE_URL"];
const KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"];

/// Endpoint and public client key of the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| lookup(name))
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty())
        };

        let url = first(&URL_VARS);
        let anon_key = first(&KEY_VARS);

        match (url, anon_key) {
            (Some(url), Some(anon_key)) => Ok(Self {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (url, anon_key) => {
                let mut missing = vec![];
                if url.is_none() {
                    missing.push(URL_VARS[0]);
                }
                if anon_key.is_none() {
                    missing.push(KEY_VARS[0]);
                }
                Err(DashboardError::MissingConfig(format!(
                    "{} niet gezet",
                    missing.join(" en ")
                )))
            }
        }
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    pub fn realtime_url(&self) -> String {
        let host = self
            .url
            .strip_prefix("https://")
            .map(|rest| format!("wss://{}", rest))
            .or_else(|| self.url.strip_prefix("http://").map(|rest| format!("ws://{}", rest)))
            .unwrap_or_else(|| self.url.clone());

        format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", host, self.anon_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_primary_and_fallback_names() {
        let config = SupabaseConfig::from_lookup(lookup(&[
            ("VITE_SUPABASE_URL", "https://demo.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.rest_url("signals"), "https://demo.supabase.co/rest/v1/signals");
        assert_eq!(
            config.realtime_url(),
            "wss://demo.supabase.co/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );
    }

    #[test]
    fn missing_values_are_a_config_error() {
        let err = SupabaseConfig::from_lookup(lookup(&[("SUPABASE_URL", "  ")])).unwrap_err();
        assert_eq!(
            err,
            DashboardError::MissingConfig("SUPABASE_URL en SUPABASE_ANON_KEY niet gezet".to_string())
        );
    }
}
