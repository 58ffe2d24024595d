use crate::{
    data_sources::{dummy::dummy_backend::DummyBackend, subscription::Subscription, supabase::supabase_client::SupabaseClient},
    models::{change_kind::ChangeKind, dashboard_error::DashboardError, query::Query},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// The hosted backend the dashboard reads from and writes settings to. Passed
/// explicitly to every view; `Dummy` keeps everything in memory.
#[derive(Debug, Clone)]
pub enum Backend {
    Supabase(SupabaseClient),
    Dummy(DummyBackend),
}

impl Backend {
    pub async fn select(&self, query: &Query) -> Result<Vec<Value>, DashboardError> {
        match self {
            Backend::Supabase(client) => client.rest.select(query).await,
            Backend::Dummy(dummy) => dummy.select(query).await,
        }
    }

    /// Rows that do not decode as `R` are skipped, the same way a live table
    /// skips undecodable events.
    pub async fn select_rows<R: DeserializeOwned>(&self, query: &Query) -> Result<Vec<R>, DashboardError> {
        let rows = self
            .select(query)
            .await?
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(table = %query.table, error = %e, "skipping undecodable row");
                    None
                }
            })
            .collect();

        Ok(rows)
    }

    /// Exact number of rows matching the query's filters.
    pub async fn count(&self, query: &Query) -> Result<u64, DashboardError> {
        match self {
            Backend::Supabase(client) => client.rest.count(query).await,
            Backend::Dummy(dummy) => dummy.count(query).await,
        }
    }

    pub async fn upsert(&self, table: &str, record: &Value) -> Result<(), DashboardError> {
        match self {
            Backend::Supabase(client) => client.rest.upsert(table, record).await,
            Backend::Dummy(dummy) => dummy.upsert(table, record).await,
        }
    }

    pub async fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<Subscription, DashboardError> {
        match self {
            Backend::Supabase(client) => client.subscribe(table, kinds).await,
            Backend::Dummy(dummy) => dummy.subscribe(table, kinds).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rows::signal_row::SignalRow;
    use serde_json::json;

    #[actix::test]
    async fn undecodable_rows_are_skipped_not_fatal() {
        let dummy = DummyBackend::new();
        dummy.insert(
            "signals",
            json!({"ts": "2025-10-14T08:00:00Z", "symbol": "BTCEUR", "side": "buy", "agent": "crypto"}),
        );
        dummy.insert(
            "signals",
            json!({"ts": "2025-10-14T09:00:00Z", "symbol": null, "side": "sell", "agent": "stocks"}),
        );
        let backend = Backend::Dummy(dummy);

        let rows = backend
            .select_rows::<SignalRow>(&Query::from_table("signals"))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "BTCEUR");
    }

    #[actix::test]
    async fn query_failures_still_surface() {
        let dummy = DummyBackend::new();
        dummy.fail_table("signals", "permission denied");
        let backend = Backend::Dummy(dummy);

        let err = backend
            .select_rows::<SignalRow>(&Query::from_table("signals"))
            .await
            .unwrap_err();

        assert_eq!(err, DashboardError::query("signals", "permission denied"));
    }
}
