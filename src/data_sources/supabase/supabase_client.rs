use crate::{
    data_sources::{
        subscription::Subscription,
        supabase::{rest_api::SupabaseRestApi, supabase_config::SupabaseConfig, ws::realtime_ws_api::RealtimeWebsocketApi},
    },
    models::{change_kind::ChangeKind, dashboard_error::DashboardError},
};

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    pub config: SupabaseConfig,
    pub rest: SupabaseRestApi,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Self {
        let rest = SupabaseRestApi::new(&config);
        Self { config, rest }
    }

    /// Opens a dedicated realtime channel for `table`.
    pub async fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<Subscription, DashboardError> {
        RealtimeWebsocketApi::new(&self.config, table, kinds)
            .connect()
            .await
    }
}
