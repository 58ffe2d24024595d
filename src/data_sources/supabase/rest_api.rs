use crate::{
    data_sources::supabase::supabase_config::SupabaseConfig,
    models::{dashboard_error::DashboardError, query::Query},
};
use reqwest::{header::CONTENT_RANGE, Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

/// PostgREST endpoint of the hosted backend.
#[derive(Debug, Clone)]
pub struct SupabaseRestApi {
    http: Client,
    config: SupabaseConfig,
}

impl SupabaseRestApi {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            http: Client::new(),
            config: config.clone(),
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.config.rest_url(table))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }

    pub async fn select(&self, query: &Query) -> Result<Vec<Value>, DashboardError> {
        debug!(table = %query.table, params = ?query.to_params(), "select");

        let res = self
            .request(Method::GET, &query.table)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| DashboardError::query(&query.table, e))?;

        let res = Self::check(res)
            .await
            .map_err(|message| DashboardError::query(&query.table, message))?;

        res.json::<Vec<Value>>()
            .await
            .map_err(|e| DashboardError::query(&query.table, e))
    }

    pub async fn count(&self, query: &Query) -> Result<u64, DashboardError> {
        let res = self
            .request(Method::HEAD, &query.table)
            .query(&query.to_params())
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| DashboardError::query(&query.table, e))?;

        let res = Self::check(res)
            .await
            .map_err(|message| DashboardError::query(&query.table, message))?;

        res.headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| DashboardError::query(&query.table, "telling ontbreekt in antwoord"))
    }

    pub async fn upsert(&self, table: &str, record: &Value) -> Result<(), DashboardError> {
        let res = self
            .request(Method::POST, table)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| DashboardError::Write(e.to_string()))?;

        Self::check(res).await.map_err(DashboardError::Write)?;

        Ok(())
    }

    /// Passes successful responses through; otherwise extracts PostgREST's
    /// error message.
    async fn check(res: Response) -> Result<Response, String> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {}", status));

        Err(message)
    }
}

/// Total from a `Content-Range` header such as `0-24/120` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}
