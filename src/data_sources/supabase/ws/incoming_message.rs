use crate::models::{change_kind::ChangeKind, row_event::RowEvent};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub event: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
struct PostgresChange {
    data: PostgresChangeData,
}

#[derive(Debug, Deserialize)]
struct PostgresChangeData {
    #[serde(rename = "type")]
    kind: ChangeKind,
    table: String,
    #[serde(default)]
    record: Value,
    #[serde(default)]
    old_record: Value,
}

impl IncomingMessage {
    /// Row change carried by a `postgres_changes` frame. Deletes report the
    /// old record since there is no new one.
    pub fn row_event(&self) -> Option<RowEvent> {
        if self.event != "postgres_changes" {
            return None;
        }

        let change: PostgresChange = serde_json::from_value(self.payload.clone()).ok()?;
        let data = change.data;
        let record = match data.kind {
            ChangeKind::Delete => data.old_record,
            _ => data.record,
        };

        Some(RowEvent::new(data.kind, &data.table, record))
    }

    /// Error text of a rejected join or request.
    pub fn reply_error(&self) -> Option<String> {
        if self.event == "phx_error" {
            return Some("kanaal gaf een fout".to_string());
        }

        if self.event != "phx_reply" || self.payload["status"] != "error" {
            return None;
        }

        let reason = self.payload["response"]["reason"]
            .as_str()
            .unwrap_or("verbinding geweigerd");

        Some(reason.to_string())
    }

    pub fn is_close(&self) -> bool {
        self.event == "phx_close"
    }
}
