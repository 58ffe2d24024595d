use crate::models::change_kind::ChangeKind;
use serde::Serialize;
use serde_json::{json, Value};

/// Phoenix channel frame sent to the realtime endpoint.
#[derive(Debug, Serialize)]
pub struct OutgoingMessage {
    pub topic: String,
    pub event: String,
    pub payload: Value,
    #[serde(rename = "ref")]
    pub msg_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl OutgoingMessage {
    /// Joins `topic` listening for `kinds` on `public.{table}`.
    pub fn join(topic: &str, table: &str, kinds: &[ChangeKind], access_token: &str) -> Self {
        let changes: Vec<Value> = kinds
            .iter()
            .map(|kind| {
                json!({
                    "event": kind.as_str(),
                    "schema": "public",
                    "table": table,
                })
            })
            .collect();

        Self {
            topic: topic.to_string(),
            event: "phx_join".to_string(),
            payload: json!({
                "config": {
                    "broadcast": { "ack": false, "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": changes,
                    "private": false,
                },
                "access_token": access_token,
            }),
            msg_ref: "1".to_string(),
            join_ref: Some("1".to_string()),
        }
    }

    pub fn heartbeat(msg_ref: u64) -> Self {
        Self {
            topic: "phoenix".to_string(),
            event: "heartbeat".to_string(),
            payload: json!({}),
            msg_ref: msg_ref.to_string(),
            join_ref: None,
        }
    }

    pub fn leave(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            event: "phx_leave".to_string(),
            payload: json!({}),
            msg_ref: "0".to_string(),
            join_ref: None,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_lists_one_change_filter_per_kind() {
        let join = OutgoingMessage::join(
            "realtime:signals-x",
            "signals",
            &[ChangeKind::Insert, ChangeKind::Update],
            "anon",
        );
        let value: Value = serde_json::from_str(&join.to_json()).unwrap();

        assert_eq!(value["event"], "phx_join");
        assert_eq!(value["ref"], "1");
        assert_eq!(value["join_ref"], "1");
        assert_eq!(value["payload"]["access_token"], "anon");

        let changes = value["payload"]["config"]["postgres_changes"].as_array().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1]["event"], "UPDATE");
        assert_eq!(changes[1]["table"], "signals");
    }

    #[test]
    fn heartbeat_targets_phoenix_topic() {
        let value: Value = serde_json::from_str(&OutgoingMessage::heartbeat(7).to_json()).unwrap();

        assert_eq!(value["topic"], "phoenix");
        assert_eq!(value["ref"], "7");
        assert!(value.get("join_ref").is_none());
    }
}
