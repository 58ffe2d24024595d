use crate::models::change_kind::ChangeKind;
use serde_json::Value;

/// A single change notification pushed by the backend for one table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowEvent {
    pub kind: ChangeKind,
    pub table: String,
    pub record: Value,
}

impl RowEvent {
    pub fn new(kind: ChangeKind, table: &str, record: Value) -> Self {
        Self {
            kind,
            table: table.to_string(),
            record,
        }
    }
}
