use crate::{
    data_sources::subscription::Subscription,
    models::{
        change_kind::ChangeKind,
        dashboard_error::DashboardError,
        query::{compare_values, Filter, Projection, Query},
        row_event::RowEvent,
    },
};
use serde_json::{Map, Value};
use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc, Mutex, MutexGuard,
    },
};
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc::channel,
};
use tracing::debug;

/// In-memory stand-in for the hosted backend. Rows are raw JSON objects kept
/// in insertion order; every write is broadcast to open subscriptions the way
/// the realtime service would push it.
#[derive(Debug, Clone)]
pub struct DummyBackend {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    events: broadcast::Sender<RowEvent>,
    writes: Arc<AtomicUsize>,
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);

        Self {
            tables: Arc::new(Mutex::new(HashMap::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            events,
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn failure(&self, table: &str) -> Option<String> {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(table)
            .cloned()
    }

    pub async fn select(&self, query: &Query) -> Result<Vec<Value>, DashboardError> {
        tokio::task::yield_now().await;

        if let Some(message) = self.failure(&query.table) {
            return Err(DashboardError::query(&query.table, message));
        }

        let mut rows: Vec<Value> = self
            .tables()
            .get(&query.table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(&a[&order.column], &b[&order.column]).unwrap_or(Ordering::Equal);
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let projection = query.projection();
        Ok(rows.into_iter().map(|row| project(row, &projection)).collect())
    }

    pub async fn count(&self, query: &Query) -> Result<u64, DashboardError> {
        tokio::task::yield_now().await;

        if let Some(message) = self.failure(&query.table) {
            return Err(DashboardError::query(&query.table, message));
        }

        let count = self
            .tables()
            .get(&query.table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).count())
            .unwrap_or(0);

        Ok(count as u64)
    }

    /// Inserts `record`, or merges it into the row with the same `id`.
    pub async fn upsert(&self, table: &str, record: &Value) -> Result<(), DashboardError> {
        tokio::task::yield_now().await;

        if let Some(message) = self.failure(table) {
            return Err(DashboardError::Write(message));
        }
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);

        let id = record.get("id").cloned();
        let existing = id.as_ref().map(|id| Filter::eq("id", id.clone()));

        let event = {
            let mut tables = self.tables();
            let rows = tables.entry(table.to_string()).or_default();

            match existing.and_then(|filter| rows.iter_mut().find(|row| filter.matches(row))) {
                Some(row) => {
                    merge(row, record);
                    RowEvent::new(ChangeKind::Update, table, row.clone())
                }
                None => {
                    rows.push(record.clone());
                    RowEvent::new(ChangeKind::Insert, table, record.clone())
                }
            }
        };

        self.publish(event);
        Ok(())
    }

    pub async fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<Subscription, DashboardError> {
        tokio::task::yield_now().await;

        if let Some(message) = self.failure(table) {
            return Err(DashboardError::subscription(table, message));
        }

        let mut events = self.events.subscribe();
        let (tx, rx) = channel(64);
        let wanted_table = table.to_string();
        let kinds = kinds.to_vec();

        let task = tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    event = events.recv() => event,
                    _ = tx.closed() => break,
                };

                match event {
                    Ok(event) => {
                        if event.table != wanted_table || !kinds.contains(&event.kind) {
                            continue;
                        }
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(table = %wanted_table, skipped, "dummy subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(table, rx, task))
    }

    /// Appends a row as an external writer would, notifying subscribers.
    pub fn insert(&self, table: &str, record: Value) {
        self.tables()
            .entry(table.to_string())
            .or_default()
            .push(record.clone());

        self.publish(RowEvent::new(ChangeKind::Insert, table, record));
    }

    /// Patches every matching row as an external writer would.
    #[cfg(test)]
    pub fn update(&self, table: &str, filter: &Filter, patch: &Value) {
        let changed: Vec<Value> = {
            let mut tables = self.tables();
            let Some(rows) = tables.get_mut(table) else {
                return;
            };

            rows.iter_mut()
                .filter(|row| filter.matches(row))
                .map(|row| {
                    merge(row, patch);
                    row.clone()
                })
                .collect()
        };

        for row in changed {
            self.publish(RowEvent::new(ChangeKind::Update, table, row));
        }
    }

    /// Makes every later call touching `table` fail with `message`.
    #[cfg(test)]
    pub fn fail_table(&self, table: &str, message: &str) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(table.to_string(), message.to_string());
    }

    /// Number of writes issued through the backend interface.
    #[cfg(test)]
    pub fn writes(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    #[cfg(test)]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables().get(table).cloned().unwrap_or_default()
    }

    fn publish(&self, event: RowEvent) {
        // No receivers is fine, nobody is watching.
        let _ = self.events.send(event);
    }
}

fn merge(row: &mut Value, patch: &Value) {
    if let (Value::Object(row), Value::Object(patch)) = (row, patch) {
        for (key, value) in patch {
            row.insert(key.clone(), value.clone());
        }
    }
}

fn project(row: Value, projection: &[Projection]) -> Value {
    if projection.iter().any(|p| p.name == "*") {
        return row;
    }

    let mut out = Map::new();
    for item in projection {
        let value = row.get(&item.name).cloned().unwrap_or(Value::Null);

        let value = match &item.nested {
            Some(columns) => project_relation(value, columns),
            None => value,
        };

        out.insert(item.name.clone(), value);
    }

    Value::Object(out)
}

fn project_relation(value: Value, columns: &[String]) -> Value {
    let nested: Vec<Projection> = columns
        .iter()
        .map(|name| Projection {
            name: name.clone(),
            nested: None,
        })
        .collect();

    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(|item| project(item, &nested)).collect()),
        Value::Object(_) => project(value, &nested),
        other => other,
    }
}
