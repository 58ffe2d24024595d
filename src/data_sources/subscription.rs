use crate::models::row_event::RowEvent;
use futures_util::Stream;
use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::{sync::mpsc::Receiver, task::JoinHandle};
use tracing::debug;

/// An open change feed on one table. Events are pushed by a background task;
/// dropping the subscription aborts that task and with it the channel.
pub struct Subscription {
    table: String,
    rx: Receiver<RowEvent>,
    task: JoinHandle<()>,
}

impl Subscription {
    pub fn new(table: &str, rx: Receiver<RowEvent>, task: JoinHandle<()>) -> Self {
        Self {
            table: table.to_string(),
            rx,
            task,
        }
    }

    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<RowEvent> {
        self.rx.recv().await
    }
}

impl Stream for Subscription {
    type Item = RowEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
        debug!(table = %self.table, "subscription released");
    }
}
