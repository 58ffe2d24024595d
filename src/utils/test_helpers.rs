use std::{future::Future, time::Duration};
use tokio::time::sleep;

/// Polls `check` until it yields `Some` or roughly two seconds have passed.
pub async fn wait_for<T, F, Fut>(mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    for _ in 0..200 {
        if let Some(value) = check().await {
            return Some(value);
        }
        sleep(Duration::from_millis(10)).await;
    }

    None
}

/// Gives spawned tasks and actor mailboxes a chance to drain.
pub async fn settle() {
    sleep(Duration::from_millis(50)).await;
}
