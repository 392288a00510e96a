use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Applies only the most recent pushed value, once no newer value has
/// arrived for the quiet window. Earlier values in a burst are dropped.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the debounce task on the current tokio runtime.
    pub fn spawn<F>(quiet: Duration, mut apply: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                let mut deadline = Instant::now() + quiet;
                loop {
                    tokio::select! {
                        biased;
                        next = rx.recv() => match next {
                            Some(value) => {
                                latest = value;
                                deadline = Instant::now() + quiet;
                            }
                            None => break,
                        },
                        _ = sleep_until(deadline) => break,
                    }
                }
                apply(latest);
            }
        });

        Self { tx }
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::warn!("debounce task has stopped; input dropped");
        }
    }
}
