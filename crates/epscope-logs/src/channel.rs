use std::sync::Arc;

use tokio::sync::Notify;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Create a worker-to-display channel.
///
/// Single producer, single consumer, unbounded, FIFO within the channel.
/// Every send posts a wake on `wake` so the display loop redraws; the queue
/// itself never wakes anyone.
pub fn channel<T>(wake: Arc<Notify>) -> (ChannelTx<T>, ChannelRx<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTx { tx, wake }, ChannelRx { rx })
}

/// Sending half, owned by the worker context. Sends never block.
pub struct ChannelTx<T> {
    tx: mpsc::UnboundedSender<T>,
    wake: Arc<Notify>,
}

impl<T> ChannelTx<T> {
    pub fn send(&self, item: T) {
        // A closed receiver means the display loop is gone; nothing to wake.
        if self.tx.send(item).is_ok() {
            self.wake.notify_one();
        }
    }
}

/// Receiving half, owned by the display context.
pub struct ChannelRx<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> ChannelRx<T> {
    /// Remove everything currently queued, without blocking, in send order.
    pub fn drain(&mut self) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(item) => items.push(item),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_yields_items_in_send_order() {
        let wake = Arc::new(Notify::new());
        let (tx, mut rx) = channel(wake);

        for i in 0..100 {
            tx.send(i);
        }

        assert_eq!(rx.drain(), (0..100).collect::<Vec<_>>());
        assert!(rx.drain().is_empty());
    }

    #[tokio::test]
    async fn each_send_posts_a_wake() {
        let wake = Arc::new(Notify::new());
        let (tx, mut rx) = channel(Arc::clone(&wake));

        tx.send("line");
        // the notification must already be pending, not depend on a waiter
        wake.notified().await;
        assert_eq!(rx.drain(), vec!["line"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stress_two_channels_lose_and_duplicate_nothing() {
        const N: usize = 10_000;

        let wake = Arc::new(Notify::new());
        let (raw_tx, mut raw_rx) = channel::<usize>(Arc::clone(&wake));
        let (diag_tx, mut diag_rx) = channel::<usize>(Arc::clone(&wake));

        let raw_worker = tokio::task::spawn_blocking(move || {
            for i in 0..N {
                raw_tx.send(i);
            }
        });
        let diag_worker = tokio::task::spawn_blocking(move || {
            for i in 0..N {
                diag_tx.send(i);
            }
        });
        raw_worker.await.expect("raw worker");
        diag_worker.await.expect("diag worker");

        let mut raw = Vec::new();
        let mut diag = Vec::new();
        while raw.len() < N || diag.len() < N {
            raw.extend(raw_rx.drain());
            diag.extend(diag_rx.drain());
        }

        assert_eq!(raw, (0..N).collect::<Vec<_>>());
        assert_eq!(diag, (0..N).collect::<Vec<_>>());
    }
}
