use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

use crate::audio::item::MediaItem;

/// Cola FIFO de items pendientes de un guild.
///
/// One producer side (command layer enqueues), one consumer side (the
/// player loop dequeues). Unbounded; duplicates are fine. Insertion
/// order is the playback order.
pub struct PlaybackQueue {
    items: Mutex<VecDeque<MediaItem>>,
    ready: Notify,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
        }
    }

    /// Agrega un item al final de la cola. Nunca bloquea.
    pub fn enqueue(&self, item: MediaItem) {
        let pending = {
            let mut items = self.items.lock();
            items.push_back(item);
            items.len()
        };
        debug!("➕ item en cola ({} pendientes)", pending);
        self.ready.notify_one();
    }

    /// Saca el primer item; suspende hasta que haya uno.
    ///
    /// Cancel-safe: the player races this against its idle timer, and a
    /// cancelled wait never loses an item or a wakeup.
    pub async fn dequeue(&self) -> MediaItem {
        let notified = self.ready.notified();
        tokio::pin!(notified);
        loop {
            notified.as_mut().enable();
            if let Some(item) = self.items.lock().pop_front() {
                return item;
            }
            notified.as_mut().await;
            notified.set(self.ready.notified());
        }
    }

    /// Copia ordenada del contenido actual, sin consumir nada.
    ///
    /// The order returned is exactly the order subsequent dequeues will
    /// produce. An in-flight item is not part of the queue and does not
    /// appear here.
    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.items.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::item::SourceHandle;
    use pretty_assertions::assert_eq;
    use serenity::model::id::UserId;
    use std::{sync::Arc, time::Duration};

    fn item(title: &str) -> MediaItem {
        MediaItem::new(
            title,
            format!("https://example.com/{title}"),
            UserId::new(1),
            SourceHandle::new(()),
        )
    }

    #[tokio::test]
    async fn dequeue_follows_enqueue_order() {
        let queue = PlaybackQueue::new();
        queue.enqueue(item("a"));
        queue.enqueue(item("b"));
        queue.enqueue(item("c"));

        assert_eq!(queue.dequeue().await.title, "a");
        assert_eq!(queue.dequeue().await.title, "b");
        assert_eq!(queue.dequeue().await.title, "c");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn snapshot_is_non_destructive() {
        let queue = PlaybackQueue::new();
        queue.enqueue(item("a"));
        queue.enqueue(item("b"));

        let titles: Vec<_> = queue.snapshot().iter().map(|i| i.title.clone()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(queue.len(), 2);

        // el siguiente dequeue sigue devolviendo la cabeza
        assert_eq!(queue.dequeue().await.title, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn dequeue_waits_for_a_late_enqueue() {
        let queue = Arc::new(PlaybackQueue::new());
        let producer = queue.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            producer.enqueue(item("tardío"));
        });

        let got = tokio::time::timeout(Duration::from_secs(5), queue.dequeue())
            .await
            .expect("dequeue no despertó");
        assert_eq!(got.title, "tardío");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_dequeue_does_not_lose_items() {
        let queue = PlaybackQueue::new();

        let waited = tokio::time::timeout(Duration::from_millis(10), queue.dequeue()).await;
        assert!(waited.is_err());

        queue.enqueue(item("después"));
        assert_eq!(queue.dequeue().await.title, "después");
    }
}
