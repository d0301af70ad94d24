use std::future::Future;

use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::debug;

/// Registro de tareas de fondo de un player.
///
/// Everything the player spawns outside its main loop (presence clears,
/// deferred notifications) goes through here, so teardown can positively
/// confirm nothing outlives the guild. Finished tasks drop out of the
/// tracker on their own; [`cancel_all`](Self::cancel_all) cancels the
/// rest and waits for them to wind down.
pub struct TaskRegistry {
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tracker: TaskTracker::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Lanza una tarea registrada; se descarta sola al terminar.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            debug!("registro de tareas ya cancelado, tarea descartada");
            return;
        }
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = future => {}
            }
        });
    }

    /// Cancela todo lo pendiente y espera a que termine.
    ///
    /// Idempotent; `spawn` after this point is a no-op.
    pub async fn cancel_all(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }

    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn finished_tasks_leave_the_registry() {
        let registry = TaskRegistry::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        registry.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });

        registry.cancel_all().await;
        assert!(ran.load(Ordering::SeqCst) || registry.is_empty());
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_aborts_pending_work() {
        let registry = TaskRegistry::new();
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        registry.spawn(async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            flag.store(true, Ordering::SeqCst);
        });

        // si la cancelación no llegara, esto colgaría una hora
        tokio::time::timeout(Duration::from_secs(10), registry.cancel_all())
            .await
            .expect("cancel_all no terminó");
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn spawn_after_cancel_is_dropped() {
        let registry = TaskRegistry::new();
        registry.cancel_all().await;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        registry.spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });

        tokio::task::yield_now().await;
        assert!(!ran.load(Ordering::SeqCst));
        assert!(registry.is_empty());
    }
}
