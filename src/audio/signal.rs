use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::TransportError;

/// Puente de un solo slot entre el callback de fin de reproducción y el
/// loop del player.
///
/// The transport's completion callback may run on any thread; the player
/// loop suspends on [`wait`](Self::wait) inside its own task. The slot
/// holds at most one pending completion per play: duplicate `signal`
/// calls before the next `wait` are ignored, and `wait` clears the slot
/// atomically with the wake-up so a stale duplicate cannot be taken for
/// the next item's completion.
pub struct CompletionSignal {
    slot: Mutex<Slot>,
    notify: Notify,
}

#[derive(Default)]
struct Slot {
    fired: bool,
    error: Option<TransportError>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::default()),
            notify: Notify::new(),
        }
    }

    /// Marca la reproducción en curso como terminada.
    ///
    /// Thread-safe and idempotent: only the first outcome per play is kept.
    pub fn signal(&self, error: Option<TransportError>) {
        {
            let mut slot = self.slot.lock();
            if slot.fired {
                return;
            }
            slot.fired = true;
            slot.error = error;
        }
        self.notify.notify_waiters();
    }

    /// Suspende hasta que llegue la señal y consume el slot.
    pub async fn wait(&self) -> Option<TransportError> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // registrar antes de mirar el slot, para no perder el aviso
            notified.as_mut().enable();
            {
                let mut slot = self.slot.lock();
                if slot.fired {
                    slot.fired = false;
                    return slot.error.take();
                }
            }
            notified.await;
        }
    }

    /// Descarta una señal pendiente de una reproducción anterior.
    ///
    /// The player calls this before starting each play, mirroring the
    /// clear-before-play discipline the loop relies on.
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        slot.fired = false;
        slot.error = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().fired
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}
