//! Cooperative cancellation shared by every pipeline stage.

use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct Inner {
    cancelled: AtomicBool,
    /// Never sends. Dropped on cancel so every `recv` on the paired receiver returns at once.
    trigger: Mutex<Option<Sender<()>>>,
}

/// Cloneable cancellation signal. Cancelling is idempotent and wakes every stage blocked in
/// [`recv_or_cancel`] / [`send_or_cancel`].
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
    signal: Receiver<()>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(tx)),
            }),
            signal: rx,
        }
    }

    pub fn cancel(&self) {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        match self.inner.trigger.lock() {
            Ok(mut trigger) => drop(trigger.take()),
            Err(poisoned) => drop(poisoned.into_inner().take()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Becomes ready (disconnected) once cancelled. Use as an arm in `select!`.
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Receive the next item, or `None` when the channel is closed or the token is cancelled.
pub fn recv_or_cancel<T>(rx: &Receiver<T>, cancel: &CancelToken) -> Option<T> {
    if cancel.is_cancelled() {
        return None;
    }
    select! {
        recv(rx) -> msg => msg.ok(),
        recv(cancel.signal()) -> _ => None,
    }
}

/// Send `item`, blocking while the channel is full. Returns false when the receiver is gone or
/// the token is cancelled.
pub fn send_or_cancel<T>(tx: &Sender<T>, item: T, cancel: &CancelToken) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    select! {
        send(tx, item) -> res => res.is_ok(),
        recv(cancel.signal()) -> _ => false,
    }
}
