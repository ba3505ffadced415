//! Handles for triggering saves and controlling the background worker.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::PageSaverError;
use crate::page::PageSource;
use crate::worker::Trigger;

/// Structured result of one save operation, reported back to the trigger
/// boundary. No panic or error ever escapes past this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The document was persisted; `id` is the dispatcher's opaque handle.
    Saved { id: String },
    /// The save did not complete; `error` describes why.
    Failed { error: String },
}

impl SaveOutcome {
    /// Returns `true` for [`SaveOutcome::Saved`].
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// Primary handle returned by [`PageSaverBuilder::build`](crate::PageSaverBuilder::build).
///
/// Owns the shutdown signal and the worker task join handle. Use
/// [`trigger`](Self::trigger) to request a save and [`shutdown`](Self::shutdown)
/// to stop the worker after draining queued triggers.
///
/// For triggering from multiple tasks, obtain a lightweight
/// [`PageSaverSender`] via [`sender`](Self::sender).
pub struct PageSaverHandle {
    sender: mpsc::Sender<Trigger>,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PageSaverHandle {
    pub(crate) fn new(
        sender: mpsc::Sender<Trigger>,
        shutdown: oneshot::Sender<()>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            sender,
            shutdown: Some(shutdown),
            worker: Some(worker),
        }
    }

    /// Request a save of the given page and wait for its outcome.
    ///
    /// Each trigger starts an independent save operation; a second trigger
    /// is unrelated to the first. A stopped worker yields a
    /// [`SaveOutcome::Failed`] rather than an error or panic.
    pub async fn trigger(&self, page: PageSource) -> SaveOutcome {
        trigger_on(&self.sender, page).await
    }

    /// Create a lightweight, cloneable [`PageSaverSender`] that shares the
    /// same underlying channel.
    pub fn sender(&self) -> PageSaverSender {
        PageSaverSender {
            sender: self.sender.clone(),
        }
    }

    /// Gracefully shut down the background worker.
    ///
    /// Sends the shutdown signal, waits for the worker to drain queued
    /// triggers and finish in-flight saves, then returns.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }
}

/// Lightweight, cloneable sender for triggering saves from multiple tasks.
///
/// Obtained via [`PageSaverHandle::sender`]. Does **not** own the shutdown
/// signal or the worker join handle -- dropping all senders will not stop
/// the worker.
pub struct PageSaverSender {
    sender: mpsc::Sender<Trigger>,
}

impl Clone for PageSaverSender {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl PageSaverSender {
    /// Request a save of the given page and wait for its outcome.
    pub async fn trigger(&self, page: PageSource) -> SaveOutcome {
        trigger_on(&self.sender, page).await
    }
}

async fn trigger_on(sender: &mpsc::Sender<Trigger>, page: PageSource) -> SaveOutcome {
    let (reply_tx, reply_rx) = oneshot::channel();
    let trigger = Trigger {
        page,
        reply: reply_tx,
    };

    if sender.send(trigger).await.is_err() {
        return SaveOutcome::Failed {
            error: PageSaverError::ChannelClosed.to_string(),
        };
    }

    reply_rx.await.unwrap_or_else(|_| SaveOutcome::Failed {
        error: PageSaverError::ChannelClosed.to_string(),
    })
}
