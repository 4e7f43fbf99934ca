//! Dispatch queue shared by the resolution workers.
//!
//! A bounded tokio channel whose receiving half is shared behind an async
//! mutex, so any number of workers can pop from it. The queue is sized to the
//! whole batch, which means pushes never wait. Closing the queue drops the
//! sender; workers drain what is left and then see `None`.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::core::V2bError;

/// Producer side of the queue.
pub struct DispatchQueue<T> {
    sender: mpsc::Sender<T>,
    receiver: QueueReceiver<T>,
    capacity: usize,
}

/// Consumer handle, cloned into every worker.
pub struct QueueReceiver<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> DispatchQueue<T> {
    /// Creates a queue holding up to `capacity` items (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender,
            receiver: QueueReceiver {
                inner: Arc::new(Mutex::new(receiver)),
            },
            capacity,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a consumer handle.
    pub fn receiver(&self) -> QueueReceiver<T> {
        self.receiver.clone()
    }

    /// Pushes one item without waiting.
    ///
    /// # Errors
    ///
    /// Fails when the queue is full, which means more items were pushed than
    /// the queue was sized for.
    pub fn push(&self, item: T) -> Result<()> {
        self.sender.try_send(item).map_err(|e| {
            let message = match e {
                mpsc::error::TrySendError::Full(_) => {
                    format!("Dispatch queue is full (capacity {})", self.capacity)
                }
                mpsc::error::TrySendError::Closed(_) => "Dispatch queue has no consumers".to_string(),
            };
            V2bError::Other {
                message,
            }
            .into()
        })
    }

    /// Closes the queue. Items already pushed stay available to consumers.
    pub fn close(self) {
        drop(self.sender);
    }
}

impl<T> QueueReceiver<T> {
    /// Pops the next item, waiting while the queue is empty but still open.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub async fn pop(&self) -> Option<T> {
        let mut receiver = self.inner.lock().await;
        receiver.recv().await
    }
}
