//! Reactive feeds.
//!
//! An [`Observable`] holds the latest value of something (the exercise
//! catalog, the workout history, a filtered projection, timer progress)
//! and pushes every new value to its subscribers over channels.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner<T> {
    value: T,
    subscribers: Vec<Sender<T>>,
}

/// Latest-value cell with push subscriptions
///
/// Cloning an `Observable` yields another handle to the same feed.
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panicking subscriber cannot leave the value half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current value
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Subscribe to the feed
    ///
    /// The receiver gets the current value immediately, then every value
    /// published afterwards.
    pub fn subscribe(&self) -> Receiver<T> {
        let (tx, rx) = channel();
        let mut inner = self.lock();
        // Cannot fail: rx is still alive here
        let _ = tx.send(inner.value.clone());
        inner.subscribers.push(tx);
        rx
    }

    /// Replace the value and notify subscribers
    ///
    /// Subscribers whose receiver was dropped are forgotten.
    pub fn publish(&self, value: T) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|tx| tx.send(value.clone()).is_ok());
        inner.value = value;
        tracing::trace!("Published to {} subscribers", inner.subscribers.len());
    }

    /// Number of live subscribers as of the last publish
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}
