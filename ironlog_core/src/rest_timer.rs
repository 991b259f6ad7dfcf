//! Rest interval countdown.
//!
//! Runs on its own thread and publishes progress on an [`Observable`].
//! Dropping the handle cancels the countdown; starting a new rest means
//! starting a new timer.

use crate::observe::Observable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Where a countdown is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestState {
    Running,
    Finished,
    Cancelled,
}

/// One progress update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestProgress {
    pub remaining: Duration,
    pub total: Duration,
    pub state: RestState,
}

impl RestProgress {
    /// Elapsed share of the interval, 0.0 to 1.0
    pub fn fraction_elapsed(&self) -> f64 {
        if self.total.is_zero() {
            return 1.0;
        }
        1.0 - self.remaining.as_secs_f64() / self.total.as_secs_f64()
    }
}

/// Handle to a running countdown
pub struct RestTimer {
    progress: Observable<RestProgress>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RestTimer {
    /// Start counting down `total`, publishing every `tick`
    pub fn start(total: Duration, tick: Duration) -> Self {
        let progress = Observable::new(RestProgress {
            remaining: total,
            total,
            state: RestState::Running,
        });
        let cancelled = Arc::new(AtomicBool::new(false));

        let feed = progress.clone();
        let flag = Arc::clone(&cancelled);
        let tick = tick.max(Duration::from_millis(1));
        let handle = thread::spawn(move || run(total, tick, &feed, &flag));

        tracing::debug!("Rest timer started for {:?}", total);
        Self {
            progress,
            cancelled,
            handle: Some(handle),
        }
    }

    /// Latest progress value
    pub fn progress(&self) -> RestProgress {
        self.progress.get()
    }

    pub fn subscribe(&self) -> Receiver<RestProgress> {
        self.progress.subscribe()
    }

    /// Stop the countdown; a no-op once it has finished
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Block until the countdown finishes or is cancelled
    pub fn wait(mut self) -> RestProgress {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Rest timer thread panicked");
            }
        }
        self.progress.get()
    }
}

impl Drop for RestTimer {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.cancel();
        }
    }
}

fn run(total: Duration, tick: Duration, feed: &Observable<RestProgress>, cancelled: &AtomicBool) {
    let deadline = Instant::now() + total;

    loop {
        if cancelled.load(Ordering::SeqCst) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            feed.publish(RestProgress {
                remaining,
                total,
                state: RestState::Cancelled,
            });
            tracing::debug!("Rest timer cancelled with {:?} left", remaining);
            return;
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            feed.publish(RestProgress {
                remaining,
                total,
                state: RestState::Finished,
            });
            tracing::debug!("Rest timer finished");
            return;
        }

        feed.publish(RestProgress {
            remaining,
            total,
            state: RestState::Running,
        });
        thread::sleep(tick.min(remaining));
    }
}
