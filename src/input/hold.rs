// SPDX-License-Identifier: GPL-3.0-only

//! Debounced key-holding timer.
//!
//! When a key is pressed, a timer is scheduled; if it survives the delay
//! without being superseded by a newer press, a [`HoldFired`] message is
//! delivered back to the update thread. Suppression works through a
//! monotonically increasing generation counter: every `schedule` (and
//! `cancel`) bumps it, and a timer only fires while its own generation is
//! still current. The compare-and-send happens under the counter's lock,
//! so at most one firing can exist per press and a superseded timer can
//! never sneak a message in.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::channel::mpsc;

use crate::board::KeyRef;

/// A hold timer that survived its delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldFired {
    /// The key that was being held.
    pub key: KeyRef,
    /// Generation the timer was scheduled under.
    pub generation: u64,
}

/// Schedules debounced holding callbacks for key presses.
///
/// Timers run on the ambient tokio runtime; firings are consumed on the
/// update thread via [`drain`](Self::drain). Without a runtime, presses
/// simply never produce a holding action.
pub struct HoldScheduler {
    generation: Arc<Mutex<u64>>,
    tx: mpsc::UnboundedSender<HoldFired>,
    rx: mpsc::UnboundedReceiver<HoldFired>,
    warned_no_runtime: bool,
}

impl Default for HoldScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl HoldScheduler {
    /// Creates a scheduler with no pending timer.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded();
        Self {
            generation: Arc::new(Mutex::new(0)),
            tx,
            rx,
            warned_no_runtime: false,
        }
    }

    /// Schedules a holding timer for `key`, superseding any pending one.
    ///
    /// Returns the generation of the new timer.
    pub fn schedule(&mut self, key: KeyRef, delay: Duration) -> u64 {
        let generation = {
            let mut current = self.generation.lock().expect("hold generation lock");
            *current += 1;
            *current
        };

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            if !self.warned_no_runtime {
                tracing::debug!("no tokio runtime; key holding detection is disabled");
                self.warned_no_runtime = true;
            }
            return generation;
        };

        let counter = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let current = counter.lock().expect("hold generation lock");
            if *current == generation {
                let _ = tx.unbounded_send(HoldFired { key, generation });
            }
        });

        generation
    }

    /// Supersedes any pending timer without scheduling a new one.
    pub fn cancel(&mut self) {
        *self.generation.lock().expect("hold generation lock") += 1;
    }

    /// Whether `generation` is still the current one.
    ///
    /// Consumers re-check this when draining: a firing may have been sent
    /// just before a newer press bumped the counter.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        *self.generation.lock().expect("hold generation lock") == generation
    }

    /// Drains all firings delivered since the last call.
    pub fn drain(&mut self) -> Vec<HoldFired> {
        let mut fired = Vec::new();
        while let Ok(Some(message)) = self.rx.try_next() {
            fired.push(message);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: KeyRef = KeyRef::Matrix { row: 0, col: 0 };
    const OTHER: KeyRef = KeyRef::Matrix { row: 0, col: 1 };

    #[tokio::test]
    async fn test_timer_fires_after_delay() {
        let mut scheduler = HoldScheduler::new();
        let generation = scheduler.schedule(KEY, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(40)).await;
        let fired = scheduler.drain();

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].key, KEY);
        assert_eq!(fired[0].generation, generation);
        assert!(scheduler.is_current(generation));
    }

    #[tokio::test]
    async fn test_superseded_timer_never_fires() {
        let mut scheduler = HoldScheduler::new();
        scheduler.schedule(KEY, Duration::from_millis(10));
        // A newer press supersedes the first timer before it elapses.
        let generation = scheduler.schedule(OTHER, Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(40)).await;
        let fired = scheduler.drain();

        assert_eq!(fired.len(), 1, "only the newest press fires");
        assert_eq!(fired[0].key, OTHER);
        assert_eq!(fired[0].generation, generation);
    }

    #[tokio::test]
    async fn test_cancel_suppresses_pending_timer() {
        let mut scheduler = HoldScheduler::new();
        let generation = scheduler.schedule(KEY, Duration::from_millis(10));
        scheduler.cancel();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(scheduler.drain().is_empty());
        assert!(!scheduler.is_current(generation));
    }

    /// Without a runtime the scheduler degrades instead of panicking.
    #[test]
    fn test_no_runtime_degrades_gracefully() {
        let mut scheduler = HoldScheduler::new();
        scheduler.schedule(KEY, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(scheduler.drain().is_empty());
    }
}
