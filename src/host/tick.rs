use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;

use crate::engine::timer::{TickDriver, TimerToken};
use crate::foundation::error::{FaceError, FaceResult};
use crate::host::channel::{FaceEvent, FaceHandle};

/// Delivers ticks as [`FaceEvent::Tick`] from a short-lived sleeper thread per armed token.
///
/// A disarmed token's thread still wakes up but posts nothing.
#[derive(Debug)]
pub struct ThreadTickDriver {
    handle: FaceHandle,
    cancels: HashMap<TimerToken, Arc<AtomicBool>>,
}

impl ThreadTickDriver {
    pub fn new(handle: FaceHandle) -> Self {
        Self {
            handle,
            cancels: HashMap::new(),
        }
    }

    /// Armed tokens whose sleeper has not finished yet.
    pub fn in_flight(&self) -> usize {
        self.cancels
            .values()
            .filter(|flag| Arc::strong_count(flag) > 1)
            .count()
    }

    fn prune(&mut self) {
        // The sleeper drops its clone when it exits.
        self.cancels.retain(|_, flag| Arc::strong_count(flag) > 1);
    }
}

impl TickDriver for ThreadTickDriver {
    fn arm(&mut self, token: TimerToken, delay: Duration) -> FaceResult<()> {
        self.prune();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = self.handle.clone();
        std::thread::Builder::new()
            .name("sunshine-tick".to_string())
            .spawn(move || {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                if flag.load(Ordering::SeqCst) {
                    return;
                }
                if handle.post(FaceEvent::Tick(token)).is_err() {
                    tracing::trace!(token = token.id(), "face queue closed; tick dropped");
                }
            })
            .context("spawn tick thread")
            .map_err(|err| FaceError::timer_scheduling(format!("{err:#}")))?;
        self.cancels.insert(token, cancelled);
        Ok(())
    }

    fn disarm(&mut self, token: TimerToken) {
        if let Some(flag) = self.cancels.remove(&token) {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for ThreadTickDriver {
    fn drop(&mut self) {
        for flag in self.cancels.values() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/tick.rs"]
mod tests;
