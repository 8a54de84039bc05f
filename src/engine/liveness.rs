use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Shared liveness flag for one engine.
///
/// Each activation starts a new epoch. Work dispatched off the render context remembers the epoch
/// it started under and is dropped when that epoch is no longer current.
#[derive(Clone, Debug, Default)]
pub struct LivenessToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    live: AtomicBool,
    epoch: AtomicU64,
}

impl LivenessToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn revive(&self) -> u64 {
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.live.store(true, Ordering::SeqCst);
        epoch
    }

    pub(crate) fn kill(&self) {
        self.inner.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Current epoch, or `None` while the engine is torn down.
    pub fn current(&self) -> Option<u64> {
        self.is_live()
            .then(|| self.inner.epoch.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.current() == Some(epoch)
    }
}
