use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::foundation::error::FaceResult;

/// Wall-clock source.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Offset of the device's current time zone.
    fn local_offset(&self) -> FixedOffset;

    fn now_millis(&self) -> i64 {
        self.now_utc().timestamp_millis()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_offset(&self) -> FixedOffset {
        *chrono::Local::now().offset()
    }
}

/// Settable clock shared between a test (or simulator) and the engine.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
    offset_secs: Arc<AtomicI32>,
}

impl ManualClock {
    pub fn new(millis: i64) -> Self {
        let clock = Self::default();
        clock.set_millis(millis);
        clock
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let ms = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set_offset_secs(&self, secs: i32) {
        self.offset_secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }

    fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.offset_secs.load(Ordering::SeqCst)).unwrap_or_else(|| Utc.fix())
    }
}

/// Identifies one scheduled tick. Tokens are never reused within a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub(crate) u64);

impl TimerToken {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Delivery mechanism for scheduled ticks.
///
/// A driver delivers `token` back to the engine (as a tick) after `delay`, unless it is disarmed
/// first.
pub trait TickDriver {
    fn arm(&mut self, token: TimerToken, delay: Duration) -> FaceResult<()>;
    fn disarm(&mut self, token: TimerToken);
}

/// Driver for hosts that run their own loop: armed ticks are recorded and handed out on request.
#[derive(Debug, Default)]
pub struct ManualTickDriver {
    armed: Vec<(TimerToken, Duration)>,
    arms: u64,
}

impl ManualTickDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks armed and not yet taken or disarmed.
    pub fn armed(&self) -> &[(TimerToken, Duration)] {
        &self.armed
    }

    /// Total number of `arm` calls.
    pub fn arm_count(&self) -> u64 {
        self.arms
    }

    /// Remove and return the armed tick with the shortest delay.
    pub fn take_next(&mut self) -> Option<(TimerToken, Duration)> {
        let idx = self
            .armed
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, delay))| *delay)
            .map(|(i, _)| i)?;
        Some(self.armed.remove(idx))
    }
}

impl TickDriver for ManualTickDriver {
    fn arm(&mut self, token: TimerToken, delay: Duration) -> FaceResult<()> {
        self.arms += 1;
        self.armed.push((token, delay));
        Ok(())
    }

    fn disarm(&mut self, token: TimerToken) {
        self.armed.retain(|(t, _)| *t != token);
    }
}

/// Delay until the next wall-clock multiple of `interval_ms`.
///
/// Exactly on a boundary the delay is a full interval.
pub fn second_aligned_delay_ms(now_ms: i64, interval_ms: u64) -> u64 {
    let interval = i64::try_from(interval_ms.max(1)).unwrap_or(i64::MAX);
    (interval - now_ms.rem_euclid(interval)) as u64
}

/// Owns the single outstanding redraw tick of one engine.
pub struct RenderTimerScheduler<D> {
    driver: D,
    clock: Arc<dyn Clock>,
    interval_ms: u64,
    last_token: u64,
    pending: Option<TimerToken>,
}

impl<D: TickDriver> RenderTimerScheduler<D> {
    pub fn new(driver: D, clock: Arc<dyn Clock>, interval_ms: u64) -> Self {
        Self {
            driver,
            clock,
            interval_ms: interval_ms.max(1),
            last_token: 0,
            pending: None,
        }
    }

    /// Schedule the next tick on the next interval boundary, replacing any outstanding tick.
    pub fn schedule_second_aligned(&mut self) -> FaceResult<TimerToken> {
        let delay = second_aligned_delay_ms(self.clock.now_millis(), self.interval_ms);
        self.schedule_after(Duration::from_millis(delay))
    }

    /// Schedule a tick for right away, replacing any outstanding tick.
    pub fn schedule_immediate(&mut self) -> FaceResult<TimerToken> {
        self.schedule_after(Duration::ZERO)
    }

    fn schedule_after(&mut self, delay: Duration) -> FaceResult<TimerToken> {
        self.cancel_pending();
        self.last_token += 1;
        let token = TimerToken(self.last_token);
        self.driver.arm(token, delay)?;
        self.pending = Some(token);
        tracing::trace!(token = token.0, delay_ms = delay.as_millis() as u64, "tick armed");
        Ok(token)
    }

    /// Cancel `token` if it is the outstanding tick. Cancelling twice is a no-op.
    pub fn cancel(&mut self, token: TimerToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.driver.disarm(token);
        }
    }

    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.driver.disarm(token);
        }
    }

    /// Consume a delivered tick. Returns `true` only for the outstanding token, once.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/timer.rs"]
mod tests;
