use super::*;
use crate::foundation::error::FaceError;

fn scheduler(now_ms: i64) -> (RenderTimerScheduler<ManualTickDriver>, ManualClock) {
    let clock = ManualClock::new(now_ms);
    let sched = RenderTimerScheduler::new(ManualTickDriver::new(), Arc::new(clock.clone()), 1000);
    (sched, clock)
}

#[test]
fn delay_is_distance_to_next_boundary() {
    assert_eq!(second_aligned_delay_ms(1_700_000_000_250, 1000), 750);
    assert_eq!(second_aligned_delay_ms(999, 1000), 1);
    assert_eq!(second_aligned_delay_ms(5_000, 1000), 1000);
    assert_eq!(second_aligned_delay_ms(-1, 1000), 1);
    assert_eq!(second_aligned_delay_ms(1_234, 500), 266);
}

#[test]
fn aligned_ticks_do_not_drift() {
    let (mut sched, clock) = scheduler(10_137);
    for _ in 0..50 {
        let token = sched.schedule_second_aligned().unwrap();
        let (_, delay) = sched.driver_mut().take_next().unwrap();
        // Handler runs late by a few ms every time.
        clock.advance(delay + Duration::from_millis(7));
        assert!(sched.fire(token));
        assert_eq!(clock.now_millis() % 1000, 7);
    }
}

#[test]
fn rescheduling_replaces_the_outstanding_tick() {
    let (mut sched, _) = scheduler(0);
    let a = sched.schedule_second_aligned().unwrap();
    let b = sched.schedule_second_aligned().unwrap();
    assert_ne!(a, b);
    assert_eq!(sched.pending(), Some(b));
    assert_eq!(sched.driver().armed().len(), 1);
    assert_eq!(sched.driver().armed()[0].0, b);
    assert!(!sched.fire(a));
}

#[test]
fn token_fires_at_most_once() {
    let (mut sched, _) = scheduler(0);
    let t = sched.schedule_immediate().unwrap();
    assert_eq!(sched.driver().armed()[0].1, Duration::ZERO);
    assert!(sched.fire(t));
    assert!(!sched.fire(t));
    assert_eq!(sched.pending(), None);
}

#[test]
fn cancel_is_idempotent() {
    let (mut sched, _) = scheduler(0);
    let t = sched.schedule_second_aligned().unwrap();
    sched.cancel(t);
    sched.cancel(t);
    sched.cancel_pending();
    assert_eq!(sched.pending(), None);
    assert!(sched.driver().armed().is_empty());
    assert!(!sched.fire(t));
}

struct BrokenDriver;

impl TickDriver for BrokenDriver {
    fn arm(&mut self, _token: TimerToken, _delay: Duration) -> FaceResult<()> {
        Err(FaceError::timer_scheduling("no timer available"))
    }

    fn disarm(&mut self, _token: TimerToken) {}
}

#[test]
fn arm_failure_leaves_nothing_pending() {
    let mut sched = RenderTimerScheduler::new(BrokenDriver, Arc::new(ManualClock::new(0)), 1000);
    let err = sched.schedule_second_aligned().unwrap_err();
    assert!(matches!(err, FaceError::TimerScheduling(_)));
    assert_eq!(sched.pending(), None);
}

#[test]
fn manual_clock_offset_applies() {
    let clock = ManualClock::new(0);
    clock.set_offset_secs(3600);
    assert_eq!(clock.local_offset().local_minus_utc(), 3600);
    assert_eq!(clock.now_utc().timestamp(), 0);
}
